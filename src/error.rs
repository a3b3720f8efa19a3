use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error as ThisError;
use tracing::error;

use crate::db::DbError;
use crate::storage::StorageError;

/// Message returned for every failure whose detail must not reach the caller.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(ThisError, Debug)]
pub enum AppError {
    /// The form had no `file` part carrying a filename
    #[error("No file part")]
    MissingFilePart,

    #[error("No selected file")]
    EmptyFilename,

    /// Nothing usable was left of the filename after sanitizing
    #[error("Invalid filename")]
    InvalidFilename,

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error("Failed to connect to S3")]
    StorageConnect(#[source] StorageError),

    #[error("Failed to upload file")]
    StorageUpload(#[source] StorageError),

    #[error("Failed to connect to database")]
    DatabaseConnect(#[source] DbError),

    #[error("Failed to save file details in database")]
    DatabaseSave(#[source] DbError),

    #[error("Failed to fetch file from database")]
    DatabaseFetch(#[source] DbError),

    #[error("File not found")]
    NotFound,

    /// Non-CSV content that is not valid UTF-8 text
    #[error("upload is not valid UTF-8 text")]
    Decode(#[from] std::str::Utf8Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFilePart => StatusCode::BAD_REQUEST,
            AppError::EmptyFilename => StatusCode::BAD_REQUEST,
            AppError::InvalidFilename => StatusCode::BAD_REQUEST,
            AppError::Multipart(err) => err.status(),
            AppError::StorageConnect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::StorageUpload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseConnect(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseSave(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DatabaseFetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe message, without leaking internal details
    pub fn user_message(&self) -> String {
        match self {
            AppError::Decode(_) | AppError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            AppError::Multipart(err) => err.body_text(),
            other => other.to_string(),
        }
    }

    /// Maps a storage failure to the matching upload error kind.
    pub fn from_storage(err: StorageError) -> Self {
        match err {
            StorageError::Connect(_) => AppError::StorageConnect(err),
            StorageError::Upload(_) | StorageError::Rejected { .. } => AppError::StorageUpload(err),
        }
    }

    /// Maps a failed insert to the matching error kind.
    pub fn from_save(err: DbError) -> Self {
        match err {
            DbError::Connect(_) => AppError::DatabaseConnect(err),
            DbError::Query(_) => AppError::DatabaseSave(err),
        }
    }

    /// Maps a failed select to the matching error kind.
    pub fn from_fetch(err: DbError) -> Self {
        match err {
            DbError::Connect(_) => AppError::DatabaseConnect(err),
            DbError::Query(_) => AppError::DatabaseFetch(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            match std::error::Error::source(&self) {
                Some(cause) => error!(error = %self, cause = %cause, "request failed"),
                None => error!(error = %self, "request failed"),
            }
        }

        let body = Json(serde_json::json!({ "error": self.user_message() }));
        (status, body).into_response()
    }
}

/// Turns a handler panic into the generic 500 JSON body.
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    error!("handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE })),
    )
        .into_response()
}
