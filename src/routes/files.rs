use axum::{
    extract::{Multipart, Path, State},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::{AppState, FileRecord, LookupResponse, UploadResponse};
use crate::utils::{normalize_content, sanitize_filename};

/// Stored content type when the part declares none.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/uploads/{filename}", get(get_upload))
}

struct FilePart {
    filename: String,
    content_type: Option<String>,
    data: Bytes,
}

/// Reads the first `file` part that carries a filename. A `file` field
/// without one is a plain form value and is skipped.
async fn read_file_part(multipart: &mut Multipart) -> Result<FilePart, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(AppError::EmptyFilename);
        }

        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(FilePart {
            filename,
            content_type,
            data,
        });
    }

    Err(AppError::MissingFilePart)
}

/// POST /upload - store a file and record where it lives
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let part = read_file_part(&mut multipart).await?;
    debug!(
        filename = %part.filename,
        content_type = ?part.content_type,
        size = part.data.len(),
        "file part received"
    );

    let filename = sanitize_filename(&part.filename).ok_or(AppError::InvalidFilename)?;
    let data = normalize_content(part.content_type.as_deref(), part.data)?;
    let content_type = part
        .content_type
        .as_deref()
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let size = data.len();

    state
        .storage
        .put_object(&filename, data, content_type)
        .await
        .map_err(AppError::from_storage)?;

    let record = FileRecord {
        file_url: state.storage.object_url(&filename),
        filename,
    };

    if let Err(e) = state.files.insert_file(&record).await {
        // the object stays in the bucket without a row
        warn!(key = %record.filename, "stored object has no metadata record");
        return Err(AppError::from_save(e));
    }

    info!(key = %record.filename, size, "file uploaded");
    Ok(Json(UploadResponse {
        file_url: record.file_url,
    }))
}

/// GET /uploads/{filename} - metadata lookup, never touches storage
pub async fn get_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Json<LookupResponse>, AppError> {
    let record = state
        .files
        .find_file(&filename)
        .await
        .map_err(AppError::from_fetch)?;

    match record {
        Some(record) => Ok(Json(LookupResponse::new(&filename, record.file_url))),
        None => {
            info!(filename = %filename, "file not found");
            Err(AppError::NotFound)
        }
    }
}
