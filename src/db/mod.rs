use async_trait::async_trait;
use thiserror::Error as ThisError;

use crate::models::FileRecord;

pub use operations::*;

pub mod operations;

#[derive(ThisError, Debug)]
pub enum DbError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database query failed: {0}")]
    Query(#[source] sqlx::Error),
}

/// Metadata store for uploaded files.
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn insert_file(&self, record: &FileRecord) -> Result<(), DbError>;

    /// Exact, case-sensitive match on `filename`.
    async fn find_file(&self, filename: &str) -> Result<Option<FileRecord>, DbError>;
}
