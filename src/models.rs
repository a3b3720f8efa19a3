use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::db::FileRepository;
use crate::storage::ObjectStorage;

/// Media type hinted on lookups of `.csv` names.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn ObjectStorage>,
    pub files: Arc<dyn FileRepository>,
}

/// A stored upload. One row of the `files` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FileRecord {
    pub filename: String,
    pub file_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResponse {
    pub file_url: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl LookupResponse {
    /// The type hint is lexical: only names ending in exactly `.csv` get it.
    pub fn new(filename: &str, file_url: String) -> Self {
        let content_type = filename
            .ends_with(".csv")
            .then(|| CSV_CONTENT_TYPE.to_string());
        Self {
            file_url,
            content_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
