// File Uploader - stores uploads in S3 and records them in MySQL

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-exports for convenience
pub use config::Config;
pub use error::AppError;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
