//! HTTP routes
//!
//! - `POST /upload` - store one multipart `file` part and record it
//! - `GET /uploads/{filename}` - look up the stored URL for a filename
//! - `GET /health` - liveness check

pub mod files;
pub mod health;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::info;

use crate::error::panic_response;
use crate::middleware::cors_layer;
use crate::models::AppState;

/// Create the main application router
///
/// Bodies above `max_upload_bytes` are rejected with 413 before any handler
/// logic runs. Panics inside handlers surface as a generic JSON 500.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let max_upload_bytes = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(files::router())
        .merge(health::router())
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .with_state(state)
}
