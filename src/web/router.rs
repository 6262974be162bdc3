//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{delete_file, get_file, list_files, status, upload_files, AppState};
use super::middleware::create_cors_layer;
use super::openapi::openapi_json;

/// Create the main API router.
///
/// `max_request_size` caps request bodies in bytes; `None` removes the cap.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_request_size: Option<usize>,
) -> Router {
    let body_limit = match max_request_size {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .route("/upload", post(upload_files))
        .route("/files", get(list_files))
        .route("/files/:filename", get(get_file).delete(delete_file))
        .route("/status", get(status))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(body_limit),
        )
        .with_state(app_state)
}
