//! Liveness probe handler.

use axum::Json;

use crate::web::dto::StatusResponse;

/// GET /status - Liveness probe with a fixed payload.
#[utoipa::path(
    get,
    path = "/status",
    tag = "status",
    responses(
        (status = 200, description = "Service is alive", body = StatusResponse)
    )
)]
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse::default())
}
