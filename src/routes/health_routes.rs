//! Health check endpoints.

use crate::models::StatusResponse;
use crate::state::AppState;
use axum::{routing::get, Json, Router};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness check of the HTTP server only; the Podio session is not probed.
async fn health_check() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
