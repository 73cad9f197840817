//! Welcome endpoint.

use crate::models::StatusResponse;
use crate::state::AppState;
use axum::{routing::get, Json, Router};

pub const WELCOME_MESSAGE: &str = "Asistente Inmobiliario IA está en línea.";

/// Registers the welcome route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(welcome))
}

async fn welcome() -> Json<StatusResponse> {
    Json(StatusResponse::ok_with_message(WELCOME_MESSAGE))
}
