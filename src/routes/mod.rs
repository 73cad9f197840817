//! HTTP route definitions and handlers.
//!
//! Only informational endpoints exist: the welcome banner and the liveness check.

mod health_routes;
mod root_routes;

pub use root_routes::WELCOME_MESSAGE;

use crate::state::AppState;
use axum::Router;
use tower_http::trace::TraceLayer;

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router and attaches
/// the application state for access in handlers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(root_routes::routes())
        .merge(health_routes::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
