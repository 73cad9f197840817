#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::Router;
use figment::providers::{Format, Yaml};
use podio_assistant::config::{defaults, load_config_from, ConfigV1};
use podio_assistant::routes::create_router;
use podio_assistant::startup::build_state;
use podio_assistant::state::AppState;

/// Full credential set pointing the Podio client at `api_url`.
pub fn test_config(api_url: &str) -> ConfigV1 {
    let yaml = format!(
        r#"
version: "1.0.0"
bind_address: "127.0.0.1:0"
logging:
  level: "debug"
  format: "json"
podio:
  client_id: "client"
  client_secret: "secret"
  api_url: "{api_url}"
  timeout_in_ms: 2000
  contacts:
    app_id: "100"
    app_token: "contacts-token"
  leads:
    app_id: "200"
    app_token: "leads-token"
"#
    );
    load_config_from(defaults().merge(Yaml::string(&yaml))).expect("Failed to parse test config YAML")
}

/// Router over a state that never connected to Podio.
pub fn build_degraded_app(config: ConfigV1) -> Router {
    create_router(AppState {
        config: Arc::new(config),
        podio: None,
    })
}

/// Runs the real startup sequence (including the Podio connection) and returns the router.
pub async fn build_app(config: ConfigV1) -> (Router, AppState) {
    let state = build_state(Arc::new(config)).await;
    (create_router(state.clone()), state)
}

pub fn get(path: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .expect("failed to build request")
}
