//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! the configuration and the Podio session, both fixed before serving starts.

use crate::config::ConfigV1;
use crate::podio::PodioClient;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler and only holds
/// read-only references.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Podio session for the leads app; `None` when the connection failed at startup.
    pub podio: Option<Arc<PodioClient>>,
}
