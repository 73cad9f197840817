//! Application startup and server initialization.
//!
//! Startup has two steps before serving: connect to Podio, then bind the
//! listener. A failed Podio connection only degrades the service; a failed
//! bind is fatal.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::config::{ConfigError, ConfigV1, PodioConfig};
use crate::podio::PodioClient;
use crate::routes;
use crate::state::AppState;

/// Fatal errors while bringing the server up or running it.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("could not bind to {address}: {source}")]
    Bind {
        address: SocketAddr,
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(io::Error),
}

/// Connects to the Podio leads app.
///
/// Failure is logged and yields `None`; the server still starts and serves
/// its static endpoints.
pub async fn connect_podio(config: &PodioConfig) -> Option<Arc<PodioClient>> {
    match PodioClient::connect(config, &config.leads).await {
        Ok(client) => {
            info!(
                event_name = "podio.connect.succeeded",
                app_id = client.app_id(),
                "Connection with Podio established"
            );
            Some(Arc::new(client))
        }
        Err(e) => {
            error!(
                event_name = "podio.connect.failed",
                app_id = config.leads.app_id.as_str(),
                "Error connecting to Podio: {}",
                e
            );
            None
        }
    }
}

/// Builds the shared state, including the (optional) Podio session.
pub async fn build_state(config: Arc<ConfigV1>) -> AppState {
    let podio = connect_podio(&config.podio).await;
    AppState { config, podio }
}

/// Initializes and runs the application server.
///
/// Connects to Podio, binds to the configured address and serves until
/// Ctrl+C or SIGTERM is received.
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured address
/// or encounters a runtime error during execution.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), StartupError> {
    let address = config.listen_address()?;
    let state = build_state(config).await;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;
    info!("Starting server on {}", address);

    axum::serve(listener, routes::create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
