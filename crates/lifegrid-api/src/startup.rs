//! Server startup helper for embedding in the engine binary.
//!
//! [`spawn_server`] launches the HTTP + `WebSocket` server on a background
//! Tokio task so it runs concurrently with the scheduler loop.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the HTTP server on a background Tokio task.
///
/// The address is validated before the task is spawned so obvious
/// misconfiguration fails startup instead of only being logged. The
/// server drains and the returned handle completes once `shutdown`
/// resolves; a bind failure inside the task is logged at error level.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address is invalid.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state, shutdown).await {
            tracing::error!(error = %e, "Lifegrid server exited with error");
        }
    });

    tracing::info!(%addr, "Lifegrid server spawned on background task");

    Ok(handle)
}
