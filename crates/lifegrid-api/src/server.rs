//! HTTP server lifecycle management.
//!
//! Provides [`start_server`], which binds a TCP listener and serves the
//! router until a caller-supplied shutdown future resolves.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// The TCP port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Parse the configured host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::Bind`] if the pair is not a valid address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ServerError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))
    }
}

/// Start the HTTP server.
///
/// Binds to the configured address, builds the router, and serves
/// requests until `shutdown` resolves. In-flight requests are allowed to
/// finish; open `WebSocket` streams are dropped with the runtime.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server(
    config: &ServerConfig,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    let addr = config.socket_addr()?;
    let router = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "Lifegrid server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))?;

    info!(%addr, "Lifegrid server stopped");
    Ok(())
}

/// Errors that can occur when starting or running the HTTP server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}
