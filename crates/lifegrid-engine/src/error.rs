//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can abort startup, giving
//! `main` a single error type to propagate with `?`. Persistence failures
//! never reach it; they are logged and recovered where they occur.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: lifegrid_core::config::ConfigError,
    },

    /// The HTTP server failed to start.
    #[error("server error: {source}")]
    Server {
        /// The underlying startup error.
        #[from]
        source: lifegrid_api::startup::StartupError,
    },
}
