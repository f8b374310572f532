//! Error types for the API layer.
//!
//! [`ApiError`] converts into an Axum response. Malformed cell submissions
//! answer `404 ERROR`, the response the browser client expects for a body
//! the server cannot use.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The add-cell body was missing, not JSON, or lacked a required field.
    #[error("malformed cell: {0}")]
    MalformedCell(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::MalformedCell(reason) => {
                tracing::debug!(%reason, "rejected malformed cell");
                (StatusCode::NOT_FOUND, "ERROR").into_response()
            }
        }
    }
}
