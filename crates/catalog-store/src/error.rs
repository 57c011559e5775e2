//! Store error types.

use thiserror::Error;

/// Errors that can occur while talking to the data store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend error: {status} - {message}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Error body returned by the backend.
        message: String,
    },

    /// The backend answered with a body or header we could not decode.
    #[error("invalid response format: {0}")]
    InvalidResponse(String),

    /// A seed fixture could not be read or parsed.
    #[error("invalid seed: {0}")]
    Seed(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
