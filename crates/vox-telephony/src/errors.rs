//! Error types for the telephony client.

use thiserror::Error;

/// Errors that can occur talking to the telephony provider.
#[derive(Debug, Error)]
pub enum TelephonyError {
    /// Transport-level HTTP failure (connect, TLS, timeout).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned a non-success status.
    #[error("provider returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated by the caller if needed.
        body: String,
    },

    /// The call SID is unknown to the provider.
    #[error("call not found: {0}")]
    CallNotFound(String),

    /// The provider response did not have the expected shape.
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

/// Convenience type alias for telephony results.
pub type Result<T> = std::result::Result<T, TelephonyError>;
