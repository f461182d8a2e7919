#![forbid(unsafe_code)]

//! Error types for the client layer.

use thiserror::Error;

/// Errors surfaced by [`crate::ApiClient`] and [`crate::QueryClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: DNS, connect, timeout, TLS.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No token is set, or the server rejected the one we sent.
    #[error("not authenticated")]
    Unauthenticated,

    /// Session file could not be read or written.
    #[error("session storage: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status code, when the error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Unauthenticated => Some(401),
            _ => None,
        }
    }

    /// Whether a retry could plausibly succeed. Client errors and auth
    /// failures are final; transport errors and 5xx are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
