//! Transport-level failures.

use std::time::Duration;
use thiserror::Error;

/// A failure that prevented an HTTP response from being received.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// DNS, connection or TLS failure.
    #[error("{0}")]
    Network(String),

    /// The status line arrived but the body could not be read. A response was
    /// received, so this is never retried.
    #[error("Failed to read HTTP {status} response body: {message}")]
    Body { status: u16, message: String },

    /// The attempt exceeded its deadline and was cancelled.
    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl HttpClientError {
    /// Create a network error.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Whether another attempt may succeed. Only failures that left us
    /// without a response qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

impl From<reqwest::Error> for HttpClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::Network(format!("Connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}
