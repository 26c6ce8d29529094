//! Object storage errors.

use thiserror::Error;

use crate::core::http_client::HttpClientError;
use crate::core::secret::SecretFileError;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A required R2 setting is not configured.
    #[error("{var} environment variable (or {var}_FILE) is required")]
    MissingCredential { var: String },

    #[error(transparent)]
    SecretFile(#[from] SecretFileError),

    /// HEAD returned 404.
    #[error("File not found in R2: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error(transparent)]
    Transport(#[from] HttpClientError),

    /// Any other non-2xx status.
    #[error("R2 request failed: HTTP {status}")]
    Remote { status: u16 },

    /// URL normalisation would drop `.`/`..` segments, so the signed path
    /// would no longer name the object.
    #[error("Object key must not contain '.' or '..' segments: {0}")]
    DotSegment(String),

    #[error("Invalid R2 endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Failed to sign R2 request: {0}")]
    Signing(String),
}

impl StorageError {
    pub fn missing(var: impl Into<String>) -> Self {
        Self::MissingCredential { var: var.into() }
    }
}
