//! Podhome API failure taxonomy.

use thiserror::Error;

use super::credentials::CredentialError;
use crate::core::http_client::HttpClientError;

/// Message returned for HTTP 401, whatever the body says.
pub const AUTH_ERROR_MESSAGE: &str = "Invalid API key. Check the podhome_api_key argument or the \
     PODHOME_API_KEY / PODHOME_API_KEYS configuration";

/// Message returned for HTTP 404, whatever the body says.
pub const NOT_FOUND_MESSAGE: &str = "Episode not found";

/// Every way a Podhome operation can fail once its input has been validated.
#[derive(Debug, Error)]
pub enum PodhomeError {
    /// No API key could be chosen. Raised before any request.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// No response was received after all attempts.
    #[error(transparent)]
    Transport(#[from] HttpClientError),

    /// HTTP 400.
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP 401.
    #[error("{}", AUTH_ERROR_MESSAGE)]
    Auth,

    /// HTTP 404.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// HTTP 500.
    #[error("Podhome API error: {0}")]
    RemoteServer(String),

    /// Any other non-2xx status.
    #[error("HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Failed to decode Podhome response: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(String),
}

impl PodhomeError {
    /// Map a non-2xx status and its raw body to an error.
    pub fn classify(status: u16, body: &str) -> Self {
        match status {
            400 => Self::Validation(body.to_string()),
            401 => Self::Auth,
            404 => Self::NotFound,
            500 => Self::RemoteServer(body.to_string()),
            _ => Self::Remote {
                status,
                body: body.to_string(),
            },
        }
    }

    /// The HTTP status this error was classified from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation(_) => Some(400),
            Self::Auth => Some(401),
            Self::NotFound => Some(404),
            Self::RemoteServer(_) => Some(500),
            Self::Remote { status, .. } => Some(*status),
            Self::Credential(_) | Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => None,
        }
    }
}

impl From<serde_json::Error> for PodhomeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}
