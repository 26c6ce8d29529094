//! Podhome podcast-hosting API.
//!
//! - `credentials`: picks the API key for one call
//! - `client`: one method per REST endpoint
//! - `error`: failure taxonomy and status classification
//! - `validation`: pre-flight input checks
//! - `types`: request and response bodies
//! - `format`: plain-text rendering for tool output

mod client;
mod credentials;
mod error;
pub mod format;
pub mod types;
pub mod validation;

pub use client::{API_KEY_HEADER, PodhomeClient, PodhomeResult};
pub use credentials::{
    CredentialError, CredentialResolver, CredentialSource, DEFAULT_KEY_NAME, ResolvedCredential,
};
pub use error::{AUTH_ERROR_MESSAGE, NOT_FOUND_MESSAGE, PodhomeError};
pub use validation::ValidationError;
