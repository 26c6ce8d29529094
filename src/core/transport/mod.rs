//! How the Podhome server talks to its MCP client.
//!
//! Agents normally launch the server as a child process and speak over
//! stdin/stdout (`stdio`, the default feature). The `http` feature adds a
//! small axum server for hosted deployments where several agents share one
//! process; `MCP_TRANSPORT` picks between them at startup.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
