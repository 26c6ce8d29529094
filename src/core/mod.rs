//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, outbound HTTP, server lifecycle
//! management, and transport layer abstractions.

pub mod config;
pub mod error;
pub mod http_client;
pub mod secret;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
