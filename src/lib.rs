//! Podhome MCP Server Library
//!
//! An MCP server that lets clients manage a Podhome podcast: create episodes
//! from audio hosted on Cloudflare R2, then publish, edit and clip them.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, outbound HTTP, the server and its transports
//! - **domains**: Business logic organized by bounded contexts
//!   - **podhome**: API key resolution, the Podhome API client and error mapping
//!   - **storage**: Cloudflare R2 object lookup with SigV4 signing
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use podhome_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
