//! Serves the Podhome tools over stdin/stdout.
//!
//! Stdout carries JSON-RPC only, so tracing output must stay on stderr
//! (see `init_logging` in `main.rs`).

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

pub struct StdioTransport;

impl StdioTransport {
    /// Runs until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        let name = server.name().to_string();
        info!(server = %name, "Waiting for MCP client on stdin");

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = service
            .waiting()
            .await
            .map_err(|e| TransportError::Service(e.to_string()))?;

        info!(server = %name, ?reason, "MCP client disconnected");
        Ok(())
    }
}
