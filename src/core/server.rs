//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating to the tools domain.
//!
//! ## Tool Architecture
//!
//! Tools are defined in `domains/tools/definitions/` with one file per tool.
//! Each tool defines:
//! - Parameters struct (for rmcp)
//! - `execute()` method (core logic)
//! - `http_handler()` method (called via ToolRegistry for HTTP transport)
//!
//! The ToolRouter is built dynamically in `domains/tools/router.rs`.
//! **Adding a new tool does NOT require modifying this file!**

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;
use tracing::debug;

use super::config::Config;
use super::error::Error;
use crate::domains::tools::{ToolContext, build_tool_router};

#[cfg(feature = "http")]
use crate::domains::tools::{ToolError, ToolRegistry};

const INSTRUCTIONS: &str = "Manage a Podhome podcast: create draft episodes from audio \
    hosted on Cloudflare R2 (use get_r2_public_url first), then list, inspect, update, \
    publish or delete them, cut clips and manage webhooks. Every Podhome tool accepts \
    podhome_api_key or podhome_api_key_name to pick the show's API key; list_api_keys \
    shows which names are configured.";

/// The main MCP server handler.
///
/// This struct implements the `ServerHandler` trait from rmcp and routes
/// tool calls to the tool definitions.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared state handed to every tool call.
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    ctx: ToolContext,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails only when the outbound HTTP client cannot be built.
    pub fn new(config: Config) -> super::Result<Self> {
        let config = Arc::new(config);
        let ctx = ToolContext::with_reqwest(config.clone())
            .map_err(|e| Error::internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_context(ctx))
    }

    /// Create a server around an existing tool context.
    pub fn with_context(ctx: ToolContext) -> Self {
        debug!("Building tool router");
        Self {
            config: ctx.config_arc(),
            tool_router: build_tool_router::<Self>(ctx.clone()),
            ctx,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    ///
    /// This method uses the ToolRegistry to dispatch to the appropriate
    /// tool handler. Each tool's http_handler is defined in its own file
    /// under `domains/tools/definitions/`.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let registry = ToolRegistry::new(self.ctx.clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::testing::{StubExecutor, context};

    #[test]
    fn test_server_info() {
        let server = McpServer::with_context(context(StubExecutor::new(200, "")));
        let info = server.get_info();
        assert_eq!(info.server_info.name, "podhome");
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.instructions.unwrap().contains("podhome_api_key_name"));
    }

    #[test]
    fn test_list_tools_for_http() {
        let server = McpServer::with_context(context(StubExecutor::new(200, "")));
        let tools = server.list_tools();
        assert_eq!(tools.len(), 13);
        assert!(tools.iter().all(|t| t["inputSchema"].is_object()));
    }

    #[test]
    fn test_new_builds_client() {
        let server = McpServer::new(Config::default()).unwrap();
        assert_eq!(server.name(), "podhome");
    }
}
