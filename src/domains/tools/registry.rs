//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use rmcp::model::Tool;
#[cfg(feature = "http")]
use tracing::warn;

use super::context::ToolContext;
#[cfg(feature = "http")]
use super::error::ToolError;

use super::definitions::{
    CreateClipTool, CreateEpisodeTool, DeleteEpisodeTool, DeleteWebhookTool, GetEpisodeTool,
    GetR2PublicUrlTool, ListApiKeysTool, ListEpisodesTool, ListWebhooksTool, PublishEpisodeTool,
    RegisterWebhookTool, TestWebhookTool, UpdateEpisodeTool,
};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// This struct provides a central point for:
/// - Listing all available tools
/// - Dispatching HTTP tool calls (when http feature is enabled)
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    ctx: ToolContext,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            CreateEpisodeTool::NAME,
            ListEpisodesTool::NAME,
            GetEpisodeTool::NAME,
            UpdateEpisodeTool::NAME,
            DeleteEpisodeTool::NAME,
            PublishEpisodeTool::NAME,
            GetR2PublicUrlTool::NAME,
            ListApiKeysTool::NAME,
            CreateClipTool::NAME,
            ListWebhooksTool::NAME,
            RegisterWebhookTool::NAME,
            DeleteWebhookTool::NAME,
            TestWebhookTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools.
    /// Both HTTP and STDIO transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            CreateEpisodeTool::to_tool(),
            ListEpisodesTool::to_tool(),
            GetEpisodeTool::to_tool(),
            UpdateEpisodeTool::to_tool(),
            DeleteEpisodeTool::to_tool(),
            PublishEpisodeTool::to_tool(),
            GetR2PublicUrlTool::to_tool(),
            ListApiKeysTool::to_tool(),
            CreateClipTool::to_tool(),
            ListWebhooksTool::to_tool(),
            RegisterWebhookTool::to_tool(),
            DeleteWebhookTool::to_tool(),
            TestWebhookTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    ///
    /// This is used by the HTTP transport to call tools.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let ctx = &self.ctx;
        let result = match name {
            CreateEpisodeTool::NAME => CreateEpisodeTool::http_handler(arguments, ctx).await,
            ListEpisodesTool::NAME => ListEpisodesTool::http_handler(arguments, ctx).await,
            GetEpisodeTool::NAME => GetEpisodeTool::http_handler(arguments, ctx).await,
            UpdateEpisodeTool::NAME => UpdateEpisodeTool::http_handler(arguments, ctx).await,
            DeleteEpisodeTool::NAME => DeleteEpisodeTool::http_handler(arguments, ctx).await,
            PublishEpisodeTool::NAME => PublishEpisodeTool::http_handler(arguments, ctx).await,
            GetR2PublicUrlTool::NAME => GetR2PublicUrlTool::http_handler(arguments, ctx).await,
            ListApiKeysTool::NAME => ListApiKeysTool::http_handler(arguments, ctx).await,
            CreateClipTool::NAME => CreateClipTool::http_handler(arguments, ctx).await,
            ListWebhooksTool::NAME => ListWebhooksTool::http_handler(arguments, ctx).await,
            RegisterWebhookTool::NAME => RegisterWebhookTool::http_handler(arguments, ctx).await,
            DeleteWebhookTool::NAME => DeleteWebhookTool::http_handler(arguments, ctx).await,
            TestWebhookTool::NAME => TestWebhookTool::http_handler(arguments, ctx).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                return Err(ToolError::not_found(name));
            }
        };
        result.map_err(ToolError::invalid_arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::testing::{StubExecutor, context};

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(context(StubExecutor::new(200, "")));
        let names = registry.tool_names();
        assert_eq!(names.len(), 13);
        for name in [
            "create_episode",
            "list_episodes",
            "get_episode",
            "update_episode",
            "delete_episode",
            "publish_episode",
            "get_r2_public_url",
            "list_api_keys",
            "create_clip",
            "list_webhooks",
            "register_webhook",
            "delete_webhook",
            "test_webhook",
        ] {
            assert!(names.contains(&name), "missing {}", name);
        }
    }

    #[test]
    fn test_every_tool_accepts_key_override() {
        for tool in ToolRegistry::get_all_tools() {
            if tool.name == ListApiKeysTool::NAME || tool.name == GetR2PublicUrlTool::NAME {
                continue;
            }
            let properties = tool.input_schema.get("properties").unwrap();
            assert!(
                properties.get("podhome_api_key").is_some(),
                "{} has no podhome_api_key",
                tool.name
            );
            assert!(properties.get("podhome_api_key_name").is_some());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_dispatches() {
        let executor = StubExecutor::new(200, "[]");
        let registry = ToolRegistry::new(context(executor.clone()));
        let result = registry
            .call_tool("list_episodes", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(executor.requests().len(), 1);
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_bad_arguments() {
        let registry = ToolRegistry::new(context(StubExecutor::new(200, "")));
        let err = registry
            .call_tool("get_episode", serde_json::json!({ "episode_id": 7 }))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(context(StubExecutor::new(200, "")));
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }
}
