//! Tool Router - builds the rmcp ToolRouter from registry.
//!
//! This module builds the ToolRouter for STDIO transport by delegating
//! to the tool definitions themselves. Each tool knows how to create its own route.

use rmcp::handler::server::tool::ToolRouter;

use super::context::ToolContext;
use super::definitions::{
    CreateClipTool, CreateEpisodeTool, DeleteEpisodeTool, DeleteWebhookTool, GetEpisodeTool,
    GetR2PublicUrlTool, ListApiKeysTool, ListEpisodesTool, ListWebhooksTool, PublishEpisodeTool,
    RegisterWebhookTool, TestWebhookTool, UpdateEpisodeTool,
};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(ctx: ToolContext) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(CreateEpisodeTool::create_route(ctx.clone()))
        .with_route(ListEpisodesTool::create_route(ctx.clone()))
        .with_route(GetEpisodeTool::create_route(ctx.clone()))
        .with_route(UpdateEpisodeTool::create_route(ctx.clone()))
        .with_route(DeleteEpisodeTool::create_route(ctx.clone()))
        .with_route(PublishEpisodeTool::create_route(ctx.clone()))
        .with_route(GetR2PublicUrlTool::create_route(ctx.clone()))
        .with_route(ListApiKeysTool::create_route(ctx.clone()))
        .with_route(CreateClipTool::create_route(ctx.clone()))
        .with_route(ListWebhooksTool::create_route(ctx.clone()))
        .with_route(RegisterWebhookTool::create_route(ctx.clone()))
        .with_route(DeleteWebhookTool::create_route(ctx.clone()))
        .with_route(TestWebhookTool::create_route(ctx))
}

#[cfg(test)]
mod tests {
    use super::super::context::testing::{StubExecutor, context};
    use super::super::registry::ToolRegistry;
    use super::*;

    struct TestServer {}

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(context(StubExecutor::new(200, "")));
        let tools = router.list_all();
        assert_eq!(tools.len(), 13);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"create_episode"));
        assert!(names.contains(&"publish_episode"));
        assert!(names.contains(&"get_r2_public_url"));
        assert!(names.contains(&"test_webhook"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let ctx = context(StubExecutor::new(200, ""));
        let registry = ToolRegistry::new(ctx.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(ctx);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
