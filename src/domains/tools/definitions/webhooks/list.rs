use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::format::format_json;
use crate::domains::tools::ToolContext;

use super::super::common::{ApiKeyOverride, error_result, outcome_result, parse_arguments};
#[cfg(feature = "http")]
use super::super::common::{parse_http_arguments, to_http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListWebhooksParams {
    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct ListWebhooksTool;

impl ListWebhooksTool {
    pub const NAME: &'static str = "list_webhooks";

    pub const DESCRIPTION: &'static str = "List webhooks registered for the Podhome show.";

    #[instrument(skip_all, fields(tool = "list_webhooks"))]
    pub async fn execute(params: &ListWebhooksParams, ctx: &ToolContext) -> CallToolResult {
        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client.list_webhooks().await.map(|hooks| format_json(&hooks));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: ListWebhooksParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListWebhooksParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    pub fn create_route<S>(ctx: ToolContext) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |call: ToolCallContext<'_, S>| {
            let arguments = call.arguments.clone();
            let ctx = ctx.clone();
            async move {
                let params: ListWebhooksParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
