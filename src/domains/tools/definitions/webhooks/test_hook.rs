//! Fires a test delivery so a receiver can be checked end to end.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::format::format_json;
use crate::domains::podhome::validation::require_non_empty;
use crate::domains::tools::ToolContext;

use super::super::common::{
    ApiKeyOverride, error_result, outcome_result, parse_arguments, validation_result,
};
#[cfg(feature = "http")]
use super::super::common::{parse_http_arguments, to_http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct TestWebhookParams {
    #[serde(default)]
    #[schemars(description = "Only trigger this webhook integration (default: all)")]
    pub integration_id: Option<String>,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct TestWebhookTool;

impl TestWebhookTool {
    pub const NAME: &'static str = "test_webhook";

    pub const DESCRIPTION: &'static str =
        "Send a test event to registered webhooks, or to a single integration.";

    #[instrument(skip_all, fields(tool = "test_webhook", integration_id = ?params.integration_id))]
    pub async fn execute(params: &TestWebhookParams, ctx: &ToolContext) -> CallToolResult {
        if let Some(id) = &params.integration_id {
            if let Err(e) = require_non_empty("integration_id", id) {
                return validation_result(&e);
            }
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .test_webhook(params.integration_id.as_deref())
            .await
            .map(|response| match response {
                serde_json::Value::Null => "Test event sent".to_string(),
                other => format_json(&other),
            });
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: TestWebhookParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<TestWebhookParams>(),
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
                let params: TestWebhookParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
