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

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeleteWebhookParams {
    #[schemars(description = "ID of the webhook integration to remove")]
    pub integration_id: String,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct DeleteWebhookTool;

impl DeleteWebhookTool {
    pub const NAME: &'static str = "delete_webhook";

    pub const DESCRIPTION: &'static str = "Remove a registered webhook.";

    #[instrument(skip_all, fields(tool = "delete_webhook", integration_id = %params.integration_id))]
    pub async fn execute(params: &DeleteWebhookParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = require_non_empty("integration_id", &params.integration_id) {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .delete_webhook(&params.integration_id)
            .await
            .map(|response| match response {
                serde_json::Value::Null => format!("Deleted webhook {}", params.integration_id),
                other => format_json(&other),
            });
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: DeleteWebhookParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<DeleteWebhookParams>(),
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
                let params: DeleteWebhookParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
