use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::ValidationError;
use crate::domains::podhome::format::format_json;
use crate::domains::podhome::types::RegisterWebhookRequest;
use crate::domains::podhome::validation::{require_url, require_webhook_action};
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
pub struct RegisterWebhookParams {
    #[schemars(description = "URL that receives the webhook POST")]
    pub url: String,

    #[schemars(description = "Event to subscribe to: episode_published or episode_live")]
    pub action_type: String,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

impl RegisterWebhookParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_url("url", &self.url)?;
        require_webhook_action(&self.action_type)
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct RegisterWebhookTool;

impl RegisterWebhookTool {
    pub const NAME: &'static str = "register_webhook";

    pub const DESCRIPTION: &'static str =
        "Register a webhook that Podhome calls when an episode is published or goes live.";

    #[instrument(skip_all, fields(tool = "register_webhook", action_type = %params.action_type))]
    pub async fn execute(params: &RegisterWebhookParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = params.validate() {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let request = RegisterWebhookRequest {
            url: params.url.clone(),
            action_type: params.action_type.clone(),
        };
        let outcome = client
            .register_webhook(&request)
            .await
            .map(|response| format_json(&response));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: RegisterWebhookParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<RegisterWebhookParams>(),
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
                let params: RegisterWebhookParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::context::testing::*;

    fn params(url: &str, action_type: &str) -> RegisterWebhookParams {
        serde_json::from_value(serde_json::json!({ "url": url, "action_type": action_type }))
            .unwrap()
    }

    #[tokio::test]
    async fn test_rejects_unknown_action() {
        let executor = StubExecutor::new(200, "{}");
        let ctx = context(executor.clone());

        let result =
            RegisterWebhookTool::execute(&params("https://hooks.example.com/p", "episode_deleted"), &ctx)
                .await;
        assert!(!is_error(&result));
        assert_eq!(
            text(&result),
            "Validation error: action_type must be one of: episode_published, episode_live"
        );
        assert!(executor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_registers() {
        let executor = StubExecutor::new(200, r#"{"integration_id": "h1"}"#);
        let ctx = context(executor.clone());

        let result =
            RegisterWebhookTool::execute(&params("https://hooks.example.com/p", "episode_live"), &ctx)
                .await;
        assert!(!is_error(&result));

        let requests = executor.requests();
        assert_eq!(requests[0].method, reqwest::Method::POST);
        let body: serde_json::Value =
            serde_json::from_slice(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "url": "https://hooks.example.com/p", "action_type": "episode_live" })
        );
    }
}
