//! Lists which Podhome keys are configured, by name only.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::{CredentialResolver, DEFAULT_KEY_NAME};
use crate::domains::tools::ToolContext;

use super::super::common::{outcome_result, parse_arguments};
#[cfg(feature = "http")]
use super::super::common::{parse_http_arguments, to_http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListApiKeysParams {}

fn format_key_names(names: &[String], has_implicit_default: bool) -> String {
    let mut out = if names.is_empty() {
        "No named API keys configured.".to_string()
    } else {
        let mut listing = format!("Configured API key names ({}):", names.len());
        for name in names {
            listing.push_str("\n- ");
            listing.push_str(name);
            if name == DEFAULT_KEY_NAME {
                listing.push_str(" (used when no name is given)");
            }
        }
        listing
    };

    out.push_str(&format!(
        "\nImplicit default key (PODHOME_API_KEY): {}",
        if has_implicit_default {
            "configured"
        } else {
            "not configured"
        }
    ));
    out
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct ListApiKeysTool;

impl ListApiKeysTool {
    pub const NAME: &'static str = "list_api_keys";

    pub const DESCRIPTION: &'static str = "List the names of configured Podhome API keys, for use \
         with podhome_api_key_name. Key values are never shown.";

    #[instrument(skip_all, fields(tool = "list_api_keys"))]
    pub async fn execute(_params: &ListApiKeysParams, ctx: &ToolContext) -> CallToolResult {
        let credentials = &ctx.config().podhome.credentials;
        let outcome = CredentialResolver::new(credentials)
            .keyed_mapping()
            .map(|mapping| {
                let names: Vec<String> = mapping.into_keys().collect();
                format_key_names(&names, credentials.default_key.is_configured())
            });
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: ListApiKeysParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListApiKeysParams>(),
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
                let params: ListApiKeysParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
