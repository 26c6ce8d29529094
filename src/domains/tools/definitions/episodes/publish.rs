//! Publish an episode now or schedule it for later.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::ValidationError;
use crate::domains::podhome::format::format_published_episode;
use crate::domains::podhome::types::PublishEpisodeRequest;
use crate::domains::podhome::validation::{require_iso8601, require_uuid};
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
pub struct PublishEpisodeParams {
    #[schemars(description = "UUID of the episode")]
    pub episode_id: String,

    #[serde(default)]
    #[schemars(description = "Publish immediately (default: true)")]
    pub publish_now: Option<bool>,

    #[serde(default)]
    #[schemars(description = "ISO-8601 UTC datetime to schedule for, when publish_now is false")]
    pub publish_date: Option<String>,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

impl PublishEpisodeParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("episode_id", &self.episode_id)?;
        // An explicit `true` is the only case where the date goes unchecked.
        if self.publish_now != Some(true) {
            if let Some(date) = &self.publish_date {
                require_iso8601("publish_date", date)?;
            }
        }
        Ok(())
    }

    fn to_request(&self) -> PublishEpisodeRequest {
        PublishEpisodeRequest {
            episode_id: self.episode_id.clone(),
            publish_now: self.publish_now.unwrap_or(true),
            publish_date: self.publish_date.clone(),
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct PublishEpisodeTool;

impl PublishEpisodeTool {
    pub const NAME: &'static str = "publish_episode";

    pub const DESCRIPTION: &'static str = "Publish a draft episode immediately, or schedule it \
         by setting publish_now to false and giving a publish_date.";

    #[instrument(skip_all, fields(tool = "publish_episode", episode_id = %params.episode_id))]
    pub async fn execute(params: &PublishEpisodeParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = params.validate() {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .publish_episode(&params.to_request())
            .await
            .map(|published| format_published_episode(&published));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: PublishEpisodeParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<PublishEpisodeParams>(),
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
                let params: PublishEpisodeParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
