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
use crate::domains::podhome::types::CreateClipRequest;
use crate::domains::podhome::validation::{require_non_empty, require_uuid};
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
pub struct CreateClipParams {
    #[schemars(description = "UUID of the source episode")]
    pub episode_id: String,

    #[schemars(description = "Clip title")]
    pub title: String,

    #[schemars(description = "Clip start offset in seconds")]
    pub start_time: f64,

    #[schemars(description = "Clip length in seconds")]
    pub duration: f64,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

impl CreateClipParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("episode_id", &self.episode_id)?;
        require_non_empty("title", &self.title)?;
        if self.start_time.is_nan() || self.start_time < 0.0 {
            return Err(ValidationError::new("start_time must be >= 0"));
        }
        if self.duration.is_nan() || self.duration <= 0.0 {
            return Err(ValidationError::new("duration must be > 0"));
        }
        Ok(())
    }

    fn to_request(&self) -> CreateClipRequest {
        CreateClipRequest {
            episode_id: self.episode_id.clone(),
            title: self.title.clone(),
            start_time: self.start_time,
            duration: self.duration,
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateClipTool;

impl CreateClipTool {
    pub const NAME: &'static str = "create_clip";

    pub const DESCRIPTION: &'static str = "Create a short clip from a segment of an episode.";

    #[instrument(skip_all, fields(tool = "create_clip", episode_id = %params.episode_id))]
    pub async fn execute(params: &CreateClipParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = params.validate() {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .create_clip(&params.to_request())
            .await
            .map(|response| format!("Created clip \"{}\"\n{}", params.title, format_json(&response)));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: CreateClipParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CreateClipParams>(),
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
                let params: CreateClipParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
