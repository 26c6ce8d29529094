use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::format::format_episode_details;
use crate::domains::podhome::types::EpisodeIncludes;
use crate::domains::podhome::validation::require_uuid;
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
pub struct GetEpisodeParams {
    #[schemars(description = "UUID of the episode")]
    pub episode_id: String,

    #[serde(default)]
    #[schemars(description = "Include transcript info")]
    pub include_transcript: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Include chapters")]
    pub include_chapters: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Include download counts")]
    pub include_downloads: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Include hosts and guests")]
    pub include_people: Option<bool>,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

impl GetEpisodeParams {
    fn includes(&self) -> EpisodeIncludes {
        EpisodeIncludes {
            transcript: self.include_transcript,
            chapters: self.include_chapters,
            downloads: self.include_downloads,
            people: self.include_people,
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct GetEpisodeTool;

impl GetEpisodeTool {
    pub const NAME: &'static str = "get_episode";

    pub const DESCRIPTION: &'static str = "Get full details for a single Podhome episode by ID.";

    #[instrument(skip_all, fields(tool = "get_episode", episode_id = %params.episode_id))]
    pub async fn execute(params: &GetEpisodeParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = require_uuid("episode_id", &params.episode_id) {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .get_episode(&params.episode_id, &params.includes())
            .await
            .map(|episode| format_episode_details(&episode));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: GetEpisodeParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetEpisodeParams>(),
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
                let params: GetEpisodeParams = parse_arguments(arguments)?;
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

    const EPISODE_ID: &str = "3f2c1a4e-9b7d-4e21-8a5c-0d6e7f8a9b10";

    fn params(json: serde_json::Value) -> GetEpisodeParams {
        serde_json::from_value(json).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_non_uuid() {
        let executor = StubExecutor::new(200, "{}");
        let ctx = context(executor.clone());

        let result = GetEpisodeTool::execute(&params(serde_json::json!({ "episode_id": "42" })), &ctx).await;
        assert!(!is_error(&result));
        assert_eq!(text(&result), "Validation error: episode_id must be a valid UUID");
        assert!(executor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_renders_details() {
        let body = serde_json::json!({
            "episode_id": EPISODE_ID,
            "title": "Pilot",
            "status": 2,
            "duration": "3725",
            "chapters": [{ "start_time": 65.0, "title": "Intro" }]
        })
        .to_string();
        let executor = StubExecutor::new(200, &body);
        let ctx = context(executor.clone());

        let result = GetEpisodeTool::execute(
            &params(serde_json::json!({ "episode_id": EPISODE_ID, "include_chapters": true })),
            &ctx,
        )
        .await;
        let out = text(&result);
        assert!(out.starts_with("Episode: Pilot\n"));
        assert!(out.contains("Duration: 1:02:05"));
        assert!(out.contains("00:01:05 - Intro"));

        assert_eq!(
            executor.requests()[0].url,
            format!(
                "https://api.test.podhome.fm/api/episode/{}?includeChapters=true",
                EPISODE_ID
            )
        );
    }

    #[tokio::test]
    async fn test_not_found() {
        let ctx = context(StubExecutor::new(404, ""));
        let result = GetEpisodeTool::execute(&params(serde_json::json!({ "episode_id": EPISODE_ID })), &ctx).await;
        assert!(is_error(&result));
        assert_eq!(text(&result), "Error: Episode not found");
    }
}
