use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::format::format_episode_list;
use crate::domains::podhome::types::{EpisodeIncludes, ListEpisodesQuery};
use crate::domains::podhome::validation::require_status;
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
pub struct ListEpisodesParams {
    #[serde(default)]
    #[schemars(
        description = "Filter by status: 0=Draft, 1=Scheduled, 2=Published, 3=LivePending, 4=Live, 5=LiveEnded"
    )]
    pub status: Option<i64>,

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

impl ListEpisodesParams {
    fn to_query(&self) -> ListEpisodesQuery {
        ListEpisodesQuery {
            status: self.status,
            includes: EpisodeIncludes {
                transcript: self.include_transcript,
                chapters: self.include_chapters,
                downloads: self.include_downloads,
                people: self.include_people,
            },
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct ListEpisodesTool;

impl ListEpisodesTool {
    pub const NAME: &'static str = "list_episodes";

    pub const DESCRIPTION: &'static str =
        "List episodes in the Podhome show, optionally filtered by status.";

    #[instrument(skip_all, fields(tool = "list_episodes", status = ?params.status))]
    pub async fn execute(params: &ListEpisodesParams, ctx: &ToolContext) -> CallToolResult {
        if let Some(status) = params.status {
            if let Err(e) = require_status(status) {
                return validation_result(&e);
            }
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .list_episodes(&params.to_query())
            .await
            .map(|episodes| format_episode_list(&episodes));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: ListEpisodesParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<ListEpisodesParams>(),
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
                let params: ListEpisodesParams = parse_arguments(arguments)?;
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

    const EPISODES: &str = r#"[
        {"episode_id": "e1", "title": "Pilot", "status": 2, "episode_nr": 1, "season_nr": 1,
         "publish_date": "2024-01-15T10:30:00Z"},
        {"episode_id": "e2", "title": "Second", "status": 0}
    ]"#;

    #[test]
    fn test_query_only_carries_given_flags() {
        let params: ListEpisodesParams = serde_json::from_value(serde_json::json!({
            "status": 2,
            "include_chapters": true
        }))
        .unwrap();
        assert_eq!(
            params.to_query().query_pairs(),
            vec![("status", "2".to_string()), ("includeChapters", "true".to_string())]
        );
    }

    #[tokio::test]
    async fn test_status_out_of_range() {
        let executor = StubExecutor::new(200, EPISODES);
        let ctx = context(executor.clone());
        let params = ListEpisodesParams {
            status: Some(9),
            ..Default::default()
        };

        let result = ListEpisodesTool::execute(&params, &ctx).await;
        assert!(!is_error(&result));
        assert!(text(&result).starts_with("Validation error: status must be 0-5"));
        assert!(executor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_lists_episodes() {
        let executor = StubExecutor::new(200, EPISODES);
        let ctx = context(executor.clone());

        let result = ListEpisodesTool::execute(&ListEpisodesParams::default(), &ctx).await;
        let body = text(&result);
        assert!(body.starts_with("Found 2 episodes:"));
        assert!(body.contains("e1 | Pilot | S1E1 | Published | 2024-01-15"));
        assert!(body.contains("e2 | Second | N/A | Draft | N/A"));

        let requests = executor.requests();
        assert_eq!(requests[0].url, "https://api.test.podhome.fm/api/episodes");
        assert_eq!(requests[0].header_value("X-API-KEY"), Some("default-key"));
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let ctx = context(StubExecutor::new(401, "unauthorized"));
        let result = ListEpisodesTool::execute(&ListEpisodesParams::default(), &ctx).await;
        assert!(is_error(&result));
        assert!(text(&result).starts_with("Error: Invalid API key"));
    }
}
