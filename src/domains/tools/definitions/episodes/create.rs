//! Episode creation tool.
//!
//! Creates a draft episode from a publicly reachable audio file. Podhome's
//! AI processing flags all default to off, since audio handed to this tool
//! has usually been mastered already.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::format::format_created_episode;
use crate::domains::podhome::types::CreateEpisodeRequest;
use crate::domains::podhome::validation::{require_iso8601, require_url};
use crate::domains::podhome::ValidationError;
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
pub struct CreateEpisodeParams {
    #[schemars(description = "Public R2/S3 URL to the audio file")]
    pub file_url: String,

    #[schemars(description = "Episode title")]
    pub title: String,

    #[serde(default)]
    #[schemars(description = "Episode description/show notes")]
    pub description: Option<String>,

    #[serde(default)]
    #[schemars(description = "Episode number")]
    pub episode_nr: Option<u32>,

    #[serde(default)]
    #[schemars(description = "Season number")]
    pub season_nr: Option<u32>,

    #[serde(default)]
    #[schemars(description = "Episode webpage URL")]
    pub link: Option<String>,

    #[serde(default)]
    #[schemars(description = "ISO-8601 UTC datetime (future = scheduled)")]
    pub publish_date: Option<String>,

    #[serde(default)]
    #[schemars(description = "Run Podhome AI processing (default: false)")]
    pub use_podhome_ai: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Generate chapters (default: false)")]
    pub suggest_chapters: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Generate title and description suggestions (default: false)")]
    pub suggest_details: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Generate clips (default: false)")]
    pub suggest_clips: Option<bool>,

    #[serde(default)]
    #[schemars(description = "Run audio enhancement (default: false)")]
    pub enhance_audio: Option<bool>,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

impl CreateEpisodeParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_url("file_url", &self.file_url)?;
        if let Some(link) = &self.link {
            require_url("link", link)?;
        }
        if let Some(date) = &self.publish_date {
            require_iso8601("publish_date", date)?;
        }
        Ok(())
    }

    fn to_request(&self) -> CreateEpisodeRequest {
        CreateEpisodeRequest {
            file_url: self.file_url.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            episode_nr: self.episode_nr,
            season_nr: self.season_nr,
            link: self.link.clone(),
            publish_date: self.publish_date.clone(),
            use_podhome_ai: self.use_podhome_ai.unwrap_or(false),
            suggest_chapters: self.suggest_chapters.unwrap_or(false),
            suggest_details: self.suggest_details.unwrap_or(false),
            suggest_clips: self.suggest_clips.unwrap_or(false),
            enhance_audio: self.enhance_audio.unwrap_or(false),
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct CreateEpisodeTool;

impl CreateEpisodeTool {
    pub const NAME: &'static str = "create_episode";

    pub const DESCRIPTION: &'static str = "Create a new episode (draft) in Podhome from a public audio file URL. \
         AI processing options default to false.";

    #[instrument(skip_all, fields(tool = "create_episode", title = %params.title))]
    pub async fn execute(params: &CreateEpisodeParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = params.validate() {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .create_episode(&params.to_request())
            .await
            .map(|created| format_created_episode(&params.title, &created.episode_id));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: CreateEpisodeParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<CreateEpisodeParams>(),
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
                let params: CreateEpisodeParams = parse_arguments(arguments)?;
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

    fn params(json: serde_json::Value) -> CreateEpisodeParams {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_flags_default_to_false() {
        let p = params(serde_json::json!({
            "file_url": "https://cdn.example.com/ep.mp3",
            "title": "Pilot",
            "suggest_clips": true
        }));
        let request = p.to_request();
        assert!(!request.use_podhome_ai);
        assert!(!request.enhance_audio);
        assert!(request.suggest_clips);
    }

    #[test]
    fn test_override_fields_are_flattened() {
        let p = params(serde_json::json!({
            "file_url": "https://cdn.example.com/ep.mp3",
            "title": "Pilot",
            "podhome_api_key": "k1",
            "podhome_api_key_name": "main"
        }));
        assert_eq!(p.keys.podhome_api_key.as_deref(), Some("k1"));
        assert_eq!(p.keys.podhome_api_key_name.as_deref(), Some("main"));
    }

    #[tokio::test]
    async fn test_invalid_file_url_sends_nothing() {
        let executor = StubExecutor::new(200, r#"{"episodeId": "e1"}"#);
        let ctx = context(executor.clone());
        let p = params(serde_json::json!({ "file_url": "not a url", "title": "Pilot" }));

        let result = CreateEpisodeTool::execute(&p, &ctx).await;
        assert!(!is_error(&result));
        assert_eq!(text(&result), "Validation error: file_url must be a valid URL");
        assert!(executor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_publish_date_sends_nothing() {
        let executor = StubExecutor::new(200, r#"{"episodeId": "e1"}"#);
        let ctx = context(executor.clone());
        let p = params(serde_json::json!({
            "file_url": "https://cdn.example.com/ep.mp3",
            "title": "Pilot",
            "publish_date": "next tuesday"
        }));

        let result = CreateEpisodeTool::execute(&p, &ctx).await;
        assert_eq!(
            text(&result),
            "Validation error: publish_date must be a valid ISO-8601 datetime"
        );
        assert!(executor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_creates_draft() {
        let executor = StubExecutor::new(200, r#"{"episodeId": "e1"}"#);
        let ctx = context(executor.clone());
        let p = params(serde_json::json!({
            "file_url": "https://cdn.example.com/ep.mp3",
            "title": "Pilot",
            "podhome_api_key": "k1"
        }));

        let result = CreateEpisodeTool::execute(&p, &ctx).await;
        assert!(!is_error(&result));
        assert_eq!(text(&result), "Created episode \"Pilot\" (ID: e1)\nStatus: Draft");

        let requests = executor.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header_value("X-API-KEY"), Some("k1"));
        assert!(requests[0].url.ends_with("/api/createepisode"));
    }

    #[tokio::test]
    async fn test_remote_failure_is_error() {
        let executor = StubExecutor::new(400, "title too long");
        let ctx = context(executor);
        let p = params(serde_json::json!({
            "file_url": "https://cdn.example.com/ep.mp3",
            "title": "Pilot"
        }));

        let result = CreateEpisodeTool::execute(&p, &ctx).await;
        assert!(is_error(&result));
        assert_eq!(text(&result), "Error: Validation error: title too long");
    }
}
