//! Episode metadata update. Only the fields given are sent; `null` leaves a
//! field unchanged.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::ValidationError;
use crate::domains::podhome::format::format_updated_episode;
use crate::domains::podhome::types::UpdateEpisodeRequest;
use crate::domains::podhome::validation::{require_url, require_uuid};
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
pub struct UpdateEpisodeParams {
    #[schemars(description = "UUID of the episode")]
    pub episode_id: String,

    #[serde(default)]
    #[schemars(description = "New title")]
    pub title: Option<String>,

    #[serde(default)]
    #[schemars(description = "New description/show notes")]
    pub description: Option<String>,

    #[serde(default)]
    #[schemars(description = "New episode number")]
    pub episode_nr: Option<u32>,

    #[serde(default)]
    #[schemars(description = "New season number")]
    pub season_nr: Option<u32>,

    #[serde(default)]
    #[schemars(description = "New episode artwork URL")]
    pub image_url: Option<String>,

    #[serde(flatten)]
    pub keys: ApiKeyOverride,
}

impl UpdateEpisodeParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_uuid("episode_id", &self.episode_id)?;
        if let Some(image_url) = &self.image_url {
            require_url("image_url", image_url)?;
        }
        Ok(())
    }

    fn to_request(&self) -> UpdateEpisodeRequest {
        UpdateEpisodeRequest {
            episode_id: self.episode_id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            episode_nr: self.episode_nr,
            season_nr: self.season_nr,
            image_url: self.image_url.clone(),
        }
    }
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct UpdateEpisodeTool;

impl UpdateEpisodeTool {
    pub const NAME: &'static str = "update_episode";

    pub const DESCRIPTION: &'static str =
        "Update an episode's title, description, numbering or artwork. Omitted fields are left unchanged.";

    #[instrument(skip_all, fields(tool = "update_episode", episode_id = %params.episode_id))]
    pub async fn execute(params: &UpdateEpisodeParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = params.validate() {
            return validation_result(&e);
        }

        let client = match ctx.podhome_client(&params.keys) {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .update_episode(&params.to_request())
            .await
            .map(|updated| format_updated_episode(&updated));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: UpdateEpisodeParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<UpdateEpisodeParams>(),
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
                let params: UpdateEpisodeParams = parse_arguments(arguments)?;
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

    fn params(json: serde_json::Value) -> UpdateEpisodeParams {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_null_fields_are_not_sent() {
        let p = params(serde_json::json!({
            "episode_id": EPISODE_ID,
            "title": "Renamed",
            "description": null
        }));
        let body = serde_json::to_value(p.to_request()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "episode_id": EPISODE_ID, "title": "Renamed" })
        );
    }

    #[tokio::test]
    async fn test_rejects_bad_image_url() {
        let executor = StubExecutor::new(200, "{}");
        let ctx = context(executor.clone());
        let p = params(serde_json::json!({ "episode_id": EPISODE_ID, "image_url": "cover.png" }));

        let result = UpdateEpisodeTool::execute(&p, &ctx).await;
        assert_eq!(text(&result), "Validation error: image_url must be a valid URL");
        assert!(executor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_reports_changed_fields() {
        let response = serde_json::json!({
            "episode_id": EPISODE_ID,
            "title": "Renamed",
            "season_nr": 2
        })
        .to_string();
        let executor = StubExecutor::new(200, &response);
        let ctx = context(executor.clone());
        let p = params(serde_json::json!({
            "episode_id": EPISODE_ID,
            "title": "Renamed",
            "season_nr": 2
        }));

        let result = UpdateEpisodeTool::execute(&p, &ctx).await;
        assert_eq!(
            text(&result),
            format!("Updated episode {}\nChanged: title, season_nr", EPISODE_ID)
        );
        assert_eq!(executor.requests()[0].method, reqwest::Method::PUT);
    }
}
