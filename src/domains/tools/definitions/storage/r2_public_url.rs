//! Public URL lookup for audio stored in Cloudflare R2.
//!
//! Verifies the object exists before handing out a URL, so the URL can be
//! passed straight to `create_episode`.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::instrument;

use crate::domains::podhome::ValidationError;
use crate::domains::podhome::format::format_file_size;
use crate::domains::podhome::validation::require_non_empty;
use crate::domains::storage::{R2ObjectInfo, has_dot_segment};
use crate::domains::tools::ToolContext;

use super::super::common::{error_result, outcome_result, parse_arguments, validation_result};
#[cfg(feature = "http")]
use super::super::common::{parse_http_arguments, to_http_response};

// ============================================================================
// Tool Parameters
// ============================================================================

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetR2PublicUrlParams {
    #[schemars(description = "R2 bucket name")]
    pub bucket: String,

    #[schemars(description = "Object key (file path) within the bucket")]
    pub object_key: String,

    #[serde(default)]
    #[schemars(description = "Custom domain serving the bucket (overrides R2_PUBLIC_DOMAIN)")]
    pub custom_domain: Option<String>,
}

impl GetR2PublicUrlParams {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("bucket", &self.bucket)?;
        require_non_empty("object_key", &self.object_key)?;
        if has_dot_segment(&self.object_key) {
            return Err(ValidationError::new(
                "object_key must not contain '.' or '..' path segments",
            ));
        }
        Ok(())
    }
}

fn format_object(info: &R2ObjectInfo) -> String {
    format!(
        "R2 File: {}\nBucket: {}\nSize: {}\nPublic URL: {}",
        info.object_key,
        info.bucket,
        format_file_size(info.size_bytes),
        info.public_url
    )
}

// ============================================================================
// Tool Implementation
// ============================================================================

#[derive(Debug, Clone)]
pub struct GetR2PublicUrlTool;

impl GetR2PublicUrlTool {
    pub const NAME: &'static str = "get_r2_public_url";

    pub const DESCRIPTION: &'static str = "Get the public URL of an audio file stored in \
         Cloudflare R2, after confirming the file exists.";

    #[instrument(skip_all, fields(tool = "get_r2_public_url", bucket = %params.bucket, key = %params.object_key))]
    pub async fn execute(params: &GetR2PublicUrlParams, ctx: &ToolContext) -> CallToolResult {
        if let Err(e) = params.validate() {
            return validation_result(&e);
        }

        let client = match ctx.r2_client() {
            Ok(client) => client,
            Err(e) => return error_result(&e.to_string()),
        };

        let outcome = client
            .get_public_url(
                &params.bucket,
                &params.object_key,
                params.custom_domain.as_deref(),
            )
            .await
            .map(|info| format_object(&info));
        outcome_result(outcome)
    }

    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value, String> {
        let params: GetR2PublicUrlParams = parse_http_arguments(arguments)?;
        Ok(to_http_response(Self::execute(&params, ctx).await))
    }

    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetR2PublicUrlParams>(),
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
                let params: GetR2PublicUrlParams = parse_arguments(arguments)?;
                Ok(Self::execute(&params, &ctx).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
