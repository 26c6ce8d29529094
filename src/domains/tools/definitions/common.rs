//! Helpers shared by every tool definition.

use rmcp::ErrorData as McpError;
use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::domains::podhome::ValidationError;

/// Per-call key selection accepted by every Podhome tool.
#[derive(Clone, Default, Deserialize, JsonSchema)]
pub struct ApiKeyOverride {
    /// Explicit API key for this call.
    #[serde(default)]
    #[schemars(description = "Override the Podhome API key for this request")]
    pub podhome_api_key: Option<String>,

    /// Name of a key from the configured key mapping.
    #[serde(default)]
    #[schemars(
        description = "Select a named key from PODHOME_API_KEYS, PODHOME_API_KEYS_FILE or PODHOME_API_KEYS_DIR"
    )]
    pub podhome_api_key_name: Option<String>,
}

impl std::fmt::Debug for ApiKeyOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyOverride")
            .field(
                "podhome_api_key",
                &self.podhome_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("podhome_api_key_name", &self.podhome_api_key_name)
            .finish()
    }
}

/// Successful text result.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Failed result with the message as its only content.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(format!("Error: {}", message))])
}

/// Input rejected before anything was sent. Not flagged as an error.
pub fn validation_result(err: &ValidationError) -> CallToolResult {
    info!("{}", err);
    success_result(err.to_string())
}

/// Collapse an operation outcome into a tool result.
pub fn outcome_result<E: std::fmt::Display>(outcome: Result<String, E>) -> CallToolResult {
    match outcome {
        Ok(text) => success_result(text),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Deserialize rmcp call arguments into a params struct.
pub fn parse_arguments<T: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<T, McpError> {
    let args = arguments.unwrap_or_default();
    serde_json::from_value(serde_json::Value::Object(args))
        .map_err(|e| McpError::invalid_params(e.to_string(), None))
}

/// Deserialize HTTP call arguments into a params struct.
#[cfg(feature = "http")]
pub fn parse_http_arguments<T: DeserializeOwned>(
    arguments: serde_json::Value,
) -> Result<T, String> {
    let arguments = match arguments {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| format!("Invalid arguments: {}", e))
}

/// JSON-RPC `tools/call` result body.
#[cfg(feature = "http")]
pub fn to_http_response(result: CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}
