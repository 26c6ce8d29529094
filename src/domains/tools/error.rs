//! Tool-specific error types.

use thiserror::Error;

/// Errors raised while dispatching a tool call, before the tool itself runs.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments did not match the tool's parameters.
    #[error("{0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            ToolError::not_found("fs_delete").to_string(),
            "Tool not found: fs_delete"
        );
        assert_eq!(
            ToolError::invalid_arguments("Invalid arguments: missing field `title`").to_string(),
            "Invalid arguments: missing field `title`"
        );
    }
}
