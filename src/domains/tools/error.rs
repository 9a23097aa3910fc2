//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool lookup and invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with the requested name is registered.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// The arguments do not satisfy the tool's parameter schema.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The upstream API answered with a non-success status.
    #[error("Upstream returned HTTP {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// The upstream API could not be reached.
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    /// The upstream API answered with a body that is not valid JSON.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
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

    /// Create a new "upstream" error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the caller is at fault (unknown tool or bad arguments).
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidArguments(_))
    }

    /// Whether the failure happened while talking to the upstream API.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamStatus { .. } | Self::Upstream(_) | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for ToolError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::upstream(err.to_string())
        }
    }
}
