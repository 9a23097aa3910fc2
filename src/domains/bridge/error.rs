//! Bridge error types and their HTTP mapping.

use serde_json::{Value, json};
use thiserror::Error;

use crate::domains::tools::ToolError;

/// Errors of the `/search-books` operation.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The request carries no usable `q`.
    #[error("Search query \"q\" is required")]
    MissingQuery,

    /// `q` is present but rejected by the tool schema.
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// The search tool is not in the registry.
    #[error("Search tool not available")]
    ToolUnavailable,

    /// The upstream API failed and the tool reported it (strict mode).
    #[error("Upstream request failed")]
    Upstream(#[source] ToolError),

    /// Anything else raised by the tool.
    #[error("Internal server error")]
    Internal(#[source] ToolError),
}

impl BridgeError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingQuery | Self::InvalidQuery(_) => 400,
            // A missing search tool is a server-side misconfiguration.
            Self::ToolUnavailable | Self::Internal(_) => 500,
            Self::Upstream(_) => 502,
        }
    }

    /// JSON body for this error.
    pub fn body(&self) -> Value {
        match self {
            Self::Upstream(source) | Self::Internal(source) => json!({
                "error": self.to_string(),
                "details": source.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl From<ToolError> for BridgeError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::NotFound(_) => Self::ToolUnavailable,
            ToolError::InvalidArguments(msg) => Self::InvalidQuery(msg),
            e if e.is_upstream() => Self::Upstream(e),
            e => Self::Internal(e),
        }
    }
}
