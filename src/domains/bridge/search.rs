//! The `/search-books` operation.
//!
//! Extracts `q` from the request body, invokes the `search_volumes` tool and
//! relays its result unchanged.

use serde_json::{Value, json};
use tracing::{info, warn};

use super::BridgeError;
use crate::domains::tools::ToolRegistry;
use crate::domains::tools::definitions::SearchVolumesTool;

/// Tool invoked by `/search-books`.
pub const SEARCH_TOOL_NAME: &str = SearchVolumesTool::NAME;

/// Extract the search query from a request body.
///
/// A missing, null or empty `q` is rejected before any tool is reached.
/// Non-string values are left to the tool schema to reject.
pub fn search_query(body: &Value) -> Result<&Value, BridgeError> {
    match body.get("q") {
        None | Some(Value::Null) => Err(BridgeError::MissingQuery),
        Some(Value::String(q)) if q.is_empty() => Err(BridgeError::MissingQuery),
        Some(q) => Ok(q),
    }
}

/// Run a book search through the registry.
pub async fn search_books(registry: &ToolRegistry, body: &Value) -> Result<Value, BridgeError> {
    let q = search_query(body)?;
    info!("Searching books: {}", q);

    registry
        .invoke(SEARCH_TOOL_NAME, json!({ "q": q }))
        .await
        .map_err(|e| {
            warn!("Error searching books: {}", e);
            BridgeError::from(e)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query() {
        assert!(matches!(search_query(&json!({})), Err(BridgeError::MissingQuery)));
        assert!(matches!(
            search_query(&json!({ "q": null })),
            Err(BridgeError::MissingQuery)
        ));
        assert!(matches!(
            search_query(&json!({ "q": "" })),
            Err(BridgeError::MissingQuery)
        ));
        assert!(matches!(search_query(&json!("q")), Err(BridgeError::MissingQuery)));
        assert_eq!(search_query(&json!({ "q": "rust" })).unwrap(), "rust");
    }

    #[tokio::test]
    async fn test_search_without_tool() {
        let registry = ToolRegistry::new();
        let err = search_books(&registry, &json!({ "q": "rust" })).await.unwrap_err();
        assert!(matches!(err, BridgeError::ToolUnavailable));
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_non_string_query_rejected_by_schema() {
        let config = crate::core::Config::default();
        let client = crate::domains::tools::UpstreamClient::from_config(&config).unwrap();
        let mut registry = ToolRegistry::new();
        registry.register(std::sync::Arc::new(SearchVolumesTool::new(client, &config)));

        let err = search_books(&registry, &json!({ "q": 7 })).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidQuery(_)));
    }
}
