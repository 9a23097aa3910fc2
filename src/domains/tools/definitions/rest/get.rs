//! Manifest-driven REST GET tool.
//!
//! Calls a fixed endpoint with the tool arguments encoded as query
//! parameters and relays the JSON response.

use reqwest::Url;
use serde_json::Value;
use tracing::{info, instrument};

use crate::domains::tools::{JsonObject, ToolDefinition, ToolError, ToolHandler, UpstreamClient};

/// Generic GET tool bound to one endpoint.
pub struct RestGetTool {
    definition: ToolDefinition,
    endpoint: Url,
    client: UpstreamClient,
    lenient_message: String,
}

impl RestGetTool {
    /// Handler kind used in tool manifests.
    pub const HANDLER: &'static str = "rest_get";

    /// Create the tool, checking the endpoint is an absolute http(s) URL.
    pub fn new(
        definition: ToolDefinition,
        endpoint: &str,
        client: UpstreamClient,
    ) -> Result<Self, String> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| format!("invalid endpoint '{}': {}", endpoint, e))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(format!(
                "endpoint scheme must be http or https, found '{}'",
                endpoint.scheme()
            ));
        }

        let lenient_message = format!("An error occurred while calling {}.", definition.name);
        Ok(Self {
            definition,
            endpoint,
            client,
            lenient_message,
        })
    }
}

/// Encode arguments as query pairs. Arrays of scalars repeat the key.
fn query_pairs(arguments: &JsonObject) -> Result<Vec<(String, String)>, ToolError> {
    let mut pairs = Vec::with_capacity(arguments.len());
    for (key, value) in arguments {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar(key, item)?));
                }
            }
            other => pairs.push((key.clone(), scalar(key, other)?)),
        }
    }
    Ok(pairs)
}

fn scalar(key: &str, value: &Value) -> Result<String, ToolError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(ToolError::invalid_arguments(format!(
            "field '{}' cannot be sent as a query parameter",
            key
        ))),
    }
}

#[async_trait::async_trait]
impl ToolHandler for RestGetTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    #[instrument(skip_all, fields(tool = %self.definition.name))]
    async fn execute(&self, arguments: JsonObject) -> Result<Value, ToolError> {
        let query = query_pairs(&arguments)?;
        info!("Calling {} with {} query params", self.endpoint, query.len());

        let result = self.client.get_json(self.endpoint.as_str(), &query).await;
        self.client
            .settle(&self.definition.name, result, &self.lenient_message)
    }
}
