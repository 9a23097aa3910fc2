//! Google Books volume search tool.
//!
//! Wraps `GET {base}/volumes?q=<query>` and relays the upstream JSON body
//! unchanged.

use rmcp::handler::server::tool::cached_schema_for_type;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::core::config::Config;
use crate::domains::tools::{JsonObject, ToolDefinition, ToolError, ToolHandler, UpstreamClient};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the volume search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchVolumesParams {
    /// The search query for volumes.
    #[schemars(
        description = "The search query for volumes (e.g. 'javascript', 'inauthor:tolkien', 'subject:fiction')."
    )]
    pub q: String,
}

/// Fields of the upstream response we look at for logging.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesSummary {
    #[serde(default)]
    total_items: Option<u64>,
    #[serde(default)]
    items: Vec<Value>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Google Books volume search tool.
pub struct SearchVolumesTool {
    definition: ToolDefinition,
    client: UpstreamClient,
    base_url: String,
    api_key: Option<String>,
}

impl SearchVolumesTool {
    /// Tool name as registered in the registry.
    pub const NAME: &'static str = "search_volumes";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search for volumes in the Google Books API.";

    /// Payload returned in lenient mode when the upstream call fails.
    pub const LENIENT_ERROR: &'static str = "An error occurred while searching for volumes.";

    /// Built-in tool with its default definition.
    pub fn new(client: UpstreamClient, config: &Config) -> Self {
        Self::with_definition(Self::default_definition(), client, config)
    }

    /// Same operation advertised under a manifest-provided definition.
    pub fn with_definition(definition: ToolDefinition, client: UpstreamClient, config: &Config) -> Self {
        Self {
            definition,
            client,
            base_url: config.upstream.google_books_base_url.clone(),
            api_key: config
                .credentials
                .google_books_api_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        }
    }

    /// The default definition, schema derived from [`SearchVolumesParams`].
    pub fn default_definition() -> ToolDefinition {
        let schema = cached_schema_for_type::<SearchVolumesParams>();
        ToolDefinition::new(
            Self::NAME,
            Self::DESCRIPTION,
            Value::Object(schema.as_ref().clone()),
        )
    }

    /// URL of the volumes collection.
    pub fn volumes_url(&self) -> String {
        format!("{}/volumes", self.base_url.trim_end_matches('/'))
    }

    fn query(&self, params: &SearchVolumesParams) -> Vec<(String, String)> {
        let mut query = vec![("q".to_string(), params.q.clone())];
        if let Some(key) = &self.api_key {
            query.push(("key".to_string(), key.clone()));
        }
        query
    }

    async fn search(&self, params: &SearchVolumesParams) -> Result<Value, ToolError> {
        let data = self
            .client
            .get_json(&self.volumes_url(), &self.query(params))
            .await?;

        if let Ok(summary) = serde_json::from_value::<VolumesSummary>(data.clone()) {
            debug!(
                "Google Books answered: totalItems={:?}, {} items in page",
                summary.total_items,
                summary.items.len()
            );
        }

        Ok(data)
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchVolumesTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    #[instrument(skip_all, fields(tool = %self.definition.name))]
    async fn execute(&self, arguments: JsonObject) -> Result<Value, ToolError> {
        let params: SearchVolumesParams = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        info!("Searching volumes for query: {}", params.q);

        let result = self.search(&params).await;
        self.client
            .settle(&self.definition.name, result, Self::LENIENT_ERROR)
    }
}
