//! Bridge server - owns the tool registry and implements the MCP handler.
//!
//! The registry is built once by discovery and injected here; both
//! transports read it through this struct and never mutate it.
//!
//! ## Tool Architecture
//!
//! Tools live in `domains/tools/definitions/` (built-ins) or in JSON
//! manifests under the tools directory. The rmcp ToolRouter is built from
//! the registry in `domains/tools/router.rs`, so adding a tool never
//! requires touching this file.

use chrono::{DateTime, Utc};
use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::config::Config;
use super::error::Error;
use crate::domains::tools::{
    ToolError, ToolRegistry, build_tool_router, call_tool_result, discover_tools,
};

/// The bridge server handler.
///
/// Implements rmcp's `ServerHandler` for the STDIO transport and provides
/// the tool operations used by the HTTP bridge.
#[derive(Clone)]
pub struct BridgeServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tools discovered at startup.
    registry: Arc<ToolRegistry>,

    /// Process start time, reported by the root endpoint.
    started_at: DateTime<Utc>,

    /// Tool router for handling MCP tool calls.
    tool_router: ToolRouter<Self>,
}

impl BridgeServer {
    /// Create a server around an already-built registry.
    pub fn new(config: Config, registry: ToolRegistry) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(registry);

        Self {
            tool_router: build_tool_router::<Self>(registry.clone()),
            config,
            registry,
            started_at: Utc::now(),
        }
    }

    /// Validate the configuration, discover tools and create the server.
    pub fn from_config(config: Config) -> super::Result<Self> {
        reqwest::Url::parse(&config.upstream.google_books_base_url).map_err(|e| {
            Error::config(format!(
                "invalid Google Books base URL '{}': {}",
                config.upstream.google_books_base_url, e
            ))
        })?;

        let registry = discover_tools(&config)?;
        info!("Available tools: {:?}", registry.tool_names());

        Ok(Self::new(config, registry))
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// When the server was created.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all reachable tools in MCP shape (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name and shape the outcome as an MCP tool result.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<CallToolResult, ToolError> {
        call_tool_result(&self.registry, name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Search Google Books. Call `search_volumes` with a query `q` \
                 (e.g. 'javascript', 'inauthor:tolkien', 'subject:fiction')."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
