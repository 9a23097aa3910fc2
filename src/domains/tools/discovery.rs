//! Tool discovery - builds the [`ToolRegistry`] at startup.
//!
//! Two sources, in order:
//!
//! 1. Built-in tools registered explicitly (see [`builtin_tools`]).
//! 2. JSON tool manifests found by recursively scanning the tools directory.
//!    A manifest binds a definition to a compiled-in handler kind:
//!
//! ```json
//! {
//!   "handler": "rest_get",
//!   "endpoint": "https://www.googleapis.com/books/v1/volumes",
//!   "definition": { "type": "function", "function": { "name": "...", "description": "...", "parameters": { ... } } }
//! }
//! ```
//!
//! A manifest that cannot be loaded is skipped and recorded in the
//! registry's load failures; it never aborts discovery. A missing tools
//! directory only yields a warning.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::definitions::{
    GOOGLE_BOOKS_SEARCH_HANDLER, RestGetTool, SearchVolumesTool, builtin_tools, handler_kinds,
};
use super::{FunctionEnvelope, ToolDefinition, ToolError, ToolHandler, ToolRegistry, UpstreamClient};
use crate::core::config::Config;

/// Errors that make a single manifest unusable.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The manifest file could not be read.
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest is not valid JSON or lacks required fields.
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// The manifest names a handler kind that is not compiled in.
    #[error("unknown handler '{handler}' (known: {known})")]
    UnknownHandler { handler: String, known: String },

    /// The definition is malformed.
    #[error("invalid tool definition: {0}")]
    InvalidDefinition(String),

    /// The handler needs an endpoint and none was given.
    #[error("handler '{0}' requires an 'endpoint'")]
    MissingEndpoint(String),

    /// The endpoint is not a usable URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// On-disk tool manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolManifest {
    /// Handler kind implementing the operation.
    pub handler: String,

    /// Endpoint for handlers that call a configurable URL.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Definition in the function envelope.
    pub definition: FunctionEnvelope,
}

impl ToolManifest {
    /// Read and parse a manifest file.
    pub fn from_path(path: &Path) -> Result<Self, DiscoveryError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Bind the manifest to its handler.
    pub fn into_handler(
        self,
        client: &UpstreamClient,
        config: &Config,
    ) -> Result<Arc<dyn ToolHandler>, DiscoveryError> {
        let definition =
            ToolDefinition::from_envelope(self.definition).map_err(DiscoveryError::InvalidDefinition)?;

        match self.handler.as_str() {
            GOOGLE_BOOKS_SEARCH_HANDLER => Ok(Arc::new(SearchVolumesTool::with_definition(
                definition,
                client.clone(),
                config,
            ))),
            RestGetTool::HANDLER => {
                let endpoint = self
                    .endpoint
                    .ok_or_else(|| DiscoveryError::MissingEndpoint(self.handler.clone()))?;
                let tool = RestGetTool::new(definition, &endpoint, client.clone())
                    .map_err(DiscoveryError::InvalidEndpoint)?;
                Ok(Arc::new(tool))
            }
            _ => Err(DiscoveryError::UnknownHandler {
                handler: self.handler,
                known: handler_kinds().join(", "),
            }),
        }
    }
}

/// Discovers tools according to the configuration.
pub struct ToolDiscovery<'a> {
    config: &'a Config,
    client: UpstreamClient,
}

impl<'a> ToolDiscovery<'a> {
    pub fn new(config: &'a Config, client: UpstreamClient) -> Self {
        Self { config, client }
    }

    /// Run discovery. Never fails; problems end up in the load failures.
    pub fn discover(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();

        if self.config.tools.builtin {
            for tool in builtin_tools(&self.client, self.config) {
                registry.register(tool);
            }
        } else {
            debug!("Built-in tools disabled");
        }

        if let Some(dir) = &self.config.tools.dir {
            self.scan(dir, &mut registry);
        }

        info!(
            "Discovered {} tool(s), {} load failure(s)",
            registry.len(),
            registry.load_failures().len()
        );
        registry
    }

    fn scan(&self, root: &Path, registry: &mut ToolRegistry) {
        if !root.is_dir() {
            warn!(
                "Tools directory {} not found; no manifest tools loaded",
                root.display()
            );
            return;
        }

        let mut paths = Vec::new();
        collect_manifests(root, &mut paths, registry);

        for path in paths {
            let source = path.display().to_string();
            match ToolManifest::from_path(&path)
                .and_then(|manifest| manifest.into_handler(&self.client, self.config))
            {
                Ok(tool) => {
                    info!("Loaded tool '{}' from {}", tool.name(), source);
                    registry.register(tool);
                }
                Err(e) => {
                    warn!("Skipping tool manifest {}: {}", source, e);
                    registry.record_failure(source, e.to_string());
                }
            }
        }
    }
}

/// Recursively collect `*.json` files in sorted order, skipping hidden entries.
fn collect_manifests(dir: &Path, out: &mut Vec<PathBuf>, registry: &mut ToolRegistry) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read tools directory {}: {}", dir.display(), e);
            registry.record_failure(dir.display().to_string(), e.to_string());
            return;
        }
    };

    let mut entries: Vec<_> = entries.filter_map(|entry| entry.ok()).collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            collect_manifests(&path, out, registry);
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        } else {
            debug!("Ignoring non-manifest file {}", path.display());
        }
    }
}

/// Build the tool registry for this process.
pub fn discover_tools(config: &Config) -> Result<ToolRegistry, ToolError> {
    let client = UpstreamClient::from_config(config)?;
    Ok(ToolDiscovery::new(config, client).discover())
}
