//! Tool Registry - ordered collection of loaded tools and invocation.
//!
//! This module provides:
//! - The ordered list of tools produced by discovery
//! - Lookup by exact name (first match wins)
//! - Argument validation and dispatch for tool calls
//! - The per-source load failures recorded during discovery
//!
//! The registry is built once at startup and shared behind an `Arc`; it is
//! never mutated afterwards.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use super::{ToolDefinition, ToolError, ToolHandler};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - holds all available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
    load_failures: BTreeMap<String, String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tool. Duplicate names are kept but shadowed by the first.
    pub fn register(&mut self, tool: Arc<dyn ToolHandler>) {
        let name = tool.name().to_string();
        if self.find(&name).is_some() {
            warn!(
                "Tool '{}' is already registered; the earlier registration wins on lookup",
                name
            );
        } else {
            debug!("Registered tool: {}", name);
        }
        self.tools.push(tool);
    }

    /// Record that a tool source could not be loaded.
    pub fn record_failure(&mut self, source: impl Into<String>, error: impl Into<String>) {
        self.load_failures.insert(source.into(), error.into());
    }

    /// Number of registered tools (duplicates included).
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Get all tool names in registration order.
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Tools reachable by name: the first registration of each name.
    pub fn unique_tools(&self) -> Vec<&Arc<dyn ToolHandler>> {
        let mut seen = HashSet::new();
        self.tools
            .iter()
            .filter(|t| seen.insert(t.name().to_string()))
            .collect()
    }

    /// Definitions of all reachable tools.
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.unique_tools()
            .into_iter()
            .map(|t| t.definition())
            .collect()
    }

    /// Sources that failed to load, with their error message.
    pub fn load_failures(&self) -> &BTreeMap<String, String> {
        &self.load_failures
    }

    /// Find a tool by exact, case-sensitive name.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Invoke a tool by name.
    ///
    /// Arguments must be a JSON object satisfying the tool's parameter
    /// schema. The tool's output is returned unchanged.
    #[instrument(skip(self, arguments))]
    pub async fn invoke(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let Some(tool) = self.find(name) else {
            warn!("Unknown tool requested: {}", name);
            return Err(ToolError::not_found(name));
        };

        let arguments = match arguments {
            Value::Object(map) => map,
            Value::Null => Default::default(),
            other => {
                return Err(ToolError::invalid_arguments(format!(
                    "arguments must be a JSON object, got {}",
                    json_kind(&other)
                )));
            }
        };

        tool.definition().validate_arguments(&arguments)?;

        info!("Invoking tool: {}", name);
        tool.execute(arguments).await
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
