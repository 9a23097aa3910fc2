//! Tool handler trait.
//!
//! Every tool module implements [`ToolHandler`]: it owns its
//! [`ToolDefinition`] and knows how to execute itself against a JSON
//! argument mapping. Tools are held as `Arc<dyn ToolHandler>` in the
//! [`ToolRegistry`](super::ToolRegistry) for the lifetime of the process.

use serde_json::Value;

use super::{JsonObject, ToolDefinition, ToolError};

#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// The definition advertised to clients.
    fn definition(&self) -> &ToolDefinition;

    /// Name of this tool.
    fn name(&self) -> &str {
        &self.definition().name
    }

    /// Execute the tool with already-validated arguments.
    async fn execute(&self, arguments: JsonObject) -> Result<Value, ToolError>;
}
