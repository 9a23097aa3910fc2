//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! The STDIO transport serves tools through rmcp's `ToolRouter`. Each
//! reachable registry entry becomes one dynamic route that dispatches back
//! into [`ToolRegistry::invoke`].

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, Tool},
};
use serde_json::Value;

use super::{ToolDefinition, ToolError, ToolRegistry};

/// Convert a definition into the rmcp Tool model.
pub fn to_mcp_tool(definition: &ToolDefinition) -> Tool {
    Tool {
        name: definition.name.clone().into(),
        description: Some(definition.description.clone().into()),
        input_schema: Arc::new(definition.parameters_object()),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Invoke a tool and shape the outcome as an MCP tool result.
///
/// Caller errors (unknown tool, invalid arguments) are returned as errors so
/// the transport can report them as protocol errors. Failures inside the
/// tool become a result with `isError: true`.
pub async fn call_tool_result(
    registry: &ToolRegistry,
    name: &str,
    arguments: Value,
) -> Result<CallToolResult, ToolError> {
    match registry.invoke(name, arguments).await {
        Ok(value) => Ok(CallToolResult::success(vec![Content::text(value.to_string())])),
        Err(e) if e.is_caller_error() => Err(e),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}

/// Build the tool router with every reachable tool in the registry.
pub fn build_tool_router<S>(registry: Arc<ToolRegistry>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    registry
        .unique_tools()
        .into_iter()
        .fold(ToolRouter::new(), |router, tool| {
            router.with_route(tool_route(registry.clone(), tool.definition()))
        })
}

fn tool_route<S>(registry: Arc<ToolRegistry>, definition: &ToolDefinition) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    let name = definition.name.clone();
    ToolRoute::new_dyn(to_mcp_tool(definition), move |ctx: ToolCallContext<'_, S>| {
        let registry = registry.clone();
        let name = name.clone();
        let args = ctx.arguments.clone().unwrap_or_default();
        async move {
            call_tool_result(&registry, &name, Value::Object(args))
                .await
                .map_err(|e| McpError::invalid_params(e.to_string(), None))
        }
        .boxed()
    })
}
