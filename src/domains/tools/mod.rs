//! Tools domain module.
//!
//! Tools are named, schema-described operations exposed to MCP clients and
//! to the REST bridge.
//!
//! ## Architecture
//!
//! - `definition.rs` - Tool definitions and argument validation
//! - `handlers.rs` - The `ToolHandler` trait every tool implements
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `discovery.rs` - Startup discovery (built-ins + manifest directory)
//! - `registry.rs` - Ordered tool registry, lookup and invocation
//! - `router.rs` - rmcp ToolRouter built from the registry (STDIO transport)
//! - `upstream.rs` - Shared HTTP client for upstream-backed tools
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! Either drop a JSON manifest into the tools directory using one of the
//! existing handler kinds, or:
//! 1. Create a new file in `definitions/` implementing `ToolHandler`
//! 2. Add it to `builtin_tools()` or give it a handler kind in
//!    `discovery.rs`

mod definition;
pub mod definitions;
pub mod discovery;
mod error;
mod handlers;
mod registry;
pub mod router;
mod upstream;

pub use definition::{FunctionEnvelope, JsonObject, ToolDefinition};
pub use discovery::{DiscoveryError, ToolDiscovery, ToolManifest, discover_tools};
pub use error::ToolError;
pub use handlers::ToolHandler;
pub use registry::ToolRegistry;
pub use router::{build_tool_router, call_tool_result};
pub use upstream::UpstreamClient;
