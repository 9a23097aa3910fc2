//! Google Books MCP Bridge
//!
//! Exposes the Google Books volume search as a tool that can be discovered
//! and called by MCP clients, and as a fixed REST operation described by an
//! OpenAPI document for ChatGPT custom GPT actions.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the bridge server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **tools**: tool definitions, discovery, registry and invocation
//!   - **bridge**: `/search-books` and the OpenAPI document
//!
//! # Example
//!
//! ```rust,no_run
//! use books_mcp_bridge::core::{BridgeServer, Config, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let transport = TransportService::new(config.transport.clone());
//!     let server = BridgeServer::from_config(config)?;
//!     transport.run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{BridgeServer, Config, Error, Result};
