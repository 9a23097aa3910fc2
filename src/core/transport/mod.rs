//! Transport layer for the bridge.
//!
//! This module provides two transports:
//! - **HTTP**: REST bridge routes plus MCP JSON-RPC over POST - feature: `http`
//! - **STDIO**: MCP over standard input/output - feature: `stdio`
//!
//! Both serve the same `BridgeServer` and therefore the same tool registry.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
