//! Tool definitions module.
//!
//! Each tool is defined in its own file. Built-in tools are registered
//! through [`builtin_tools`]; manifest tools bind a manifest definition to
//! one of the handler kinds listed in [`handler_kinds`].

pub mod google_books;
pub mod rest;

use std::sync::Arc;

pub use google_books::{SearchVolumesParams, SearchVolumesTool};
pub use rest::RestGetTool;

use super::{ToolHandler, UpstreamClient};
use crate::core::config::Config;

/// Handler kind that binds a manifest to the Google Books search operation.
pub const GOOGLE_BOOKS_SEARCH_HANDLER: &str = "google_books.search_volumes";

/// Tools registered explicitly at startup, in registration order.
pub fn builtin_tools(client: &UpstreamClient, config: &Config) -> Vec<Arc<dyn ToolHandler>> {
    vec![Arc::new(SearchVolumesTool::new(client.clone(), config))]
}

/// Handler kinds a manifest may reference.
pub fn handler_kinds() -> Vec<&'static str> {
    vec![GOOGLE_BOOKS_SEARCH_HANDLER, RestGetTool::HANDLER]
}
