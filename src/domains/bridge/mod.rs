//! Bridge domain - the fixed REST surface for ChatGPT custom GPT actions.
//!
//! - `search.rs` - `POST /search-books` semantics
//! - `openapi.rs` - OpenAPI document and public base URL resolution
//! - `error.rs` - Bridge errors and their HTTP status mapping
//!
//! Nothing here depends on the HTTP framework; `core::transport::http`
//! wires these functions to routes.

mod error;
pub mod openapi;
pub mod search;

pub use error::BridgeError;
pub use openapi::{openapi_document, resolve_base_url};
pub use search::{SEARCH_TOOL_NAME, search_books, search_query};
