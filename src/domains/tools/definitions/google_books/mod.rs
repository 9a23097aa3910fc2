//! Google Books tools.
//!
//! - `search_volumes`: full-text volume search

pub mod search_volumes;

pub use search_volumes::{SearchVolumesParams, SearchVolumesTool};
