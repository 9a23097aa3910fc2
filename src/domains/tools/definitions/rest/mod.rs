//! Generic REST tools configured entirely from manifests.

pub mod get;

pub use get::RestGetTool;
