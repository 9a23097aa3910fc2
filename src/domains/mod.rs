//! Domains module containing business logic organized by bounded contexts.
//!
//! - **tools**: tool definitions, discovery, registry and invocation
//! - **bridge**: the REST surface for ChatGPT custom GPT actions

pub mod bridge;
pub mod tools;
