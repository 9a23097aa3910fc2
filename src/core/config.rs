//! Configuration management for the bridge.
//!
//! This module provides a centralized configuration structure populated
//! from defaults, then from environment variables (a `.env` file is loaded
//! first when present).

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Tool discovery and invocation configuration.
    pub tools: ToolsConfig,

    /// Upstream API configuration.
    pub upstream: UpstreamConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// How upstream failures inside a tool are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamErrorMode {
    /// Return a normal value carrying an `error` field.
    #[default]
    Lenient,

    /// Return a distinguishable error (HTTP 502 on the bridge).
    Strict,
}

impl UpstreamErrorMode {
    /// Parse a mode name, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }
}

/// Configuration for tool discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Directory scanned recursively for tool manifests.
    pub dir: Option<PathBuf>,

    /// Whether the built-in tools are registered.
    pub builtin: bool,

    /// Reporting of upstream failures.
    pub upstream_errors: UpstreamErrorMode,
}

/// Configuration of the upstream API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the Google Books API.
    pub google_books_base_url: String,

    /// Request timeout in seconds. None waits indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Configuration for external API credentials.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Google Books API key. Anonymous access works with lower quotas.
    pub google_books_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "google_books_api_key",
                &self.google_books_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Default Google Books API base URL.
pub const GOOGLE_BOOKS_BASE_URL: &str = "https://www.googleapis.com/books/v1";

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            dir: Some(PathBuf::from("tools")),
            builtin: true,
            upstream_errors: UpstreamErrorMode::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            google_books_base_url: GOOGLE_BOOKS_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "Google Books MCP Bridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            tools: ToolsConfig::default(),
            upstream: UpstreamConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Bridge settings use the `MCP_` prefix (e.g. `MCP_LOG_LEVEL`,
    /// `MCP_TOOLS_DIR`); the listening port is `PORT` and upstream settings
    /// use the `GOOGLE_BOOKS_` prefix.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(dir) = std::env::var("MCP_TOOLS_DIR") {
            config.tools.dir = if dir.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(dir))
            };
        }

        if let Ok(builtin) = std::env::var("MCP_BUILTIN_TOOLS") {
            config.tools.builtin = builtin.to_lowercase() != "false" && builtin != "0";
        }

        if let Ok(mode) = std::env::var("MCP_UPSTREAM_ERRORS") {
            match UpstreamErrorMode::parse(&mode) {
                Some(mode) => config.tools.upstream_errors = mode,
                None => warn!(
                    "Ignoring MCP_UPSTREAM_ERRORS={:?}; expected 'lenient' or 'strict'",
                    mode
                ),
            }
        }

        if let Ok(base_url) = std::env::var("GOOGLE_BOOKS_BASE_URL") {
            config.upstream.google_books_base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("GOOGLE_BOOKS_TIMEOUT_SECS") {
            config.upstream.timeout_secs = timeout.parse().ok().filter(|secs| *secs > 0);
        }

        let api_key = std::env::var("GOOGLE_BOOKS_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        if let Some(api_key) = api_key {
            config.credentials.google_books_api_key = Some(api_key);
            info!("Google Books API key loaded from environment");
        } else {
            info!("No GOOGLE_BOOKS_API_KEY set; using anonymous Google Books access");
        }

        config
    }
}
