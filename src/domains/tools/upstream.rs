//! Shared HTTP client for tools backed by a third-party REST API.
//!
//! Handles the failure modes every upstream call has to deal with (network
//! errors, non-2xx statuses, malformed JSON) and applies the configured
//! [`UpstreamErrorMode`].

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde_json::{Value, json};
use tracing::{debug, error};

use super::ToolError;
use crate::core::config::{Config, UpstreamErrorMode};

/// HTTP client shared by all upstream-backed tools.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    error_mode: UpstreamErrorMode,
}

impl UpstreamClient {
    /// Build the client from configuration.
    pub fn from_config(config: &Config) -> Result<Self, ToolError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));

        if let Some(secs) = config.upstream.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| ToolError::internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            error_mode: config.tools.upstream_errors,
        })
    }

    /// `GET url?query` and parse the body as JSON.
    pub async fn get_json(&self, url: &str, query: &[(String, String)]) -> Result<Value, ToolError> {
        debug!("GET {} ({} query params)", url, query.len());

        let response = self
            .http
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = upstream_error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(ToolError::UpstreamStatus {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ToolError::MalformedResponse(e.to_string()))
    }

    /// Apply the error mode to the outcome of an upstream call.
    ///
    /// In lenient mode upstream failures become `{"error": lenient_message}`;
    /// in strict mode they are returned as errors. Other errors always propagate.
    pub fn settle(
        &self,
        tool: &str,
        result: Result<Value, ToolError>,
        lenient_message: &str,
    ) -> Result<Value, ToolError> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.is_upstream() => {
                error!("{} failed: {}", tool, e);
                match self.error_mode {
                    UpstreamErrorMode::Lenient => Ok(json!({ "error": lenient_message })),
                    UpstreamErrorMode::Strict => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}

/// Pull a message out of an upstream error body.
///
/// Google APIs answer `{"error": {"code": .., "message": ..}}`; other APIs
/// often use a plain `{"error": "..."}` or `{"message": "..."}`.
fn upstream_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = match value.get("error") {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(err) => err.get("message").and_then(Value::as_str),
        None => value.get("message").and_then(Value::as_str),
    };
    message.map(str::to_string)
}
