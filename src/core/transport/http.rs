//! HTTP transport implementation.
//!
//! Serves the bridge routes:
//! - `GET /` - server summary
//! - `GET /health` - health and tool count
//! - `GET /openapi.json` - OpenAPI document for custom GPT actions
//! - `POST /search-books` - book search through the `search_volumes` tool
//! - `GET /tools` - tool definitions and discovery load failures
//! - `POST /mcp` - MCP JSON-RPC over HTTP (path configurable)

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderName, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::BridgeServer;
use crate::domains::bridge::{BridgeError, openapi_document, resolve_base_url, search_books};

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }

    /// Internal error.
    pub fn internal_error(id: Option<Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32603, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// The bridge server instance.
    server: BridgeServer,
    /// Listening port, used when the request carries no host.
    port: u16,
    /// Path of the JSON-RPC endpoint.
    rpc_path: String,
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.body())).into_response()
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport.
    pub async fn run(self, server: BridgeServer) -> TransportResult<()> {
        let addr = self.address();
        let tool_count = server.registry().len();
        let app = build_router(server, &self.config)?;

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!(
            "Google Books MCP Bridge listening on {} ({} tool(s), CORS {})",
            addr, tool_count, cors_status
        );
        info!("  → OpenAPI:  GET /openapi.json");
        info!("  → Search:   POST /search-books");
        info!("  → Tools:    GET /tools");
        info!("  → JSON-RPC: POST {}", self.config.rpc_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Fixed routes; the JSON-RPC path must not collide with any of them.
const BRIDGE_ROUTES: &[&str] = &["/", "/health", "/openapi.json", "/search-books", "/tools"];

/// Check the configured JSON-RPC path can be mounted.
pub fn validate_rpc_path(path: &str) -> TransportResult<()> {
    if !path.starts_with('/') {
        return Err(TransportError::init(format!(
            "JSON-RPC path '{}' must start with '/'",
            path
        )));
    }
    if path.contains(['{', '}', ':', '*']) {
        return Err(TransportError::init(format!(
            "JSON-RPC path '{}' must not contain route parameters",
            path
        )));
    }
    if BRIDGE_ROUTES.contains(&path) {
        return Err(TransportError::init(format!(
            "JSON-RPC path '{}' collides with a bridge route",
            path
        )));
    }
    Ok(())
}

/// Build the bridge router.
pub fn build_router(server: BridgeServer, config: &HttpConfig) -> TransportResult<Router> {
    validate_rpc_path(&config.rpc_path)?;

    let state = AppState {
        server,
        port: config.port,
        rpc_path: config.rpc_path.clone(),
    };

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/openapi.json", get(openapi_handler))
        .route("/search-books", post(search_books_handler))
        .route("/tools", get(tools_handler))
        .route(&config.rpc_path, post(handle_rpc))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    // Add CORS if enabled
    if config.enable_cors {
        app = app.layer(cors_layer());
    }

    Ok(app)
}

/// CORS policy for browser and custom GPT clients.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            HeaderName::from_static("x-requested-with"),
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// Public base URL of this request, honouring proxy headers.
fn request_base_url(headers: &HeaderMap, port: u16) -> String {
    resolve_base_url(
        header_str(headers, "x-forwarded-proto"),
        header_str(headers, "x-forwarded-host"),
        header_str(headers, "host"),
        port,
    )
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Root handler - provides server info.
async fn root_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let base_url = request_base_url(&headers, state.port);
    Json(json!({
        "name": state.server.name(),
        "description": "MCP server for searching Google Books API",
        "version": state.server.version(),
        "status": "running",
        "started_at": state.server.started_at().to_rfc3339(),
        "endpoints": {
            "openapi": "/openapi.json",
            "search": "/search-books",
            "health": "/health",
            "tools": "/tools",
            "mcp": state.rpc_path
        },
        "usage": {
            "chatgpt_schema": format!("{}/openapi.json", base_url)
        }
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "tools": state.server.registry().len()
    }))
}

/// OpenAPI document with the server URL of this request.
async fn openapi_handler(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    Json(openapi_document(&request_base_url(&headers, state.port)))
}

/// Tool definitions and discovery failures.
async fn tools_handler(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.server.registry();
    let tools: Vec<Value> = registry
        .definitions()
        .into_iter()
        .map(|d| d.to_function_json())
        .collect();
    Json(json!({
        "tools": tools,
        "failures": registry.load_failures()
    }))
}

/// Search books through the `search_volumes` tool.
#[instrument(skip_all)]
async fn search_books_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, BridgeError> {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            warn!("Rejected /search-books body: {}", rejection.body_text());
            return Err(BridgeError::MissingQuery);
        }
    };

    let result = search_books(state.server.registry(), &body).await?;
    Ok(Json(result))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", request.method.as_str());
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),

        "ping" => JsonRpcResponse::success(request.id, json!({})),

        "tools/list" => handle_tools_list(state, request),

        "tools/call" => handle_tools_call(state, request).await,

        // Notifications (no response needed for stateless HTTP)
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", method);
            JsonRpcResponse::success(request.id, Value::Null)
        }

        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing initialize request");

    let result = json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": "Search Google Books with the search_volumes tool."
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/list request");

    let tools = state.server.list_tools();
    JsonRpcResponse::success(request.id, json!({ "tools": tools }))
}

/// Handle tools/call request.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    info!("Processing tools/call request");

    let params = match request.params {
        Some(p) => p,
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing params"),
    };

    let name = match params.get("name").and_then(|v| v.as_str()) {
        Some(n) => n.to_string(),
        None => return JsonRpcResponse::invalid_params(request.id.clone(), "Missing tool name"),
    };

    let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

    match state.server.call_tool(&name, arguments).await {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::internal_error(request.id, e.to_string()),
        },
        Err(e) => JsonRpcResponse::invalid_params(request.id, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::tools::ToolRegistry;

    #[test]
    fn test_validate_rpc_path() {
        assert!(validate_rpc_path("/mcp").is_ok());
        assert!(validate_rpc_path("/api/rpc").is_ok());
        assert!(validate_rpc_path("mcp").is_err());
        assert!(validate_rpc_path("").is_err());
        assert!(validate_rpc_path("/search-books").is_err());
        assert!(validate_rpc_path("/").is_err());
        assert!(validate_rpc_path("/rpc/{id}").is_err());
        assert!(validate_rpc_path("/rpc/*rest").is_err());
    }

    #[test]
    fn test_build_router_rejects_bad_rpc_path() {
        let server = BridgeServer::new(Config::default(), ToolRegistry::new());
        for path in ["mcp", "/search-books"] {
            let config = HttpConfig {
                rpc_path: path.to_string(),
                ..HttpConfig::default()
            };
            assert!(matches!(
                build_router(server.clone(), &config),
                Err(TransportError::InitError(_))
            ));
        }
        assert!(build_router(server, &HttpConfig::default()).is_ok());
    }
}
