//! End-to-end tests of the HTTP bridge against a local Google Books stub.

#![cfg(feature = "http")]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::Query,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use books_mcp_bridge::core::config::UpstreamErrorMode;
use books_mcp_bridge::core::transport::HttpConfig;
use books_mcp_bridge::core::transport::http::build_router;
use books_mcp_bridge::core::{BridgeServer, Config};

/// Stand-in for `GET /books/v1/volumes`.
///
/// `q=missing` answers 404 with a Google error body, `q=garbled` answers 200
/// with a non-JSON body, `q=slow` answers after three seconds; anything else
/// returns [`volumes_body`].
async fn volumes(Query(params): Query<HashMap<String, String>>) -> Response {
    let q = params.get("q").cloned().unwrap_or_default();
    match q.as_str() {
        "slow" => {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Json(volumes_body(&params)).into_response()
        }
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": { "code": 404, "message": "Not Found" } })),
        )
            .into_response(),
        "garbled" => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => Json(volumes_body(&params)).into_response(),
    }
}

/// Two volumes, with the received query string echoed back.
fn volumes_body(params: &HashMap<String, String>) -> Value {
    json!({
        "kind": "books#volumes",
        "totalItems": 2,
        "items": [
            { "id": "vol-1", "volumeInfo": { "title": "Programming Rust" } },
            { "id": "vol-2", "volumeInfo": { "title": "Rust in Action" } }
        ],
        "echo": params
    })
}

async fn spawn_upstream() -> SocketAddr {
    let app = Router::new().route("/books/v1/volumes", get(volumes));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn config(upstream: SocketAddr, mode: UpstreamErrorMode) -> Config {
    let mut config = Config::default();
    config.tools.dir = None;
    config.tools.upstream_errors = mode;
    config.upstream.google_books_base_url = format!("http://{}/books/v1", upstream);
    config
}

async fn app_with(config: Config) -> Router {
    let server = BridgeServer::from_config(config).unwrap();
    build_router(server, &HttpConfig::default()).unwrap()
}

async fn app(mode: UpstreamErrorMode) -> Router {
    let upstream = spawn_upstream().await;
    app_with(config(upstream, mode)).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn rpc(method: &str, params: Value) -> Request<Body> {
    post_json(
        "/mcp",
        json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params }),
    )
}

#[tokio::test]
async fn health_reports_tool_count() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "tools": 1 }));
}

#[tokio::test]
async fn root_points_at_schema_url() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        Request::get("/")
            .header("host", "books.local:8080")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"]["search"], "/search-books");
    assert_eq!(
        body["usage"]["chatgpt_schema"],
        "http://books.local:8080/openapi.json"
    );
}

#[tokio::test]
async fn openapi_honours_forwarded_headers() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        Request::get("/openapi.json")
            .header("host", "10.0.0.5:3002")
            .header("x-forwarded-proto", "https")
            .header("x-forwarded-host", "example.com")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["servers"][0]["url"], "https://example.com");
    assert_eq!(
        body["paths"]["/search-books"]["post"]["operationId"],
        "searchBooks"
    );
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        post_json("/search-books", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Search query \"q\" is required" }));
}

#[tokio::test]
async fn search_with_unparseable_body_is_bad_request() {
    let request = Request::post("/search-books")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(app(UpstreamErrorMode::Lenient).await, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Search query \"q\" is required");
}

#[tokio::test]
async fn search_with_non_string_query_is_bad_request() {
    let (status, _) = send(
        app(UpstreamErrorMode::Lenient).await,
        post_json("/search-books", json!({ "q": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_relays_upstream_body() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        post_json("/search-books", json!({ "q": "rust" })),
    )
    .await;

    let expected = volumes_body(&HashMap::from([("q".to_string(), "rust".to_string())]));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, expected);
}

#[tokio::test]
async fn search_upstream_failure_lenient() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        post_json("/search-books", json!({ "q": "missing" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "error": "An error occurred while searching for volumes." })
    );
}

#[tokio::test]
async fn search_malformed_upstream_lenient() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        post_json("/search-books", json!({ "q": "garbled" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn search_upstream_failure_strict_is_bad_gateway() {
    let (status, body) = send(
        app(UpstreamErrorMode::Strict).await,
        post_json("/search-books", json!({ "q": "missing" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Upstream request failed");
    assert_eq!(body["details"], "Upstream returned HTTP 404: Not Found");
}

#[tokio::test]
async fn search_honours_upstream_timeout() {
    let upstream = spawn_upstream().await;
    let mut config = config(upstream, UpstreamErrorMode::Strict);
    config.upstream.timeout_secs = Some(1);

    let (status, body) = send(
        app_with(config).await,
        post_json("/search-books", json!({ "q": "slow" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Upstream request failed");
}

#[tokio::test]
async fn search_without_builtin_tool_is_server_error() {
    let upstream = spawn_upstream().await;
    let mut config = config(upstream, UpstreamErrorMode::Lenient);
    config.tools.builtin = false;

    let (status, body) = send(
        app_with(config).await,
        post_json("/search-books", json!({ "q": "rust" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Search tool not available");
}

#[tokio::test]
async fn cors_preflight_is_allowed() {
    let response = app(UpstreamErrorMode::Lenient)
        .await
        .oneshot(
            Request::options("/search-books")
                .header("origin", "https://chat.openai.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn tools_lists_definitions_and_failures() {
    let upstream = spawn_upstream().await;
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("paged.json"),
        json!({
            "handler": "rest_get",
            "endpoint": format!("http://{}/books/v1/volumes", upstream),
            "definition": {
                "type": "function",
                "function": {
                    "name": "search_volumes_paged",
                    "description": "Search with paging.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "q": { "type": "string" },
                            "maxResults": { "type": "integer" }
                        },
                        "required": ["q"]
                    }
                }
            }
        })
        .to_string(),
    )
    .unwrap();
    std::fs::write(dir.path().join("broken.json"), "{").unwrap();

    let mut config = config(upstream, UpstreamErrorMode::Lenient);
    config.tools.dir = Some(dir.path().to_path_buf());
    let app = app_with(config).await;

    let (status, body) = send(
        app.clone(),
        Request::get("/tools").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["function"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["search_volumes", "search_volumes_paged"]);
    assert_eq!(body["failures"].as_object().unwrap().len(), 1);

    let (status, body) = send(
        app,
        rpc(
            "tools/call",
            json!({
                "name": "search_volumes_paged",
                "arguments": { "q": "tolkien", "maxResults": 5 }
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let relayed: Value = serde_json::from_str(text).unwrap();
    assert_eq!(relayed["echo"], json!({ "q": "tolkien", "maxResults": "5" }));
}

#[tokio::test]
async fn rpc_lists_tools() {
    let (status, body) = send(app(UpstreamErrorMode::Lenient).await, rpc("tools/list", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "search_volumes");
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["q"]));
}

#[tokio::test]
async fn rpc_calls_search_tool() {
    let (status, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        rpc(
            "tools/call",
            json!({ "name": "search_volumes", "arguments": { "q": "rust" } }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["isError"], false);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    let relayed: Value = serde_json::from_str(text).unwrap();
    assert_eq!(relayed["totalItems"], 2);
}

#[tokio::test]
async fn rpc_unknown_tool_is_invalid_params() {
    let (_, body) = send(
        app(UpstreamErrorMode::Lenient).await,
        rpc("tools/call", json!({ "name": "nope", "arguments": {} })),
    )
    .await;

    assert_eq!(body["error"]["code"], -32602);
}

#[tokio::test]
async fn rpc_unknown_method() {
    let (status, body) = send(app(UpstreamErrorMode::Lenient).await, rpc("resources/list", json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["error"]["message"], "Method not found");
}
