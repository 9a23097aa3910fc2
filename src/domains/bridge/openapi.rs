//! OpenAPI document for ChatGPT custom GPT actions.
//!
//! The document is a fixed literal; only `servers[0].url` depends on the
//! request, so the schema URL works behind tunnels and reverse proxies.

use serde_json::{Value, json};

/// Compute the public base URL of the bridge from request headers.
///
/// Protocol comes from `X-Forwarded-Proto` (default `http`); host from
/// `X-Forwarded-Host`, then `Host`, then `localhost:<port>`. Proxies may
/// send comma-separated lists; the first (client-facing) entry is used.
pub fn resolve_base_url(
    forwarded_proto: Option<&str>,
    forwarded_host: Option<&str>,
    host: Option<&str>,
    port: u16,
) -> String {
    let protocol = first_entry(forwarded_proto).unwrap_or("http");
    let host = first_entry(forwarded_host)
        .or_else(|| first_entry(host))
        .map(str::to_string)
        .unwrap_or_else(|| format!("localhost:{}", port));
    format!("{}://{}", protocol, host)
}

fn first_entry(value: Option<&str>) -> Option<&str> {
    value
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// The OpenAPI 3.1 document describing `POST /search-books`.
pub fn openapi_document(base_url: &str) -> Value {
    json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Google Books API via MCP",
            "version": "1.0.0",
            "description": "Search Google Books API through MCP server"
        },
        "servers": [
            {
                "url": base_url,
                "description": "MCP Bridge Server"
            }
        ],
        "paths": {
            "/search-books": {
                "post": {
                    "summary": "Search for books using Google Books API",
                    "operationId": "searchBooks",
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": {
                                    "type": "object",
                                    "properties": {
                                        "q": {
                                            "type": "string",
                                            "description": "Search query for books (e.g., 'javascript', 'author:tolkien', 'subject:fiction')"
                                        }
                                    },
                                    "required": ["q"]
                                }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Search results from Google Books API",
                            "content": {
                                "application/json": {
                                    "schema": volumes_schema()
                                }
                            }
                        },
                        "400": {
                            "description": "The search query is missing or invalid",
                            "content": {
                                "application/json": { "schema": error_schema() }
                            }
                        },
                        "502": {
                            "description": "Google Books request failed (strict error mode)",
                            "content": {
                                "application/json": { "schema": error_schema() }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn volumes_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "kind": { "type": "string" },
            "totalItems": { "type": "integer" },
            "items": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "volumeInfo": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string" },
                                "authors": { "type": "array", "items": { "type": "string" } },
                                "publishedDate": { "type": "string" },
                                "description": { "type": "string" },
                                "pageCount": { "type": "integer" }
                            }
                        }
                    }
                }
            },
            "error": { "type": "string" }
        }
    })
}

fn error_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "error": { "type": "string" },
            "details": { "type": "string" }
        },
        "required": ["error"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwarded_headers_win() {
        assert_eq!(
            resolve_base_url(Some("https"), Some("example.com"), Some("10.0.0.5:3002"), 3002),
            "https://example.com"
        );
    }

    #[test]
    fn test_host_header_fallback() {
        assert_eq!(
            resolve_base_url(None, None, Some("books.local:8080"), 3002),
            "http://books.local:8080"
        );
    }

    #[test]
    fn test_localhost_fallback() {
        assert_eq!(resolve_base_url(None, None, None, 3002), "http://localhost:3002");
        assert_eq!(resolve_base_url(Some(""), Some(" "), None, 4000), "http://localhost:4000");
    }

    #[test]
    fn test_forwarded_lists_use_first_entry() {
        assert_eq!(
            resolve_base_url(Some("https, http"), Some("a.example.com, b.internal"), None, 3002),
            "https://a.example.com"
        );
    }

    #[test]
    fn test_document_shape() {
        let doc = openapi_document("https://example.com");
        assert_eq!(doc["openapi"], "3.1.0");
        assert_eq!(doc["servers"][0]["url"], "https://example.com");
        let post = &doc["paths"]["/search-books"]["post"];
        assert_eq!(post["operationId"], "searchBooks");
        assert_eq!(
            post["requestBody"]["content"]["application/json"]["schema"]["required"][0],
            "q"
        );
    }
}
