//! Integration tests for the Midori Teehaus backend.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process HTTP tests (no database needed)
//! cargo test -p midori-integration-tests
//!
//! # PostgreSQL and live-server tests
//! DATABASE_URL=postgres://localhost DATABASE_NAME=midori_test \
//!     cargo test -p midori-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `api` - the full router driven in-process over a memory store
//! - `postgres` - the gateway against a real database
//! - `live` - a running server over HTTP

#![allow(clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use midori_server::config::ServerConfig;
use midori_server::db::Gateway;
use midori_server::routes;
use midori_server::state::AppState;

/// Largest response body the helpers will buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Configuration built only from the given variables, ignoring the
/// process environment.
#[must_use]
pub fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
    ServerConfig::from_vars(|key| {
        pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_string())
    })
    .expect("test configuration must parse")
}

/// State over a fresh in-memory store.
///
/// Keep a clone to inspect the store after driving the router.
#[must_use]
pub fn memory_state() -> AppState {
    let config = config_from(&[
        ("DATABASE_URL", "memory://"),
        ("DATABASE_NAME", "midori_test"),
    ]);
    AppState::new(config, Gateway::memory("midori_test"))
}

/// The full application over a fresh in-memory store.
#[must_use]
pub fn memory_app() -> Router {
    routes::app(memory_state())
}

/// The full application with a gateway that never initialized.
#[must_use]
pub fn unavailable_app() -> Router {
    routes::app(AppState::new(
        config_from(&[]),
        Gateway::unavailable("DATABASE_URL and DATABASE_NAME must both be set"),
    ))
}

/// Send a request and decode the JSON response body.
///
/// Non-JSON bodies come back as a JSON string.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
        .await
        .expect("response body should be readable");

    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, body)
}

/// `GET` a path.
pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request");
    send(app, request).await
}

/// `POST` a JSON body to a path.
pub async fn post_json(app: &Router, uri: &str, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request");
    send(app, request).await
}

/// Whether `id` looks like a document identifier: 24 lowercase hex digits.
#[must_use]
pub fn is_document_id(id: &str) -> bool {
    id.len() == 24 && id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

/// Base URL of a running server for live tests.
#[must_use]
pub fn live_base_url() -> String {
    std::env::var("MIDORI_BASE_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_document_id() {
        assert!(is_document_id("65f1a2b3c4d5e6f708192a3b"));
        assert!(!is_document_id("65F1A2B3C4D5E6F708192A3B"));
        assert!(!is_document_id("65f1a2b3"));
        assert!(!is_document_id("zzf1a2b3c4d5e6f708192a3b"));
    }
}
