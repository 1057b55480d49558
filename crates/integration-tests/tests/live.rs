//! Smoke tests against a running server.
//!
//! These tests require:
//! - The server running (cargo run -p midori-server)
//! - A connected document store
//!
//! Run with: `MIDORI_BASE_URL=http://localhost:8000 cargo test -p midori-integration-tests -- --ignored`

#![allow(clippy::expect_used, clippy::indexing_slicing)]

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use midori_integration_tests::{is_document_id, live_base_url};

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_live_add_and_list_menu() {
    let client = Client::new();
    let base_url = live_base_url();
    let category = format!("live-{}", std::process::id());

    let resp = client
        .post(format!("{base_url}/api/menu"))
        .json(&json!({"name": "Matcha Latte", "price": 4.5, "category": category}))
        .send()
        .await
        .expect("Failed to add menu item");
    assert_eq!(resp.status(), StatusCode::OK);
    let created: Value = resp.json().await.expect("Failed to read response");
    let id = created["inserted_id"].as_str().expect("inserted_id missing");
    assert!(is_document_id(id));

    let resp = client
        .get(format!("{base_url}/api/menu?category={category}"))
        .send()
        .await
        .expect("Failed to list menu");
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Value = resp.json().await.expect("Failed to read response");
    let items = listed["items"].as_array().expect("items missing");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["_id"], id);
}

#[tokio::test]
#[ignore = "Requires running server"]
async fn test_live_diagnostics() {
    let resp = Client::new()
        .get(format!("{}/test", live_base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body["backend"], "✅ Running");
    assert_eq!(body["connection_status"], "Connected");
}
