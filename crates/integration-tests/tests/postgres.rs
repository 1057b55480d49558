//! Gateway tests against a real `PostgreSQL` database.
//!
//! These tests require:
//! - A running `PostgreSQL` server
//! - `DATABASE_URL` and `DATABASE_NAME` in the environment
//!
//! Migrations are applied by the tests. Each test writes to its own
//! collection so runs do not interfere.
//!
//! Run with: cargo test -p midori-integration-tests -- --ignored

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]

use secrecy::SecretString;
use serde_json::json;

use midori_core::{DocumentId, MenuItem, Schema};
use midori_server::db::{Backend, Filter, Gateway, GatewayStatus, PostgresStore};

async fn gateway() -> Gateway {
    let url = SecretString::from(std::env::var("DATABASE_URL").expect("DATABASE_URL must be set"));
    let name = std::env::var("DATABASE_NAME").expect("DATABASE_NAME must be set");

    let store = PostgresStore::connect(&url, &name)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("../server/migrations")
        .run(store.pool())
        .await
        .expect("Failed to run migrations");

    Gateway::connected(Backend::Postgres(store), name)
}

/// A collection name no other run has used.
fn scratch_collection(prefix: &str) -> String {
    format!("{prefix}_{}", DocumentId::generate())
}

fn menu_item(name: &str, category: &str, price: f64) -> MenuItem {
    MenuItem::validate(&json!({"name": name, "price": price, "category": category})).unwrap()
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_create_then_find_by_category() {
    let gateway = gateway().await;
    let collection = scratch_collection("menu");

    let tea_id = gateway
        .create(&collection, &menu_item("Matcha Latte", "Tea", 4.5))
        .await
        .unwrap();
    gateway
        .create(&collection, &menu_item("Flat White", "Coffee", 3.6))
        .await
        .unwrap();

    let tea = gateway
        .find(&collection, &Filter::all().eq("category", "Tea"))
        .await
        .unwrap();
    assert_eq!(tea.len(), 1);
    assert_eq!(tea[0].id(), tea_id);

    let item: MenuItem = tea[0].decode().unwrap();
    assert_eq!(item.name(), "Matcha Latte");
    assert!((item.price() - 4.5).abs() < f64::EPSILON);

    let all = gateway.find(&collection, &Filter::all()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id(), tea_id);

    gateway.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_identical_records_get_distinct_ids() {
    let gateway = gateway().await;
    let collection = scratch_collection("menu");
    let item = menu_item("Sencha", "Tea", 3.0);

    let first = gateway.create(&collection, &item).await.unwrap();
    let second = gateway.create(&collection, &item).await.unwrap();
    assert_ne!(first, second);
    assert!(first.parse::<DocumentId>().is_ok());

    gateway.close().await;
}

#[tokio::test]
#[ignore = "Requires PostgreSQL"]
async fn test_status_lists_collections() {
    let gateway = gateway().await;
    let collection = scratch_collection("status");
    gateway
        .create(&collection, &menu_item("Hojicha", "Tea", 3.8))
        .await
        .unwrap();

    assert!(gateway.ping().await.is_ok());
    match gateway.status().await {
        GatewayStatus::Connected { collections, .. } => {
            assert!(collections.unwrap().contains(&collection));
        }
        GatewayStatus::Unavailable { reason } => panic!("gateway unavailable: {reason}"),
    }

    gateway.close().await;
}
