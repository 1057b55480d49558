//! Document store gateway.
//!
//! The [`Gateway`] is the only way handlers touch persistence. It stores
//! self-describing JSON documents in named collections and has two states:
//!
//! - **Connected** - operations reach a backend
//! - **Unavailable** - initialization failed; every operation fails fast with
//!   [`StorageError::Unavailable`] and only [`Gateway::status`] still works
//!
//! A gateway never changes state after construction. Recovering from
//! Unavailable means restarting the process.
//!
//! # Backends
//!
//! - [`PostgresStore`] - documents as JSONB rows in a single `documents`
//!   table, keyed by collection name
//! - [`MemoryStore`] - in-process, for tests and local development
//!
//! # Identifiers
//!
//! Backends work with [`DocumentId`]. [`Document::from_stored`] is the only
//! place a stored document leaves the gateway, and it replaces the native id
//! with its hex string under [`ID_FIELD`].
//!
//! # Migrations
//!
//! The `documents` table is created by migrations in `crates/server/migrations/`:
//! ```bash
//! cargo run -p midori-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{error, info, instrument, warn};

use midori_core::DocumentId;

use crate::config::DatabaseConfig;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// External field name carrying a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The gateway never connected.
    #[error("database unavailable: {0}")]
    Unavailable(String),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record did not serialize to a JSON object.
    #[error("record must serialize to a JSON object")]
    NotADocument,

    /// A record could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The in-memory store's lock was poisoned by a panicking writer.
    #[error("memory store lock poisoned")]
    Poisoned,
}

/// A document as held by a backend, with its native identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: Map<String, Value>,
}

/// A document as returned to callers: identifier as a string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "_id")]
    id: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Document {
    /// Convert a stored document for callers.
    #[must_use]
    pub fn from_stored(stored: StoredDocument) -> Self {
        Self {
            id: stored.id.to_hex(),
            fields: stored.body,
        }
    }

    /// Identifier in string form.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Document body without the identifier.
    #[must_use]
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Decode the body into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StorageError> {
        Ok(serde_json::from_value(Value::Object(self.fields.clone()))?)
    }
}

/// An equality filter: every listed field must equal its value.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// Match all documents.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field/value pairs of the filter.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Whether a document body satisfies the filter.
    #[must_use]
    pub fn matches(&self, body: &Map<String, Value>) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| body.get(field) == Some(expected))
    }
}

/// A connected backend.
#[derive(Debug)]
pub enum Backend {
    Postgres(PostgresStore),
    Memory(MemoryStore),
}

#[derive(Debug)]
enum GatewayState {
    Connected {
        backend: Backend,
        database_name: String,
    },
    Unavailable {
        reason: String,
    },
}

/// Diagnostic snapshot of the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Connected {
        database_name: String,
        /// Collection names, or the error from listing them.
        collections: Result<Vec<String>, String>,
    },
    Unavailable {
        reason: String,
    },
}

/// The process-wide document store handle.
#[derive(Debug)]
pub struct Gateway {
    state: GatewayState,
}

impl Gateway {
    /// Connect to `PostgreSQL` using the configured URL and database name.
    ///
    /// Never fails: missing settings or an unreachable server produce an
    /// unavailable gateway, logged at warn/error level.
    pub async fn connect(config: &DatabaseConfig) -> Self {
        let (Some(url), Some(name)) = (config.url.as_ref(), config.name.as_deref()) else {
            warn!(
                database_url_set = config.url_is_set(),
                database_name_set = config.name_is_set(),
                "Database not configured, document store unavailable"
            );
            return Self::unavailable("DATABASE_URL and DATABASE_NAME must both be set");
        };

        match PostgresStore::connect(url, name).await {
            Ok(store) => {
                info!(database = %name, "Connected to document store");
                Self::connected(Backend::Postgres(store), name)
            }
            Err(e) => {
                error!(error = %e, database = %name, "Failed to connect to document store");
                Self::unavailable(e.to_string())
            }
        }
    }

    /// A connected gateway over a fresh in-memory store.
    #[must_use]
    pub fn memory(database_name: impl Into<String>) -> Self {
        Self::connected(Backend::Memory(MemoryStore::new()), database_name)
    }

    /// A gateway that was never initialized.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: GatewayState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    /// A connected gateway over an existing backend.
    #[must_use]
    pub fn connected(backend: Backend, database_name: impl Into<String>) -> Self {
        Self {
            state: GatewayState::Connected {
                backend,
                database_name: database_name.into(),
            },
        }
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        matches!(self.state, GatewayState::Connected { .. })
    }

    fn backend(&self) -> Result<&Backend, StorageError> {
        match &self.state {
            GatewayState::Connected { backend, .. } => Ok(backend),
            GatewayState::Unavailable { reason } => Err(StorageError::Unavailable(reason.clone())),
        }
    }

    /// Insert a record as a new document and return its identifier.
    ///
    /// Null fields are left out of the stored document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when not connected,
    /// `StorageError::NotADocument` if the record is not a JSON object, or
    /// the backend's error if the write is rejected.
    #[instrument(skip(self, record))]
    pub async fn create<T: Serialize + Sync>(
        &self,
        collection: &str,
        record: &T,
    ) -> Result<String, StorageError> {
        let backend = self.backend()?;
        let body = to_body(record)?;
        let id = DocumentId::generate();

        match backend {
            Backend::Postgres(store) => store.insert(collection, id, &body).await?,
            Backend::Memory(store) => store.insert(collection, id, body)?,
        }

        info!(collection, id = %id, "Document created");
        Ok(id.to_hex())
    }

    /// Find all documents in a collection matching the filter.
    ///
    /// Documents come back in insertion order with their identifier as a
    /// string.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when not connected, or the
    /// backend's error if the read fails.
    #[instrument(skip(self))]
    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<Document>, StorageError> {
        let stored = match self.backend()? {
            Backend::Postgres(store) => store.find(collection, filter).await?,
            Backend::Memory(store) => store.find(collection, filter)?,
        };

        Ok(stored.into_iter().map(Document::from_stored).collect())
    }

    /// Names of the collections holding at least one document, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when not connected, or the
    /// backend's error if the read fails.
    pub async fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        match self.backend()? {
            Backend::Postgres(store) => store.collection_names().await,
            Backend::Memory(store) => store.collection_names(),
        }
    }

    /// Check that the backend answers.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Unavailable` when not connected, or the
    /// backend's error if the probe fails.
    pub async fn ping(&self) -> Result<(), StorageError> {
        match self.backend()? {
            Backend::Postgres(store) => store.ping().await,
            Backend::Memory(_) => Ok(()),
        }
    }

    /// Diagnostic snapshot. Never fails.
    pub async fn status(&self) -> GatewayStatus {
        match &self.state {
            GatewayState::Connected { database_name, .. } => GatewayStatus::Connected {
                database_name: database_name.clone(),
                collections: self.collection_names().await.map_err(|e| e.to_string()),
            },
            GatewayState::Unavailable { reason } => GatewayStatus::Unavailable {
                reason: reason.clone(),
            },
        }
    }

    /// Release backend resources. Call once on shutdown.
    pub async fn close(&self) {
        if let GatewayState::Connected {
            backend: Backend::Postgres(store),
            ..
        } = &self.state
        {
            store.close().await;
            info!("Document store connection closed");
        }
    }
}

/// Serialize a record into a document body.
fn to_body<T: Serialize>(record: &T) -> Result<Map<String, Value>, StorageError> {
    let Value::Object(mut body) = serde_json::to_value(record)? else {
        return Err(StorageError::NotADocument);
    };
    body.retain(|key, value| key != ID_FIELD && !value.is_null());
    Ok(body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use midori_core::{MenuItem, Schema};

    use super::*;

    fn menu_item(name: &str, category: &str) -> MenuItem {
        MenuItem::validate(&json!({"name": name, "price": 4.5, "category": category})).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_find_round_trip() {
        let gateway = Gateway::memory("midori");
        let item = MenuItem::validate(&json!({
            "name": "Matcha Latte",
            "description": "Ceremonial grade",
            "price": 4.5,
            "category": "Tea",
            "tags": ["matcha", "iced"],
        }))
        .unwrap();

        let id = gateway.create("menuitem", &item).await.unwrap();
        let found = gateway
            .find("menuitem", &Filter::all().eq("category", "Tea"))
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), id);
        assert_eq!(found[0].decode::<MenuItem>().unwrap(), item);
    }

    #[tokio::test]
    async fn test_ids_unique_for_identical_input() {
        let gateway = Gateway::memory("midori");
        let item = menu_item("Sencha", "Tea");

        let mut ids = HashSet::new();
        for _ in 0..50 {
            ids.insert(gateway.create("menuitem", &item).await.unwrap());
        }
        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_find_filters() {
        let gateway = Gateway::memory("midori");
        gateway.create("menuitem", &menu_item("Sencha", "Tea")).await.unwrap();
        gateway.create("menuitem", &menu_item("Flat White", "Coffee")).await.unwrap();
        gateway.create("menuitem", &menu_item("Hojicha", "Tea")).await.unwrap();

        let all = gateway.find("menuitem", &Filter::all()).await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d.fields()["name"].clone()).collect();
        assert_eq!(names, [json!("Sencha"), json!("Flat White"), json!("Hojicha")]);

        let tea = gateway
            .find("menuitem", &Filter::all().eq("category", "Tea"))
            .await
            .unwrap();
        assert_eq!(tea.len(), 2);
        assert!(tea.iter().all(|d| d.fields()["category"] == "Tea"));

        let none = gateway
            .find("menuitem", &Filter::all().eq("category", "Pastry"))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_collections_are_separate() {
        let gateway = Gateway::memory("midori");
        gateway.create("menuitem", &menu_item("Sencha", "Tea")).await.unwrap();

        assert!(gateway.find("inquiry", &Filter::all()).await.unwrap().is_empty());
        assert_eq!(gateway.collection_names().await.unwrap(), ["menuitem"]);
    }

    #[tokio::test]
    async fn test_unavailable_fails_fast() {
        let gateway = Gateway::unavailable("never initialized");
        assert!(!gateway.is_connected());

        let err = gateway
            .create("menuitem", &menu_item("Sencha", "Tea"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));

        let err = gateway.find("menuitem", &Filter::all()).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(gateway.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_status_reports_state() {
        let gateway = Gateway::unavailable("never initialized");
        assert_eq!(
            gateway.status().await,
            GatewayStatus::Unavailable {
                reason: "never initialized".to_string()
            }
        );

        let gateway = Gateway::memory("midori");
        assert_eq!(
            gateway.status().await,
            GatewayStatus::Connected {
                database_name: "midori".to_string(),
                collections: Ok(vec![]),
            }
        );
    }

    #[tokio::test]
    async fn test_connect_without_settings_is_unavailable() {
        let gateway = Gateway::connect(&DatabaseConfig::default()).await;
        assert!(!gateway.is_connected());
    }

    #[test]
    fn test_to_body_strips_nulls_and_id() {
        let body = to_body(&json!({"name": "A", "subject": null, "_id": "spoofed"})).unwrap();
        assert_eq!(Value::Object(body), json!({"name": "A"}));
    }

    #[test]
    fn test_to_body_rejects_non_objects() {
        assert!(matches!(to_body(&json!([1, 2])), Err(StorageError::NotADocument)));
    }

    #[test]
    fn test_document_serializes_id_as_string() {
        let stored = StoredDocument {
            id: DocumentId::from_bytes([0x01; 12]),
            body: json!({"name": "Sencha"}).as_object().unwrap().clone(),
        };
        let doc = Document::from_stored(stored);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"_id": "010101010101010101010101", "name": "Sencha"})
        );
    }

    #[test]
    fn test_filter_matches() {
        let body = json!({"category": "Tea", "price": 3}).as_object().unwrap().clone();
        assert!(Filter::all().matches(&body));
        assert!(Filter::all().eq("category", "Tea").matches(&body));
        assert!(!Filter::all().eq("category", "Coffee").matches(&body));
        assert!(!Filter::all().eq("missing", "x").matches(&body));
    }
}
