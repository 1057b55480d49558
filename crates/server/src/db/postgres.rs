//! `PostgreSQL`-backed document store.
//!
//! # Table: `documents`
//!
//! | column       | type          |                                  |
//! |--------------|---------------|----------------------------------|
//! | `seq`        | `BIGSERIAL`   | insertion order                  |
//! | `id`         | `BYTEA`       | 12-byte [`DocumentId`], unique   |
//! | `collection` | `TEXT`        | collection name                  |
//! | `body`       | `JSONB`       | document fields                  |
//!
//! Filters become `body -> field = value` comparisons, so equality follows
//! JSONB semantics (`4` equals `4.0`).
//!
//! Queries are built at runtime; there is no compile-time checked SQL here
//! because the document bodies are schemaless.

use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};

use midori_core::DocumentId;

use super::{Filter, StorageError, StoredDocument};

/// Document store on a `PostgreSQL` connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a connection pool to `database_name` on the server at `url`.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the URL is invalid or the connection cannot
    /// be established.
    pub async fn connect(url: &SecretString, database_name: &str) -> Result<Self, sqlx::Error> {
        let options = PgConnectOptions::from_str(url.expose_secret())?.database(database_name);
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(2)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert one document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the write is rejected.
    pub async fn insert(
        &self,
        collection: &str,
        id: DocumentId,
        body: &Map<String, Value>,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO documents (id, collection, body)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(id)
        .bind(collection)
        .bind(Json(body))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Documents in a collection matching the filter, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        let mut query: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT id, body FROM documents WHERE collection = ");
        query.push_bind(collection.to_owned());

        for (field, value) in filter.iter() {
            query.push(" AND body -> ");
            query.push_bind(field.clone());
            query.push(" = ");
            query.push_bind(Json(value.clone()));
        }

        query.push(" ORDER BY seq");

        let rows: Vec<(DocumentId, Json<Map<String, Value>>)> =
            query.build_query_as().fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| StoredDocument { id, body })
            .collect())
    }

    /// Sorted names of non-empty collections.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the query fails.
    pub async fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        let names = sqlx::query_scalar::<_, String>(
            r"
            SELECT DISTINCT collection
            FROM documents
            ORDER BY collection
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    /// Round-trip a trivial query.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Database` if the server does not answer.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
