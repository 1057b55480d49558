//! In-process document store.
//!
//! Collections live in a map guarded by a `RwLock`. Each collection is a
//! `Vec` so iteration order is insertion order. The lock is never held
//! across an await point.

use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{Map, Value};

use midori_core::DocumentId;

use super::{Filter, StorageError, StoredDocument};

/// Volatile document store backed by process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<StoredDocument>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document to a collection, creating the collection on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if a previous writer panicked.
    pub fn insert(
        &self,
        collection: &str,
        id: DocumentId,
        body: Map<String, Value>,
    ) -> Result<(), StorageError> {
        let mut collections = self
            .collections
            .write()
            .map_err(|_| StorageError::Poisoned)?;
        collections
            .entry(collection.to_owned())
            .or_default()
            .push(StoredDocument { id, body });
        Ok(())
    }

    /// Documents in a collection matching the filter, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if a previous writer panicked.
    pub fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StorageError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(&doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Sorted names of non-empty collections.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Poisoned` if a previous writer panicked.
    pub fn collection_names(&self) -> Result<Vec<String>, StorageError> {
        let collections = self
            .collections
            .read()
            .map_err(|_| StorageError::Poisoned)?;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort_unstable();
        Ok(names)
    }
}
