//! Seed the document store from a YAML file.
//!
//! The file is a YAML list of records of one kind:
//!
//! ```yaml
//! - name: Matcha Latte
//!   price: 4.5
//!   category: Tea
//!   tags: [matcha, milk]
//! - name: Hojicha
//!   price: 3.8
//!   category: Tea
//! ```
//!
//! Every entry is validated before anything is written. If any entry fails,
//! all failures are reported and nothing is inserted.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use midori_core::{Record, RecordKind, ValidationError};

use super::CommandError;

/// Errors specific to seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The seed file is not a YAML list.
    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// One or more entries failed validation.
    #[error("{} of {total} entries failed validation", .failures.len())]
    Invalid {
        total: usize,
        /// Zero-based entry index and its failures.
        failures: Vec<(usize, ValidationError)>,
    },
}

/// Result of a seeding run.
#[derive(Debug, Default)]
pub struct SeedSummary {
    pub inserted: usize,
}

/// Parse a YAML list of untyped entries.
///
/// # Errors
///
/// Returns `SeedError::Parse` if the content is not a YAML list.
pub fn parse_entries(content: &str) -> Result<Vec<Value>, SeedError> {
    Ok(serde_yaml::from_str(content)?)
}

/// Validate every entry as `kind`.
///
/// # Errors
///
/// Returns `SeedError::Invalid` listing every failing entry.
pub fn validate_entries(kind: RecordKind, entries: &[Value]) -> Result<Vec<Record>, SeedError> {
    let mut records = Vec::with_capacity(entries.len());
    let mut failures = Vec::new();

    for (index, entry) in entries.iter().enumerate() {
        match Record::validate(kind, entry) {
            Ok(record) => records.push(record),
            Err(e) => failures.push((index, e)),
        }
    }

    if failures.is_empty() {
        Ok(records)
    } else {
        Err(SeedError::Invalid {
            total: entries.len(),
            failures,
        })
    }
}

/// Validate and insert the records in `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, any entry is
/// invalid, or the store rejects a write.
pub async fn records(kind: RecordKind, path: &Path) -> Result<SeedSummary, CommandError> {
    info!(path = %path.display(), kind = %kind, "Loading seed file");

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SeedError::Read {
            path: path.display().to_string(),
            source,
        })?;
    let entries = parse_entries(&content)?;
    info!(entries = entries.len(), "Parsed seed file");

    let records = match validate_entries(kind, &entries) {
        Ok(records) => records,
        Err(SeedError::Invalid { total, failures }) => {
            error!("Validation failed:");
            for (index, err) in &failures {
                error!("  - entry {index}: {err}");
            }
            return Err(SeedError::Invalid { total, failures }.into());
        }
        Err(e) => return Err(e.into()),
    };

    let gateway = super::connect_gateway().await?;

    let mut summary = SeedSummary::default();
    for record in &records {
        let id = gateway.create(&record.collection_name(), record).await?;
        info!(id = %id, "Inserted {kind}");
        summary.inserted += 1;
    }

    gateway.close().await;
    info!(inserted = summary.inserted, "Seeding complete!");
    Ok(summary)
}
