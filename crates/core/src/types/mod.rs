//! Core types for the Midori Teehaus backend.
//!
//! This module provides type-safe wrappers for store-level concepts.

pub mod id;

pub use id::{DOCUMENT_ID_LEN, DocumentId, IdError};
