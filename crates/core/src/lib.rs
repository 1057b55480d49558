//! Midori Core - Record schemas and shared types.
//!
//! This crate provides the types shared by every Midori Teehaus component:
//! - `server` - The REST backend for the café website
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, constraint tables, and the
//! validation routine - no I/O, no database access, no HTTP. Validation is
//! a pure function of its input.
//!
//! # Modules
//!
//! - [`schema`] - Record kinds, constraint tables, typed records, validation
//! - [`types`] - Store-generated document identifiers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod schema;
pub mod types;

pub use schema::{
    FieldFailure, Inquiry, MenuItem, Product, Record, RecordKind, Schema, User, ValidationError,
};
pub use types::*;
