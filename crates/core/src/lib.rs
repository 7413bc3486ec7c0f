//! Core types for MetaDB
//!
//! This crate defines the in-memory data model shared by every layer:
//! - Entry: named tree node with a typed payload and owned children
//! - EntryValue / EntryKind: the closed set of payload variants and their
//!   wire discriminants
//! - Table: named set of root entries
//! - Error: error type hierarchy

#![warn(clippy::all)]

pub mod entry;
pub mod error;
pub mod limits;
pub mod table;

pub use entry::{Entry, EntryKind, EntryValue};
pub use error::{Error, Result};
pub use limits::{validate_name, validate_value, MAX_CHILDREN, MAX_NAME_LEN, MAX_NESTING_DEPTH};
pub use table::Table;
