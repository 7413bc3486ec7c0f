//! Durability layer for MetaDB
//!
//! This crate handles everything that touches bytes and disk:
//!
//! - Fixed-width little-endian reader/writer primitives
//! - The recursive entry/table/database snapshot format
//! - Whole-file snapshot load and save

#![warn(clippy::all)]

pub mod codec; // Fixed-width binary primitives
pub mod format; // Entry, table and database byte layouts
pub mod snapshot; // Whole-file load/save

pub use codec::{ByteReader, ByteWriter};
pub use format::{decode_entry, decode_table, decode_tables, encode_entry, encode_table, encode_tables};
pub use snapshot::SnapshotFile;
