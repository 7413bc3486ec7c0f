//! On-disk byte format for database snapshots.
//!
//! # Module Structure
//!
//! - `entry`: recursive, discriminant-tagged entry encoding
//! - `table`: table framing and the whole-database snapshot layout

pub mod entry;
pub mod table;

pub use entry::{decode_entry, encode_entry};
pub use table::{decode_table, decode_tables, encode_table, encode_tables};
