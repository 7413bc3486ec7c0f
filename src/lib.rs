//! MetaDB - embedded hierarchical metadata store
//!
//! MetaDB keeps named tables of entry trees in one binary file per
//! database. Each entry has a name, a typed value and optional named
//! children. A single-writer [`Engine`] owns the [`Database`] and applies
//! mutations submitted from any thread, saving on a fixed cadence.
//!
//! # Quick Start
//!
//! ```no_run
//! use metadb::{Database, Entry};
//!
//! let mut db = Database::open("game.mdb")?;
//! let mut alice = Entry::new("alice");
//! alice.try_add_child(Entry::uint64("score", 100));
//! db.ensure_table_exists("players")?.try_add_entry("alice", alice);
//! db.save()?;
//! # Ok::<(), metadb::Error>(())
//! ```
//!
//! # Layers
//!
//! - `metadb-core`: entries, tables, limits and the error type
//! - `metadb-durability`: the binary file format and snapshot I/O
//! - `metadb-engine`: the database, its registry and the command engine

pub use metadb_core::{
    validate_name, validate_value, Entry, EntryKind, EntryValue, Error, Result, Table,
    MAX_CHILDREN, MAX_NAME_LEN, MAX_NESTING_DEPTH,
};
pub use metadb_durability::{
    decode_entry, decode_table, decode_tables, encode_entry, encode_table, encode_tables,
    ByteReader, ByteWriter, SnapshotFile,
};
pub use metadb_engine::{
    Completion, Database, Engine, EngineConfig, EngineState, EngineStats, StopRequest,
};
