//! Database struct and open/save logic
//!
//! A `Database` is a set of uniquely named tables backed by a single file.
//! Opening loads the whole file if it exists; saving re-encodes every table
//! and overwrites the file.
//!
//! The `Database` is plain data with `&mut self` mutators and no interior
//! locking. Concurrent use goes through [`crate::Engine`], which owns the
//! database and is the only thing that mutates it.

mod registry;

use metadb_core::{validate_name, Result, Table};
use metadb_durability::SnapshotFile;
use registry::Registration;
use std::collections::btree_map::{self, BTreeMap};
use std::path::Path;
use tracing::{error, info};

/// Named collection of tables with whole-file persistence.
pub struct Database {
    file: SnapshotFile,
    tables: BTreeMap<String, Table>,
    _registration: Registration,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.file.path())
            .field("tables", &self.tables.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Database {
    /// Open the database stored at `path`, or start an empty one.
    ///
    /// If the file exists its full contents are decoded; any decode error
    /// aborts the open and no `Database` is returned. If it does not
    /// exist the database starts empty and the file is first written by
    /// [`Database::save`].
    ///
    /// # Errors
    ///
    /// - `DatabaseInUse` if another `Database` in this process is attached
    ///   to the same file
    /// - `IoError` if the file cannot be read
    /// - a corruption error (`UnknownDiscriminant`, `UnexpectedEof`, ...)
    ///   if the contents cannot be decoded
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let canonical = registry::canonical_file_path(path.as_ref())?;

        registry::register_with(canonical.clone(), |registration| {
            let file = SnapshotFile::new(canonical);
            let mut tables = BTreeMap::new();

            if file.path().exists() {
                info!(target: "metadb::db", path = ?file.path(), "Loading database");
                let loaded = file.load().map_err(|e| {
                    error!(target: "metadb::db", path = ?file.path(), error = %e, "Failed to load database");
                    e
                })?;
                for table in loaded.into_iter().flatten() {
                    tables.insert(table.name().to_string(), table);
                }
                info!(
                    target: "metadb::db",
                    path = ?file.path(),
                    tables = tables.len(),
                    "Loaded database"
                );
            } else {
                info!(
                    target: "metadb::db",
                    path = ?file.path(),
                    "Creating a new database, no file found"
                );
            }

            Ok(Database {
                file,
                tables,
                _registration: registration,
            })
        })
    }

    /// Canonical path of the backing file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Create an empty table named `name` unless one exists.
    ///
    /// Returns the table either way.
    ///
    /// # Errors
    ///
    /// `InvalidName` if `name` is empty or over 255 bytes. No table is
    /// created.
    pub fn ensure_table_exists(&mut self, name: &str) -> Result<&mut Table> {
        validate_name(name)?;
        Ok(self
            .tables
            .entry(name.to_string())
            .or_insert_with(|| Table::new(name)))
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn try_get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn try_get_table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// Add `table` under its own name. Returns `false`, leaving the
    /// database unchanged, if the name is taken, empty or over 255 bytes.
    pub fn try_add_table(&mut self, table: Table) -> bool {
        if validate_name(table.name()).is_err() {
            return false;
        }
        match self.tables.entry(table.name().to_string()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(table);
                true
            }
        }
    }

    /// Unchecked lookup.
    ///
    /// # Panics
    ///
    /// Panics if no table named `name` exists. Use
    /// [`Database::try_get_table`] when absence is expected.
    pub fn get_table(&self, name: &str) -> &Table {
        match self.tables.get(name) {
            Some(table) => table,
            None => panic!("table '{}' does not exist", name),
        }
    }

    /// Unchecked mutable lookup.
    ///
    /// # Panics
    ///
    /// Panics if no table named `name` exists.
    pub fn get_table_mut(&mut self, name: &str) -> &mut Table {
        match self.tables.get_mut(name) {
            Some(table) => table,
            None => panic!("table '{}' does not exist", name),
        }
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Table names in sorted order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Serialize every table and overwrite the backing file.
    ///
    /// Returns the number of bytes written. The write is a single
    /// overwrite, not an atomic replace: a crash mid-write can leave a
    /// truncated file that the next open rejects.
    pub fn save(&mut self) -> Result<usize> {
        self.file.save(self.tables.values())
    }
}
