//! Whole-file snapshot I/O
//!
//! Every save re-encodes the full table set into one buffer and overwrites
//! the backing file with a single write. There is no temp file, rename,
//! checksum or log: a crash during the write can leave a truncated file,
//! which the next load rejects as corruption.

use crate::codec::ByteWriter;
use crate::format::{decode_tables, encode_tables};
use metadb_core::{Result, Table};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Initial capacity of the save buffer
const INITIAL_BUFFER_CAPACITY: usize = 32 * 1024;

/// A database file plus the reusable buffer used to save it.
#[derive(Debug)]
pub struct SnapshotFile {
    path: PathBuf,
    writer: ByteWriter,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotFile {
            path: path.into(),
            writer: ByteWriter::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the file.
    ///
    /// Returns `Ok(None)` if the file does not exist. Any decode error
    /// aborts the load; no partial table set is ever returned.
    pub fn load(&self) -> Result<Option<Vec<Table>>> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        decode_tables(&data).map(Some)
    }

    /// Encode `tables` and overwrite the file. Returns the bytes written.
    ///
    /// Nothing is written if encoding fails.
    pub fn save<'a, I>(&mut self, tables: I) -> Result<usize>
    where
        I: ExactSizeIterator<Item = &'a Table>,
    {
        self.writer.reset();
        encode_tables(&mut self.writer, tables)?;
        std::fs::write(&self.path, self.writer.as_bytes())?;

        let written = self.writer.len();
        debug!(target: "metadb::db", path = ?self.path, bytes = written, "Saved snapshot");
        Ok(written)
    }
}
