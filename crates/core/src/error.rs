//! Error types for MetaDB
//!
//! Soft failures (duplicate names on insert, missing names on checked
//! lookup) are reported through `bool`/`Option` results and never appear
//! here. This enum covers the hard failures: I/O, corrupt or incompatible
//! snapshot streams, values the wire format cannot represent, and engine
//! lifecycle outcomes observed by callers.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for MetaDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for MetaDB
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error while reading or writing the database file
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// The stream ended before a complete value could be read
    #[error("Unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof {
        /// Bytes the reader asked for
        needed: usize,
        /// Bytes left in the stream
        remaining: usize,
    },

    /// An entry discriminant byte that maps to no known variant.
    ///
    /// Fatal: the whole load is aborted.
    #[error("Unknown entry discriminant {tag:#04x} at offset {offset}")]
    UnknownDiscriminant {
        /// The offending byte
        tag: u8,
        /// Stream offset of the byte
        offset: usize,
    },

    /// A length-prefixed string that is not valid UTF-8
    #[error("Invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 {
        /// Stream offset of the string bytes
        offset: usize,
    },

    /// Structurally invalid snapshot data
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// A name that cannot be written (empty or longer than 255 encoded bytes)
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// A string payload longer than its 8-bit length prefix can describe
    #[error("String of {len} bytes exceeds the {max} byte limit")]
    StringTooLong {
        /// Encoded length of the string
        len: usize,
        /// Largest length the format can store
        max: usize,
    },

    /// An entry tree nested deeper than the format accepts
    #[error("Entry '{name}' is nested deeper than {limit} levels")]
    NestingTooDeep {
        /// Name of the first entry past the limit
        name: String,
        /// The nesting limit
        limit: usize,
    },

    /// An entry has more children than the 16-bit child count can describe
    #[error("Entry '{name}' has {count} children, more than the format allows")]
    TooManyChildren {
        /// Name of the parent entry
        name: String,
        /// Actual number of children
        count: usize,
    },

    /// Another `Database` in this process is attached to the same file
    #[error("Database at '{}' is already open in this process", .0.display())]
    DatabaseInUse(PathBuf),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// A submitted command was dropped before it ran
    #[error("Command cancelled before execution")]
    Cancelled,

    /// The engine can no longer accept commands
    #[error("Engine command queue is closed")]
    EngineClosed,
}

impl Error {
    /// Whether this error means the snapshot stream itself is unusable.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedEof { .. }
                | Error::UnknownDiscriminant { .. }
                | Error::InvalidUtf8 { .. }
                | Error::Corruption(_)
        )
    }
}
