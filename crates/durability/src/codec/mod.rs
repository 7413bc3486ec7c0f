//! Fixed-width binary primitives used by the snapshot format.
//!
//! All integers and floats are little-endian; strings are `str8`
//! (one length byte, then UTF-8 bytes).

mod reader;
mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;
