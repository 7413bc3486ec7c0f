//! Fixed-width writer producing a snapshot buffer.

use byteorder::{LittleEndian, WriteBytesExt};
use metadb_core::{Error, Result, MAX_NAME_LEN};

/// Growable little-endian output buffer.
///
/// The buffer can be reset and reused across saves so the allocation made
/// for the first full snapshot is kept.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ByteWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Clear the contents, keeping the allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        Ok(self.buf.write_u8(v)?)
    }

    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        Ok(self.buf.write_u16::<LittleEndian>(v)?)
    }

    pub fn write_i32(&mut self, v: i32) -> Result<()> {
        Ok(self.buf.write_i32::<LittleEndian>(v)?)
    }

    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        Ok(self.buf.write_u64::<LittleEndian>(v)?)
    }

    pub fn write_i64(&mut self, v: i64) -> Result<()> {
        Ok(self.buf.write_i64::<LittleEndian>(v)?)
    }

    pub fn write_f64(&mut self, v: f64) -> Result<()> {
        Ok(self.buf.write_f64::<LittleEndian>(v)?)
    }

    /// Write a `str8`. Strings over 255 bytes are rejected, never truncated.
    pub fn write_str8(&mut self, s: &str) -> Result<()> {
        if s.len() > MAX_NAME_LEN {
            return Err(Error::StringTooLong {
                len: s.len(),
                max: MAX_NAME_LEN,
            });
        }
        self.buf.push(s.len() as u8);
        self.buf.extend_from_slice(s.as_bytes());
        Ok(())
    }
}
