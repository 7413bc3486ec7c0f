//! Fixed-width reader over a snapshot buffer.

use byteorder::{LittleEndian, ReadBytesExt};
use metadb_core::{Error, Result};
use std::io::Cursor;

/// Sequential little-endian reader.
///
/// Every read reports `UnexpectedEof` with the requested and remaining byte
/// counts instead of panicking on short input.
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteReader {
            cursor: Cursor::new(data),
        }
    }

    /// Current stream offset.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(Error::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.ensure(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.ensure(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.ensure(8)?;
        Ok(self.cursor.read_u64::<LittleEndian>()?)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.ensure(8)?;
        Ok(self.cursor.read_i64::<LittleEndian>()?)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.ensure(8)?;
        Ok(self.cursor.read_f64::<LittleEndian>()?)
    }

    /// Read a `str8`: one length byte followed by that many UTF-8 bytes.
    pub fn read_str8(&mut self) -> Result<String> {
        let len = self.read_u8()? as usize;
        self.ensure(len)?;
        let start = self.position();
        let bytes = &self.cursor.get_ref()[start..start + len];
        let text = std::str::from_utf8(bytes)
            .map_err(|_| Error::InvalidUtf8 { offset: start })?
            .to_string();
        self.cursor.set_position((start + len) as u64);
        Ok(text)
    }
}
