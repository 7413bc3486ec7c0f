//! Recursive entry encoding
//!
//! ```text
//! Entry := discriminant:u8, name:str8, childCount:u16, Entry[childCount], payload
//! ```
//!
//! The payload follows the children so a decoder never needs to know the
//! payload width to skip into the subtree.

use crate::codec::{ByteReader, ByteWriter};
use metadb_core::{
    validate_name, Entry, EntryKind, EntryValue, Error, Result, MAX_CHILDREN, MAX_NESTING_DEPTH,
};

/// Append `entry` and its whole subtree to `writer`.
pub fn encode_entry(writer: &mut ByteWriter, entry: &Entry) -> Result<()> {
    encode_at_depth(writer, entry, 1)
}

fn encode_at_depth(writer: &mut ByteWriter, entry: &Entry, depth: usize) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::NestingTooDeep {
            name: entry.name().to_string(),
            limit: MAX_NESTING_DEPTH,
        });
    }
    validate_name(entry.name())?;
    let child_count = entry.child_count();
    if child_count > MAX_CHILDREN {
        return Err(Error::TooManyChildren {
            name: entry.name().to_string(),
            count: child_count,
        });
    }

    writer.write_u8(entry.kind().to_byte())?;
    writer.write_str8(entry.name())?;
    writer.write_u16(child_count as u16)?;
    for child in entry.children() {
        encode_at_depth(writer, child, depth + 1)?;
    }

    match entry.value() {
        EntryValue::Base => Ok(()),
        EntryValue::UInt64(v) => writer.write_u64(*v),
        EntryValue::Int64(v) => writer.write_i64(*v),
        EntryValue::Double(v) => writer.write_f64(*v),
        EntryValue::Byte(v) => writer.write_u8(*v),
        EntryValue::String(v) => writer.write_str8(v),
    }
}

/// Read one entry, dispatching on its discriminant.
///
/// An unknown discriminant anywhere in the subtree fails the whole decode
/// with [`Error::UnknownDiscriminant`].
pub fn decode_entry(reader: &mut ByteReader<'_>) -> Result<Entry> {
    decode_at_depth(reader, 1)
}

fn decode_at_depth(reader: &mut ByteReader<'_>, depth: usize) -> Result<Entry> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::Corruption(format!(
            "entry nesting exceeds {} levels at offset {}",
            MAX_NESTING_DEPTH,
            reader.position()
        )));
    }

    let offset = reader.position();
    let tag = reader.read_u8()?;
    let kind = EntryKind::from_byte(tag).ok_or(Error::UnknownDiscriminant { tag, offset })?;

    let name_offset = reader.position();
    let name = reader.read_str8()?;
    if name.is_empty() {
        return Err(Error::Corruption(format!(
            "empty entry name at offset {}",
            name_offset
        )));
    }

    let child_count = reader.read_u16()?;
    let mut children = Vec::with_capacity(child_count as usize);
    for _ in 0..child_count {
        children.push(decode_at_depth(reader, depth + 1)?);
    }

    let value = match kind {
        EntryKind::Base => EntryValue::Base,
        EntryKind::UInt64 => EntryValue::UInt64(reader.read_u64()?),
        EntryKind::Int64 => EntryValue::Int64(reader.read_i64()?),
        EntryKind::Double => EntryValue::Double(reader.read_f64()?),
        EntryKind::Byte => EntryValue::Byte(reader.read_u8()?),
        EntryKind::String => EntryValue::String(reader.read_str8()?),
    };

    let mut entry = Entry::with_value(name, value);
    for child in children {
        let child_name = child.name().to_string();
        if !entry.try_add_child(child) {
            return Err(Error::Corruption(format!(
                "duplicate child '{}' under entry '{}'",
                child_name,
                entry.name()
            )));
        }
    }
    Ok(entry)
}
