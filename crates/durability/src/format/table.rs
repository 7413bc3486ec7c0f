//! Table and database snapshot encoding
//!
//! ```text
//! Database := tableCount:i32, Table[tableCount]
//! Table    := name:str8, entryCount:i32, Entry[entryCount]
//! ```

use super::entry::{decode_entry, encode_entry};
use crate::codec::{ByteReader, ByteWriter};
use metadb_core::{validate_name, Error, Result, Table};
use std::collections::HashSet;
use tracing::debug;

fn write_count(writer: &mut ByteWriter, count: usize, what: &str) -> Result<()> {
    let count = i32::try_from(count)
        .map_err(|_| Error::Corruption(format!("{} count {} exceeds i32 range", what, count)))?;
    writer.write_i32(count)
}

fn read_count(reader: &mut ByteReader<'_>, what: &str) -> Result<usize> {
    let offset = reader.position();
    let count = reader.read_i32()?;
    usize::try_from(count).map_err(|_| {
        Error::Corruption(format!(
            "negative {} count {} at offset {}",
            what, count, offset
        ))
    })
}

pub fn encode_table(writer: &mut ByteWriter, table: &Table) -> Result<()> {
    validate_name(table.name())?;
    writer.write_str8(table.name())?;
    write_count(writer, table.len(), "entry")?;
    for entry in table.entries() {
        encode_entry(writer, entry)?;
    }
    Ok(())
}

pub fn decode_table(reader: &mut ByteReader<'_>) -> Result<Table> {
    let name_offset = reader.position();
    let name = reader.read_str8()?;
    if name.is_empty() {
        return Err(Error::Corruption(format!(
            "empty table name at offset {}",
            name_offset
        )));
    }

    let count = read_count(reader, "entry")?;
    let mut table = Table::new(name);
    for _ in 0..count {
        let entry = decode_entry(reader)?;
        let entry_name = entry.name().to_string();
        if !table.try_add_entry(entry_name.clone(), entry) {
            return Err(Error::Corruption(format!(
                "duplicate root entry '{}' in table '{}'",
                entry_name,
                table.name()
            )));
        }
    }

    debug!(
        target: "metadb::db",
        table = table.name(),
        entries = table.len(),
        "Decoded table"
    );
    Ok(table)
}

/// Encode a full database snapshot: the table count followed by every table.
pub fn encode_tables<'a, I>(writer: &mut ByteWriter, tables: I) -> Result<()>
where
    I: ExactSizeIterator<Item = &'a Table>,
{
    write_count(writer, tables.len(), "table")?;
    for table in tables {
        encode_table(writer, table)?;
    }
    Ok(())
}

/// Decode a full database snapshot.
///
/// All-or-nothing: any error discards every table decoded so far, and bytes
/// left over after the last table are treated as corruption.
pub fn decode_tables(data: &[u8]) -> Result<Vec<Table>> {
    let mut reader = ByteReader::new(data);
    let count = read_count(&mut reader, "table")?;

    let mut tables: Vec<Table> = Vec::with_capacity(count.min(1024));
    let mut seen = HashSet::with_capacity(count.min(1024));
    for _ in 0..count {
        let table = decode_table(&mut reader)?;
        if !seen.insert(table.name().to_string()) {
            return Err(Error::Corruption(format!(
                "duplicate table '{}'",
                table.name()
            )));
        }
        tables.push(table);
    }

    if !reader.is_empty() {
        return Err(Error::Corruption(format!(
            "{} trailing bytes after {} tables",
            reader.remaining(),
            count
        )));
    }
    Ok(tables)
}
