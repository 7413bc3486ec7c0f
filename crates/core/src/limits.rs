//! Size limits imposed by the file format
//!
//! Names and string payloads are written with an 8-bit length prefix and
//! child counts with a 16-bit prefix. These limits are FROZEN: changing them
//! changes the on-disk format.

use crate::entry::EntryValue;
use crate::error::{Error, Result};

/// Maximum encoded length of a name or string payload, in bytes
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Maximum number of children under a single entry
pub const MAX_CHILDREN: usize = u16::MAX as usize;

/// Maximum entry nesting depth accepted by the encoder and decoder.
///
/// Bounds recursion when reading an untrusted stream.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Check that `name` can be written as a table or entry name.
///
/// Names must be non-empty and fit in `MAX_NAME_LEN` UTF-8 bytes.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidName("name must not be empty".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(Error::InvalidName(format!(
            "name is {} bytes, maximum is {}",
            name.len(),
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// Check that `value` can be written as an entry payload.
///
/// Only `String` payloads are bounded: they must fit in `MAX_NAME_LEN`
/// UTF-8 bytes.
pub fn validate_value(value: &EntryValue) -> Result<()> {
    match value {
        EntryValue::String(s) if s.len() > MAX_NAME_LEN => Err(Error::StringTooLong {
            len: s.len(),
            max: MAX_NAME_LEN,
        }),
        _ => Ok(()),
    }
}
