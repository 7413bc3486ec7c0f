//! Entry tree types
//!
//! An [`Entry`] is a named node carrying one typed payload ([`EntryValue`])
//! and an optional set of uniquely-named children. Children are owned by
//! their parent, so the tree is acyclic by construction.
//!
//! ## Children: absent vs empty
//!
//! A freshly created entry has no child map at all. The map is allocated on
//! the first successful [`Entry::try_add_child`]. Entries decoded from a
//! stream with a zero child count also stay unallocated.
//!
//! ## Writable trees
//!
//! Constructors accept any name and payload, but an entry only joins a tree
//! through [`Entry::try_add_child`] or `Table::try_add_entry`, which refuse
//! names and payloads the file format cannot store. Payloads of attached
//! entries change only through [`Entry::set_value`], which applies the same
//! check, so every tree reachable from a table can be saved.

use crate::error::Result;
use crate::limits::{validate_name, validate_value, MAX_CHILDREN};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Wire discriminant of an entry payload.
///
/// The numeric values are part of the file format and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntryKind {
    /// No payload
    Base = 0,
    /// Unsigned 64-bit integer
    UInt64 = 1,
    /// IEEE-754 double
    Double = 2,
    /// Single byte
    Byte = 3,
    /// Short UTF-8 string
    String = 4,
    /// Signed 64-bit integer
    Int64 = 5,
}

impl EntryKind {
    /// Every kind, in discriminant order.
    pub const ALL: [EntryKind; 6] = [
        EntryKind::Base,
        EntryKind::UInt64,
        EntryKind::Double,
        EntryKind::Byte,
        EntryKind::String,
        EntryKind::Int64,
    ];

    /// The discriminant byte written to disk.
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    /// Map a discriminant byte back to a kind.
    pub fn from_byte(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(EntryKind::Base),
            1 => Some(EntryKind::UInt64),
            2 => Some(EntryKind::Double),
            3 => Some(EntryKind::Byte),
            4 => Some(EntryKind::String),
            5 => Some(EntryKind::Int64),
            _ => None,
        }
    }

    /// Human-readable kind name
    pub fn name(self) -> &'static str {
        match self {
            EntryKind::Base => "Base",
            EntryKind::UInt64 => "UInt64",
            EntryKind::Double => "Double",
            EntryKind::Byte => "Byte",
            EntryKind::String => "String",
            EntryKind::Int64 => "Int64",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload carried by an entry.
///
/// `Double` uses IEEE-754 equality, so `NaN != NaN`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EntryValue {
    /// No payload
    #[default]
    Base,
    /// Unsigned 64-bit integer
    UInt64(u64),
    /// Signed 64-bit integer
    Int64(i64),
    /// IEEE-754 double
    Double(f64),
    /// Single byte
    Byte(u8),
    /// UTF-8 string, at most 255 encoded bytes when persisted
    String(String),
}

impl EntryValue {
    /// The discriminant for this payload
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryValue::Base => EntryKind::Base,
            EntryValue::UInt64(_) => EntryKind::UInt64,
            EntryValue::Int64(_) => EntryKind::Int64,
            EntryValue::Double(_) => EntryKind::Double,
            EntryValue::Byte(_) => EntryKind::Byte,
            EntryValue::String(_) => EntryKind::String,
        }
    }
}

impl From<u64> for EntryValue {
    fn from(v: u64) -> Self {
        EntryValue::UInt64(v)
    }
}

impl From<i64> for EntryValue {
    fn from(v: i64) -> Self {
        EntryValue::Int64(v)
    }
}

impl From<f64> for EntryValue {
    fn from(v: f64) -> Self {
        EntryValue::Double(v)
    }
}

impl From<u8> for EntryValue {
    fn from(v: u8) -> Self {
        EntryValue::Byte(v)
    }
}

impl From<String> for EntryValue {
    fn from(v: String) -> Self {
        EntryValue::String(v)
    }
}

impl From<&str> for EntryValue {
    fn from(v: &str) -> Self {
        EntryValue::String(v.to_string())
    }
}

/// A named node in the entry tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    name: String,
    value: EntryValue,
    children: Option<BTreeMap<String, Entry>>,
}

impl Entry {
    /// Create a payload-less entry.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, EntryValue::Base)
    }

    /// Create an entry with the given payload.
    pub fn with_value(name: impl Into<String>, value: impl Into<EntryValue>) -> Self {
        Entry {
            name: name.into(),
            value: value.into(),
            children: None,
        }
    }

    /// Create a `UInt64` entry.
    pub fn uint64(name: impl Into<String>, value: u64) -> Self {
        Self::with_value(name, EntryValue::UInt64(value))
    }

    /// Create an `Int64` entry.
    pub fn int64(name: impl Into<String>, value: i64) -> Self {
        Self::with_value(name, EntryValue::Int64(value))
    }

    /// Create a `Double` entry.
    pub fn double(name: impl Into<String>, value: f64) -> Self {
        Self::with_value(name, EntryValue::Double(value))
    }

    /// Create a `Byte` entry.
    pub fn byte(name: impl Into<String>, value: u8) -> Self {
        Self::with_value(name, EntryValue::Byte(value))
    }

    /// Create a `String` entry.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::with_value(name, EntryValue::String(value.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the entry. Only used when the owning container keys it
    /// under a different name.
    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn value(&self) -> &EntryValue {
        &self.value
    }

    /// Replace the payload, returning the previous one.
    ///
    /// # Errors
    ///
    /// `StringTooLong` if the new payload is a string over `MAX_NAME_LEN`
    /// bytes. The entry keeps its old payload.
    pub fn set_value(&mut self, value: impl Into<EntryValue>) -> Result<EntryValue> {
        let value = value.into();
        validate_value(&value)?;
        Ok(std::mem::replace(&mut self.value, value))
    }

    /// Whether this entry alone (not its subtree) can be written.
    pub(crate) fn is_writable(&self) -> bool {
        validate_name(&self.name).is_ok() && validate_value(&self.value).is_ok()
    }

    pub fn kind(&self) -> EntryKind {
        self.value.kind()
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.value {
            EntryValue::UInt64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            EntryValue::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            EntryValue::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_byte(&self) -> Option<u8> {
        match self.value {
            EntryValue::Byte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            EntryValue::String(v) => Some(v),
            _ => None,
        }
    }

    /// Whether the child map has been allocated.
    ///
    /// True as soon as one child was added, false for fresh entries and
    /// for entries decoded with a zero child count.
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    pub fn child_count(&self) -> usize {
        self.children.as_ref().map_or(0, BTreeMap::len)
    }

    pub fn child_exists(&self, name: &str) -> bool {
        self.children
            .as_ref()
            .is_some_and(|children| children.contains_key(name))
    }

    pub fn try_get_child(&self, name: &str) -> Option<&Entry> {
        self.children.as_ref()?.get(name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.children.as_mut()?.get_mut(name)
    }

    /// Add `child` under its own name.
    ///
    /// Returns `false` and leaves the tree untouched if a sibling with the
    /// same name already exists, if the child's name is empty or its name
    /// or string payload is over 255 bytes, or if this entry already has
    /// `MAX_CHILDREN` children. Allocates the child map on first insert.
    pub fn try_add_child(&mut self, child: Entry) -> bool {
        if !child.is_writable() || self.child_count() >= MAX_CHILDREN {
            return false;
        }
        let children = self.children.get_or_insert_with(BTreeMap::new);
        match children.entry(child.name.clone()) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                slot.insert(child);
                true
            }
        }
    }

    /// Children in name order.
    pub fn children(&self) -> impl Iterator<Item = &Entry> {
        self.children.iter().flat_map(BTreeMap::values)
    }
}
