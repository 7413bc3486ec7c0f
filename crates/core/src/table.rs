//! Tables: named sets of root entries

use crate::entry::Entry;
use crate::limits::{validate_name, validate_value};
use std::collections::btree_map::{self, BTreeMap};

/// A named collection of root-level entry trees.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    entries: BTreeMap<String, Entry>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Table {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_exists(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn try_get_entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn entry_mut(&mut self, name: &str) -> Option<&mut Entry> {
        self.entries.get_mut(name)
    }

    /// Insert `entry` as a root entry keyed by `name`.
    ///
    /// Returns `false` without touching the table if `name` is taken,
    /// empty or over 255 bytes, or if the entry's string payload is over
    /// 255 bytes. An entry whose own name differs from `name` is renamed,
    /// so the key survives a save/load cycle (entries are re-keyed by their
    /// own name when decoded).
    pub fn try_add_entry(&mut self, name: impl Into<String>, mut entry: Entry) -> bool {
        let name = name.into();
        if validate_name(&name).is_err() || validate_value(entry.value()).is_err() {
            return false;
        }
        match self.entries.entry(name) {
            btree_map::Entry::Occupied(_) => false,
            btree_map::Entry::Vacant(slot) => {
                if entry.name() != slot.key() {
                    entry.set_name(slot.key().clone());
                }
                slot.insert(entry);
                true
            }
        }
    }

    /// Root entries in name order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }
}
