//! Entry tree and table behavior through the public facade

use metadb::{Entry, EntryKind, EntryValue, Error, Table};

#[test]
fn tree_nested_lookup_walks_each_level() {
    let mut region = Entry::new("region");
    let mut city = Entry::new("city");
    city.try_add_child(Entry::string("label", "Harbor"));
    city.try_add_child(Entry::double("lat", 51.5));
    region.try_add_child(city);

    let label = region
        .try_get_child("city")
        .and_then(|c| c.try_get_child("label"))
        .and_then(Entry::as_str);
    assert_eq!(label, Some("Harbor"));
    assert!(region.try_get_child("town").is_none());
}

#[test]
fn tree_children_iterate_in_name_order() {
    let mut root = Entry::new("root");
    for name in ["zeta", "alpha", "mid"] {
        assert!(root.try_add_child(Entry::new(name)));
    }
    let names: Vec<&str> = root.children().map(Entry::name).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn tree_duplicate_child_keeps_original() {
    let mut root = Entry::new("root");
    root.try_add_child(Entry::uint64("hp", 10));
    assert!(!root.try_add_child(Entry::uint64("hp", 99)));
    assert_eq!(root.try_get_child("hp").unwrap().as_u64(), Some(10));
    assert_eq!(root.child_count(), 1);
}

#[test]
fn tree_leaf_has_no_children_until_first_add() {
    let mut leaf = Entry::byte("flags", 0b1010);
    assert!(!leaf.has_children());
    assert_eq!(leaf.children().count(), 0);

    leaf.try_add_child(Entry::new("extra"));
    assert!(leaf.has_children());
}

#[test]
fn tree_every_kind_reports_its_value() {
    let entries = [
        (Entry::new("b"), EntryKind::Base),
        (Entry::uint64("u", u64::MAX), EntryKind::UInt64),
        (Entry::double("d", -0.25), EntryKind::Double),
        (Entry::byte("y", 7), EntryKind::Byte),
        (Entry::string("s", "text"), EntryKind::String),
        (Entry::int64("i", i64::MIN), EntryKind::Int64),
    ];
    for (entry, kind) in entries {
        assert_eq!(entry.kind(), kind, "kind of '{}'", entry.name());
    }
    assert_eq!(Entry::int64("i", -3).as_i64(), Some(-3));
    assert_eq!(Entry::int64("i", -3).as_u64(), None);
}

#[test]
fn tree_set_value_changes_kind() {
    let mut entry = Entry::uint64("score", 100);
    let old = entry.set_value("high").unwrap();
    assert_eq!(old, EntryValue::UInt64(100));
    assert_eq!(entry.kind(), EntryKind::String);
    assert_eq!(entry.as_str(), Some("high"));
}

#[test]
fn tree_child_mut_updates_in_place() {
    let mut table = Table::new("players");
    let mut alice = Entry::new("alice");
    alice.try_add_child(Entry::uint64("score", 100));
    table.try_add_entry("alice", alice);

    let score = table
        .entry_mut("alice")
        .and_then(|a| a.child_mut("score"))
        .unwrap();
    score.set_value(150u64).unwrap();

    let alice = table.try_get_entry("alice").unwrap();
    assert_eq!(alice.try_get_child("score").unwrap().as_u64(), Some(150));
}

#[test]
fn tree_unwritable_names_and_strings_stay_out() {
    let long = "x".repeat(256);
    let mut root = Entry::new("root");
    assert!(!root.try_add_child(Entry::new(long.as_str())));
    assert!(!root.try_add_child(Entry::string("bio", long.as_str())));
    assert!(!root.has_children());

    let mut table = Table::new("t");
    assert!(!table.try_add_entry(long.as_str(), Entry::new("x")));
    assert!(!table.try_add_entry("", Entry::new("x")));
    assert!(table.is_empty());

    let mut entry = Entry::string("bio", "short");
    assert!(matches!(
        entry.set_value(long),
        Err(Error::StringTooLong { len: 256, max: 255 })
    ));
    assert_eq!(entry.as_str(), Some("short"));
}

#[test]
fn tree_table_entries_are_sorted_and_unique() {
    let mut table = Table::new("items");
    assert!(table.try_add_entry("sword", Entry::new("sword")));
    assert!(table.try_add_entry("axe", Entry::new("axe")));
    assert!(!table.try_add_entry("axe", Entry::uint64("axe", 1)));

    let names: Vec<&str> = table.entries().map(Entry::name).collect();
    assert_eq!(names, vec!["axe", "sword"]);
    assert_eq!(table.try_get_entry("axe").unwrap().kind(), EntryKind::Base);
}
