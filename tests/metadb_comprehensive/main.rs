//! MetaDB Comprehensive Test Suite
//!
//! End-to-end tests over the public facade: entry trees, file
//! persistence, the command engine and its log output.
//!
//! ## Test Organization
//!
//! - `entry_tree_tests.rs` - Building and querying entry trees and tables
//! - `persistence_tests.rs` - Save/reopen, corruption on load, encode failures
//! - `engine_tests.rs` - Ordering, concurrency, lifecycle, saves on stop
//! - `logging_tests.rs` - Warnings and errors emitted through tracing
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test metadb_comprehensive
//! cargo test --test metadb_comprehensive engine_
//! ```

mod entry_tree_tests;
mod logging_tests;

pub mod test_utils;
