//! Database and command engine for MetaDB
//!
//! This crate ties the lower layers together:
//! - Database: named tables bound to one file, with open/save
//! - Engine: single-writer command queue with periodic saves
//! - Config: worker loop settings loaded from toml
//!
//! The engine is the only component that mutates a database while it is
//! being shared between threads.

#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod engine;

pub use config::EngineConfig;
pub use database::Database;
pub use engine::{Completion, Engine, EngineState, EngineStats, StopRequest};
