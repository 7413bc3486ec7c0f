//! Test utilities for the comprehensive suite
//!
//! Temp database paths, the standard "players" fixture, a running-engine
//! harness and an in-memory tracing writer.

#![allow(dead_code)]

use metadb::{Database, Engine, EngineConfig, Entry, StopRequest};
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use tempfile::TempDir;
use tracing_subscriber::fmt::MakeWriter;

/// Temp directory plus a database file path inside it.
pub struct TempDb {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TempDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("test.mdb");
        TempDb { dir, path }
    }

    pub fn open(&self) -> Database {
        Database::open(&self.path).expect("Failed to open test database")
    }

    pub fn bytes(&self) -> Vec<u8> {
        std::fs::read(&self.path).expect("Failed to read database file")
    }
}

/// Add `players/alice` with a `score` child of 100.
pub fn add_players(db: &mut Database) {
    let mut alice = Entry::new("alice");
    alice.try_add_child(Entry::uint64("score", 100));
    db.ensure_table_exists("players")
        .expect("players is a valid table name")
        .try_add_entry("alice", alice);
}

/// Loop settings that keep tests fast and avoid periodic saves.
pub fn fast_config() -> EngineConfig {
    EngineConfig {
        cycle_wait_ms: 1,
        save_period_ms: 60_000,
        save_on_stop: true,
    }
}

/// An engine with its worker loop running on a background thread.
pub struct RunningEngine {
    pub engine: Arc<Engine>,
    handle: Option<JoinHandle<metadb::Result<()>>>,
}

impl RunningEngine {
    pub fn start(db: Database, config: EngineConfig) -> Self {
        let engine = Arc::new(Engine::new(db));
        let handle = engine.spawn(config).expect("Failed to spawn engine");
        RunningEngine {
            engine,
            handle: Some(handle),
        }
    }

    /// Stop the loop, join the worker and return the database.
    pub fn shutdown(mut self) -> Database {
        self.stop();
        let engine = Arc::clone(&self.engine);
        drop(self);
        match Arc::try_unwrap(engine) {
            Ok(engine) => engine.into_database(),
            Err(_) => panic!("engine still shared after shutdown"),
        }
    }

    pub fn stop(&mut self) -> StopRequest {
        let request = self.engine.stop_and_block().expect("Failed to stop engine");
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .expect("Engine thread panicked")
                .expect("Engine loop failed");
        }
        request
    }
}

impl Drop for RunningEngine {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop();
        }
    }
}

/// Shared in-memory sink for tracing output.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
    }

    /// Run `f` with this capture installed as the thread's subscriber.
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
