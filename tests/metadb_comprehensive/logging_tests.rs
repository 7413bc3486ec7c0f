//! Diagnostics emitted through tracing

use crate::test_utils::{add_players, fast_config, LogCapture, RunningEngine, TempDb};
use metadb::{Database, Engine, StopRequest};

#[test]
fn log_new_database_is_announced() {
    let tmp = TempDb::new();
    let logs = LogCapture::default();

    logs.capture(|| Database::open(&tmp.path).unwrap());

    let out = logs.contents();
    assert!(out.contains("Creating a new database"), "logs: {}", out);
    assert!(out.contains("metadb::db"), "logs: {}", out);
}

#[test]
fn log_load_reports_table_count() {
    let tmp = TempDb::new();
    {
        let mut db = tmp.open();
        add_players(&mut db);
        db.save().unwrap();
    }
    let logs = LogCapture::default();

    let db = logs.capture(|| Database::open(&tmp.path).unwrap());
    assert_eq!(db.table_count(), 1);

    let out = logs.contents();
    assert!(out.contains("Loaded database"), "logs: {}", out);
    assert!(out.contains("tables=1"), "logs: {}", out);
}

#[test]
fn log_corrupt_file_is_reported() {
    let tmp = TempDb::new();
    std::fs::write(&tmp.path, [1, 0, 0, 0, 1, b't', 1, 0, 0, 0, 0xee]).unwrap();
    let logs = LogCapture::default();

    let result = logs.capture(|| Database::open(&tmp.path));
    assert!(result.is_err());

    let out = logs.contents();
    assert!(out.contains("Failed to load database"), "logs: {}", out);
    assert!(out.contains("ERROR"), "logs: {}", out);
}

#[test]
fn log_start_while_running_warns() {
    let tmp = TempDb::new();
    let running = RunningEngine::start(tmp.open(), fast_config());
    running
        .engine
        .submit_with_reply(|_| ())
        .unwrap()
        .wait_blocking()
        .unwrap();
    let logs = LogCapture::default();

    logs.capture(|| running.engine.start(1, 1000).unwrap());

    let out = logs.contents();
    assert!(
        out.contains("Tried to start engine while it is running"),
        "logs: {}",
        out
    );
    assert!(out.contains("WARN"), "logs: {}", out);
}

#[test]
fn log_stop_while_stopped_is_noted() {
    let tmp = TempDb::new();
    let engine = Engine::new(tmp.open());
    let logs = LogCapture::default();

    let request = logs.capture(|| engine.request_stop());
    assert_eq!(request, StopRequest::AlreadyStopped);

    let out = logs.contents();
    assert!(
        out.contains("Tried to stop engine while it is stopped"),
        "logs: {}",
        out
    );
}
