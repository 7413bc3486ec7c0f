//! Single-writer command engine
//!
//! The [`Engine`] owns the [`Database`] and is the only thing that mutates
//! it. Producers on any thread enqueue closures; one worker, running
//! [`Engine::start`] on a thread the caller dedicates to it, applies them
//! in FIFO order and saves the database on a fixed cadence.
//!
//! ## Loop iteration
//!
//! 1. Feed the elapsed time into the drift-carrying save clock and save if
//!    a period has passed.
//! 2. Snapshot the queue depth and run exactly that many commands.
//!    Commands enqueued while the batch runs wait for the next iteration.
//! 3. Sleep for the cycle wait.
//!
//! The stop request is checked at the top of every iteration.
//!
//! ## Stopping
//!
//! Commands still queued when the loop exits are dropped and their
//! awaiting callers get [`Error::Cancelled`]. Commands submitted after
//! that stay queued until the next `start`.

mod clock;
mod command;

pub use command::Completion;

use crate::config::EngineConfig;
use crate::database::Database;
use clock::SaveClock;
use command::Command;
use metadb_core::{Error, Result};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, warn};

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const STOPPING: u8 = 2;

/// Lifecycle state of the worker loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No loop is running
    Idle,
    /// A thread is inside [`Engine::start`]
    Running,
    /// Stop requested; the loop exits at its next iteration
    Stopping,
}

impl EngineState {
    fn from_u8(v: u8) -> Self {
        match v {
            RUNNING => EngineState::Running,
            STOPPING => EngineState::Stopping,
            _ => EngineState::Idle,
        }
    }
}

/// Outcome of a stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopRequest {
    /// This call moved the engine from running to stopping
    Requested,
    /// Another caller already requested the stop
    AlreadyStopping,
    /// The engine was not running
    AlreadyStopped,
}

/// Engine metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    /// Commands waiting in the queue
    pub pending: usize,
    /// Commands run to completion
    pub commands_executed: u64,
    /// Commands dropped at stop or lost to a panic
    pub commands_cancelled: u64,
    /// Successful saves
    pub saves: u64,
    /// Loop iterations
    pub cycles: u64,
}

struct Worker {
    db: Database,
    queue: mpsc::UnboundedReceiver<Command>,
}

/// Command-queue engine owning a [`Database`].
///
/// Share it behind an `Arc`: one thread calls [`Engine::start`], any
/// number of threads or tasks submit commands and request the stop.
pub struct Engine {
    state: AtomicU8,
    sender: mpsc::UnboundedSender<Command>,
    pending: AtomicUsize,
    worker: Mutex<Worker>,
    stopped: broadcast::Sender<()>,
    commands_executed: AtomicU64,
    commands_cancelled: AtomicU64,
    saves: AtomicU64,
    cycles: AtomicU64,
}

impl Engine {
    /// Take exclusive ownership of `db`.
    pub fn new(db: Database) -> Self {
        let (sender, queue) = mpsc::unbounded_channel();
        let (stopped, _) = broadcast::channel(16);
        Engine {
            state: AtomicU8::new(IDLE),
            sender,
            pending: AtomicUsize::new(0),
            worker: Mutex::new(Worker { db, queue }),
            stopped,
            commands_executed: AtomicU64::new(0),
            commands_cancelled: AtomicU64::new(0),
            saves: AtomicU64::new(0),
            cycles: AtomicU64::new(0),
        }
    }

    /// Open (or create) the database at `path` and wrap it in an engine.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            pending: self.pending.load(Ordering::Relaxed),
            commands_executed: self.commands_executed.load(Ordering::Relaxed),
            commands_cancelled: self.commands_cancelled.load(Ordering::Relaxed),
            saves: self.saves.load(Ordering::Relaxed),
            cycles: self.cycles.load(Ordering::Relaxed),
        }
    }

    /// Run the worker loop on the calling thread until stopped.
    ///
    /// Equivalent to [`Engine::run`] with the given timings and defaults
    /// for everything else. Returns immediately, with a warning, if the
    /// engine is already running.
    pub fn start(&self, cycle_wait_ms: u64, save_period_ms: u64) -> Result<()> {
        self.run(&EngineConfig {
            cycle_wait_ms,
            save_period_ms,
            ..EngineConfig::default()
        })
    }

    /// Run the worker loop on the calling thread until stopped.
    pub fn run(&self, config: &EngineConfig) -> Result<()> {
        config.validate()?;
        if self
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(target: "metadb::engine", "Tried to start engine while it is running");
            return Ok(());
        }

        let mut worker = self.worker.lock();
        let cycle_wait = Duration::from_millis(config.cycle_wait_ms);
        let mut clock = SaveClock::new(Duration::from_millis(config.save_period_ms));
        let mut last_tick = Instant::now();

        info!(
            target: "metadb::engine",
            path = ?worker.db.path(),
            cycle_wait_ms = config.cycle_wait_ms,
            save_period_ms = config.save_period_ms,
            "Engine started"
        );

        while self.state.load(Ordering::Acquire) == RUNNING {
            let now = Instant::now();
            if clock.advance(now.duration_since(last_tick)) {
                self.save(&mut worker.db);
            }
            last_tick = now;

            // Only commands whose send has completed count toward the batch
            let batch = worker.queue.len();
            self.run_batch(&mut worker, batch);
            self.cycles.fetch_add(1, Ordering::Relaxed);

            std::thread::sleep(cycle_wait);
        }

        debug!(
            target: "metadb::engine",
            residual_ms = clock.residual().as_millis() as u64,
            "Save clock reset"
        );
        let cancelled = self.cancel_queued(&mut worker.queue);
        if config.save_on_stop {
            self.save(&mut worker.db);
        }
        drop(worker);

        self.state.store(IDLE, Ordering::Release);
        // No receivers just means nobody is waiting
        let _ = self.stopped.send(());
        info!(target: "metadb::engine", cancelled, "Engine stopped");
        Ok(())
    }

    /// Spawn a named thread running [`Engine::run`].
    pub fn spawn(self: &Arc<Self>, config: EngineConfig) -> Result<JoinHandle<Result<()>>> {
        let engine = Arc::clone(self);
        let handle = std::thread::Builder::new()
            .name("metadb-engine".to_string())
            .spawn(move || engine.run(&config))?;
        Ok(handle)
    }

    /// Run up to `batch` queued commands in FIFO order.
    fn run_batch(&self, worker: &mut Worker, batch: usize) {
        for _ in 0..batch {
            let command = match worker.queue.try_recv() {
                Ok(command) => command,
                Err(_) => break,
            };
            self.pending.fetch_sub(1, Ordering::AcqRel);

            let db = &mut worker.db;
            match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| command.run(db))) {
                Ok(()) => {
                    self.commands_executed.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    self.commands_cancelled.fetch_add(1, Ordering::Relaxed);
                    error!(
                        target: "metadb::engine",
                        "command panicked: {:?}",
                        e.downcast_ref::<&str>().copied().unwrap_or("(non-string panic)")
                    );
                }
            }
        }
    }

    /// Drop everything left in the queue. Returns the number dropped.
    fn cancel_queued(&self, queue: &mut mpsc::UnboundedReceiver<Command>) -> usize {
        let mut cancelled = 0;
        while let Ok(command) = queue.try_recv() {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            drop(command);
            cancelled += 1;
        }
        self.commands_cancelled
            .fetch_add(cancelled as u64, Ordering::Relaxed);
        cancelled
    }

    fn save(&self, db: &mut Database) {
        match db.save() {
            Ok(bytes) => {
                self.saves.fetch_add(1, Ordering::Relaxed);
                debug!(target: "metadb::engine", bytes, "Periodic save");
            }
            Err(e) => {
                error!(target: "metadb::engine", path = ?db.path(), error = %e, "Save failed");
            }
        }
    }

    fn enqueue(&self, command: Command) -> Result<()> {
        self.pending.fetch_add(1, Ordering::AcqRel);
        self.sender.send(command).map_err(|_| {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            Error::EngineClosed
        })
    }

    /// Enqueue a fire-and-forget mutation.
    pub fn submit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Database) + Send + 'static,
    {
        self.enqueue(Command::detached(f))
    }

    /// Enqueue a mutation and get a handle to its result.
    ///
    /// Usable from synchronous code, including from inside another
    /// command.
    pub fn submit_with_reply<F, R>(&self, f: F) -> Result<Completion<R>>
    where
        F: FnOnce(&mut Database) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (command, completion) = Command::with_reply(f);
        self.enqueue(command)?;
        Ok(completion)
    }

    /// Enqueue a mutation and suspend until the worker has run it.
    ///
    /// Returns the closure's result, or `Err(Cancelled)` if the engine
    /// stopped before reaching the command.
    pub async fn execute<F, R>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Database) -> R + Send + 'static,
        R: Send + 'static,
    {
        self.submit_with_reply(f)?.wait().await
    }

    /// Ask the loop to exit at its next iteration. Does not wait.
    pub fn request_stop(&self) -> StopRequest {
        match self
            .state
            .compare_exchange(RUNNING, STOPPING, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => {
                info!(target: "metadb::engine", "Stopping engine");
                StopRequest::Requested
            }
            Err(STOPPING) => StopRequest::AlreadyStopping,
            Err(_) => {
                info!(target: "metadb::engine", "Tried to stop engine while it is stopped");
                StopRequest::AlreadyStopped
            }
        }
    }

    /// Request a stop and suspend until the loop has exited.
    pub async fn stop_async(&self) -> Result<StopRequest> {
        // Subscribe before requesting so the stop signal cannot be missed
        let mut stopped = self.stopped.subscribe();
        let request = self.request_stop();
        if request == StopRequest::AlreadyStopped {
            return Ok(request);
        }
        match stopped.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => Ok(request),
            Err(broadcast::error::RecvError::Closed) => Err(Error::EngineClosed),
        }
    }

    /// Request a stop and block the calling thread until the loop has
    /// exited.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context;
    /// use [`Engine::stop_async`] there.
    pub fn stop_and_block(&self) -> Result<StopRequest> {
        let mut stopped = self.stopped.subscribe();
        let request = self.request_stop();
        if request == StopRequest::AlreadyStopped {
            return Ok(request);
        }
        match stopped.blocking_recv() {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => Ok(request),
            Err(broadcast::error::RecvError::Closed) => Err(Error::EngineClosed),
        }
    }

    /// Give the database back.
    ///
    /// Queued commands are dropped and their awaiting callers cancelled.
    pub fn into_database(self) -> Database {
        let Worker { db, .. } = self.worker.into_inner();
        db
    }
}
