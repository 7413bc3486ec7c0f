//! Queued mutation commands and their completion handles

use crate::database::Database;
use metadb_core::{Error, Result};
use tokio::sync::oneshot;

type Action = Box<dyn FnOnce(&mut Database) + Send + 'static>;

/// A mutation waiting in the engine queue.
///
/// Awaited commands carry the reply sender inside their action. Dropping
/// a command without running it drops that sender, which resolves the
/// waiting [`Completion`] with [`Error::Cancelled`].
pub(crate) struct Command {
    action: Action,
}

impl Command {
    /// A command nobody waits on.
    pub(crate) fn detached<F>(f: F) -> Self
    where
        F: FnOnce(&mut Database) + Send + 'static,
    {
        Command {
            action: Box::new(f),
        }
    }

    /// A command whose return value is delivered to the returned handle.
    pub(crate) fn with_reply<F, R>(f: F) -> (Self, Completion<R>)
    where
        F: FnOnce(&mut Database) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let command = Command {
            action: Box::new(move |db: &mut Database| {
                // The caller may have stopped waiting
                let _ = tx.send(f(db));
            }),
        };
        (command, Completion { rx })
    }

    pub(crate) fn run(self, db: &mut Database) {
        (self.action)(db)
    }
}

/// Handle to the result of a queued command.
///
/// Resolves once the worker has run the command against the database.
#[must_use = "a completion does nothing unless waited on"]
#[derive(Debug)]
pub struct Completion<R> {
    rx: oneshot::Receiver<R>,
}

impl<R> Completion<R> {
    /// Suspend until the command has run.
    ///
    /// Returns `Err(Cancelled)` if the command was dropped unexecuted
    /// (engine stopped first, or the command panicked).
    pub async fn wait(self) -> Result<R> {
        self.rx.await.map_err(|_| Error::Cancelled)
    }

    /// Block the current thread until the command has run.
    ///
    /// # Panics
    ///
    /// Panics if called from within an asynchronous execution context.
    pub fn wait_blocking(self) -> Result<R> {
        self.rx.blocking_recv().map_err(|_| Error::Cancelled)
    }
}
