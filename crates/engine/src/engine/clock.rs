//! Drift-carrying save timer

use std::time::Duration;

/// Decides when the worker loop performs a periodic save.
///
/// Elapsed time accumulates across iterations. Crossing the period
/// subtracts one period instead of resetting to zero, so an iteration that
/// overshoots does not push every later save back by the overshoot.
#[derive(Debug, Clone)]
pub(crate) struct SaveClock {
    period: Duration,
    accumulated: Duration,
}

impl SaveClock {
    pub(crate) fn new(period: Duration) -> Self {
        SaveClock {
            period,
            accumulated: Duration::ZERO,
        }
    }

    /// Add `elapsed` and report whether a save is due.
    ///
    /// At most one save is reported per call; a backlog of several periods
    /// drains one period per call.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> bool {
        self.accumulated += elapsed;
        if self.accumulated >= self.period {
            self.accumulated -= self.period;
            true
        } else {
            false
        }
    }

    /// Time accumulated toward the next save.
    pub(crate) fn residual(&self) -> Duration {
        self.accumulated
    }
}
