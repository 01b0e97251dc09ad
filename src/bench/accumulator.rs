use std::sync::Mutex;
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::http::RequestOutcome;

/// Per-worker subtotal, never shared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerTally {
    pub total_elapsed: Duration,
    pub successful: u64,
    pub requests: u64,
    pub response_bytes: u64,
}

impl WorkerTally {
    pub fn record(&mut self, outcome: &RequestOutcome) {
        self.total_elapsed = self.total_elapsed.saturating_add(outcome.elapsed);
        if outcome.success {
            self.successful = self.successful.saturating_add(1);
        }
        self.requests = self.requests.saturating_add(1);
        self.response_bytes = self.response_bytes.saturating_add(outcome.response_bytes);
    }
}

/// Totals across every request of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunTotals {
    /// Sum of per-request latencies, not wall-clock time.
    pub total_elapsed: Duration,
    pub successful_count: u64,
    pub executed_requests: u64,
    pub transferred_bytes: u64,
}

/// Shared totals for one run. Each worker merges exactly once.
#[derive(Debug, Default)]
pub struct RunAccumulator {
    totals: Mutex<RunTotals>,
}

impl RunAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a finished worker's tally.
    ///
    /// # Errors
    ///
    /// Returns an error when the lock was poisoned.
    pub fn merge(&self, tally: &WorkerTally) -> AppResult<()> {
        let mut totals = self.totals.lock().map_err(|err| {
            AppError::from(std::io::Error::other(format!(
                "Run accumulator lock poisoned: {}",
                err
            )))
        })?;
        totals.total_elapsed = totals.total_elapsed.saturating_add(tally.total_elapsed);
        totals.successful_count = totals.successful_count.saturating_add(tally.successful);
        totals.executed_requests = totals.executed_requests.saturating_add(tally.requests);
        totals.transferred_bytes = totals
            .transferred_bytes
            .saturating_add(tally.response_bytes);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error when the lock was poisoned.
    pub fn snapshot(&self) -> AppResult<RunTotals> {
        self.totals.lock().map(|totals| *totals).map_err(|err| {
            AppError::from(std::io::Error::other(format!(
                "Run accumulator lock poisoned: {}",
                err
            )))
        })
    }
}
