//! Concurrent replay driver.
//!
//! Every worker replays the full request list once, in order, keeping a
//! private [`WorkerTally`]. The driver folds each finished tally into the
//! run's [`RunAccumulator`] and turns the totals into a [`Report`].
//!
//! [`Report`]: crate::report::Report
mod accumulator;
mod driver;
mod worker;


pub use accumulator::{RunAccumulator, RunTotals, WorkerTally};
pub use driver::{BenchmarkConfig, run_benchmark};
pub use worker::run_worker;
