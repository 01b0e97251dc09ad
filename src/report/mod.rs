//! Derived statistics and their console, log, and JSON renderings.
mod export;
mod lines;
mod stats;


pub use export::{export_json, report_json};
pub use lines::report_lines;
pub use stats::{Report, Throughput};
