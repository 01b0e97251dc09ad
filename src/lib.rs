//! Core library for the `replaybench` CLI.
//!
//! `replaybench` replays a fixed list of HTTP requests once per simulated
//! user, with every user running concurrently, then reports aggregate
//! latency and throughput figures alongside a per-request log file. The
//! library exposes the building blocks the binary is assembled from:
//! argument types, request list loading, request execution, the concurrent
//! driver, and report rendering.
pub mod args;
pub mod bench;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
pub mod logs;
pub mod report;

mod logger;
