use std::time::Duration;

use tracing::warn;

use crate::bench::{BenchmarkConfig, RunTotals};
use crate::http::extract_port;

/// Nanoseconds per second.
const NANOS_PER_SEC: u128 = 1_000_000_000;
/// Nanoseconds per microsecond.
const NANOS_PER_MICRO: u128 = 1_000;
/// Fixed-point scale for two-decimal figures.
const X100_SCALE: u128 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub host: String,
    pub port: Option<u16>,
    /// Wall-clock time of the whole run.
    pub elapsed: Duration,
    pub concurrency: usize,
    /// Per-request latencies summed over all workers.
    pub total_time: Duration,
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub transferred_bytes: u64,
    /// Absent when `total_time` is zero.
    pub throughput: Option<Throughput>,
}

/// Mean figures derived from the summed request time.
///
/// These divide summed time (across all workers) by request and worker
/// counts, so they are not wall-clock per-request means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    /// `total_requests / total_time`, times 100.
    pub requests_per_second_x100: u64,
    /// `total_time / total_requests`, in microseconds.
    pub mean_time_per_request_us: u64,
    /// `total_time / concurrency`, in microseconds.
    pub mean_time_per_request_per_worker_us: u64,
}

impl Report {
    #[must_use]
    pub fn new(config: &BenchmarkConfig, totals: &RunTotals, elapsed: Duration) -> Self {
        let total_requests = config.total_requests();
        if totals.executed_requests != total_requests {
            warn!(
                "Executed {} requests but expected {} ({} x {})",
                totals.executed_requests,
                total_requests,
                config.request_specs.len(),
                config.concurrency.get()
            );
        }
        let concurrency = config.concurrency.get();
        Self {
            host: config.target_host.clone(),
            port: extract_port(&config.target_host),
            elapsed,
            concurrency,
            total_time: totals.total_elapsed,
            total_requests,
            successful_requests: totals.successful_count,
            failed_requests: total_requests.saturating_sub(totals.successful_count),
            transferred_bytes: totals.transferred_bytes,
            throughput: Throughput::compute(total_requests, concurrency, totals.total_elapsed),
        }
    }
}

impl Throughput {
    #[must_use]
    pub fn compute(total_requests: u64, concurrency: usize, total_time: Duration) -> Option<Self> {
        let total_nanos = total_time.as_nanos();
        if total_nanos == 0 || total_requests == 0 {
            return None;
        }
        let requests = u128::from(total_requests);
        let workers = u128::try_from(concurrency).unwrap_or(u128::MAX).max(1);

        let requests_per_second_x100 = div_round(
            requests.saturating_mul(X100_SCALE.saturating_mul(NANOS_PER_SEC)),
            total_nanos,
        );
        let mean_time_per_request_us =
            div_round(total_nanos, requests.saturating_mul(NANOS_PER_MICRO));
        let mean_time_per_request_per_worker_us =
            div_round(total_nanos, workers.saturating_mul(NANOS_PER_MICRO));

        Some(Self {
            requests_per_second_x100: clamp_u64(requests_per_second_x100),
            mean_time_per_request_us: clamp_u64(mean_time_per_request_us),
            mean_time_per_request_per_worker_us: clamp_u64(mean_time_per_request_per_worker_us),
        })
    }
}

/// Integer division rounding half up; zero divisors yield zero.
pub(super) fn div_round(numerator: u128, divisor: u128) -> u128 {
    numerator
        .saturating_add(divisor / 2)
        .checked_div(divisor)
        .unwrap_or(0)
}

fn clamp_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
