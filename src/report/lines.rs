use std::time::Duration;

use super::Report;
use super::stats::div_round;

/// Microseconds per millisecond.
const MICROS_PER_MILLI: u128 = 1_000;

/// Report as aligned `Label: value` lines, shared by console and log file.
#[must_use]
pub fn report_lines(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push("Server Software:".to_owned());
    lines.push(format!("Server Hostname:      {}", report.host));
    lines.push(format!(
        "Server Port:          {}",
        report
            .port
            .map_or_else(|| "None".to_owned(), |port| port.to_string())
    ));
    lines.push(format!(
        "Elapsed Time:         {} seconds",
        format_secs(report.elapsed)
    ));
    lines.push(String::new());
    lines.push(format!("Concurrency Level:    {}", report.concurrency));
    lines.push(format!(
        "Time taken for tests: {} seconds",
        format_secs(report.total_time)
    ));
    lines.push(format!("Total requests:       {}", report.total_requests));
    lines.push(format!("Failed requests:      {}", report.failed_requests));
    lines.push(format!(
        "Total transferred:    {} bytes",
        report.transferred_bytes
    ));
    if let Some(throughput) = report.throughput.as_ref() {
        lines.push(format!(
            "Requests per second:  {} [#/sec] (mean)",
            format_x100(throughput.requests_per_second_x100)
        ));
        lines.push(format!(
            "Time per request:     {} [ms] (mean)",
            format_us_as_ms(throughput.mean_time_per_request_us)
        ));
        lines.push(format!(
            "Time per request(OU): {} [ms] (mean, across all concurrent users)",
            format_us_as_ms(throughput.mean_time_per_request_per_worker_us)
        ));
    }
    lines
}

pub(super) fn format_secs(duration: Duration) -> String {
    let millis = div_round(duration.as_micros(), MICROS_PER_MILLI);
    format!("{}.{:03}", millis / 1_000, millis % 1_000)
}

pub(super) fn format_x100(value: u64) -> String {
    format!("{}.{:02}", value / 100, value % 100)
}

pub(super) fn format_us_as_ms(value: u64) -> String {
    format!("{}.{:03}", value / 1_000, value % 1_000)
}
