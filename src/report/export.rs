use std::path::Path;

use tokio::io::{AsyncWriteExt, BufWriter};

use crate::error::{AppError, AppResult, SinkError};

use super::Report;

/// JSON document for `--export-json`.
#[must_use]
pub fn report_json(report: &Report) -> serde_json::Value {
    let throughput = report.throughput.as_ref().map(|throughput| {
        serde_json::json!({
            "requests_per_second_x100": throughput.requests_per_second_x100,
            "mean_time_per_request_us": throughput.mean_time_per_request_us,
            "mean_time_per_request_per_worker_us": throughput.mean_time_per_request_per_worker_us
        })
    });
    serde_json::json!({
        "host": report.host,
        "port": report.port,
        "elapsed_ms": u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
        "concurrency": report.concurrency,
        "total_time_ms": u64::try_from(report.total_time.as_millis()).unwrap_or(u64::MAX),
        "total_requests": report.total_requests,
        "successful_requests": report.successful_requests,
        "failed_requests": report.failed_requests,
        "transferred_bytes": report.transferred_bytes,
        "throughput": throughput
    })
}

/// Writes the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error when the report cannot be serialized or written.
pub async fn export_json(path: &Path, report: &Report) -> AppResult<()> {
    let json = serde_json::to_vec_pretty(&report_json(report))
        .map_err(|err| AppError::sink(SinkError::SerializeReport { source: err }))?;
    let write_err = |err: std::io::Error| {
        AppError::sink(SinkError::WriteReport {
            path: path.to_path_buf(),
            source: err,
        })
    };
    let file = tokio::fs::File::create(path).await.map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(&json).await.map_err(write_err)?;
    writer.flush().await.map_err(write_err)?;
    Ok(())
}
