use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Local, Timelike};
use tokio::{
    fs::{self, File, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
    sync::mpsc,
    task::JoinHandle,
};
use tracing::debug;

use crate::error::{AppError, AppResult, SinkError};

use super::{HeaderRedaction, RequestRecord};

/// Upper bound on `_N` suffixes tried when a log name is already taken.
const MAX_NAME_ATTEMPTS: u32 = 1_000;

#[derive(Debug)]
enum LogEntry {
    Request(Box<RequestRecord>),
    Summary(Vec<String>),
    Close,
}

/// Cloneable handle used by executors to append request records.
#[derive(Debug, Clone)]
pub struct RequestLog {
    tx: mpsc::UnboundedSender<LogEntry>,
}

impl RequestLog {
    /// Queues one request record for the writer task.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer task has already stopped.
    pub fn record(&self, record: RequestRecord) -> AppResult<()> {
        if self.tx.send(LogEntry::Request(Box::new(record))).is_err() {
            return Err(AppError::sink(SinkError::LogClosed));
        }
        Ok(())
    }
}

/// Owner of the writer task; closes the log once the run is over.
#[derive(Debug)]
pub struct RequestLogWriter {
    path: PathBuf,
    tx: mpsc::UnboundedSender<LogEntry>,
    handle: JoinHandle<AppResult<u64>>,
}

impl RequestLogWriter {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends the summary block, drains pending records, and closes the file.
    /// Returns the number of request blocks written.
    ///
    /// # Errors
    ///
    /// Returns an error when the writer task failed or could not write.
    pub async fn finish(self, summary: Vec<String>) -> AppResult<u64> {
        let queued = self.tx.send(LogEntry::Summary(summary)).is_ok()
            && self.tx.send(LogEntry::Close).is_ok();
        let written = self
            .handle
            .await
            .map_err(|err| AppError::sink(SinkError::WriterTask { source: err }))??;
        if !queued {
            return Err(AppError::sink(SinkError::LogClosed));
        }
        debug!(
            "Request log {} closed after {} records",
            self.path.display(),
            written
        );
        Ok(written)
    }
}

/// File name for a run started at `started_at`; `attempt > 0` adds a suffix.
#[must_use]
pub fn log_file_name(started_at: &DateTime<Local>, attempt: u32) -> String {
    let stamp = format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        started_at.year(),
        started_at.month(),
        started_at.day(),
        started_at.hour(),
        started_at.minute(),
        started_at.second()
    );
    if attempt == 0 {
        format!("benchmark_log_{}.log", stamp)
    } else {
        format!("benchmark_log_{}_{}.log", stamp, attempt)
    }
}

/// Creates a fresh log file under `dir` and spawns its writer task.
/// `redaction` decides whether credential headers reach the file.
///
/// # Errors
///
/// Returns an error when the directory or file cannot be created.
pub async fn setup_request_log(
    dir: &Path,
    started_at: &DateTime<Local>,
    redaction: HeaderRedaction,
) -> AppResult<(RequestLog, RequestLogWriter)> {
    fs::create_dir_all(dir).await.map_err(|err| {
        AppError::sink(SinkError::CreateLogDir {
            path: dir.to_path_buf(),
            source: err,
        })
    })?;
    let (path, file) = open_unique(dir, started_at).await?;
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(write_entries(path.clone(), file, rx, redaction));
    Ok((
        RequestLog { tx: tx.clone() },
        RequestLogWriter { path, tx, handle },
    ))
}

async fn open_unique(dir: &Path, started_at: &DateTime<Local>) -> AppResult<(PathBuf, File)> {
    let mut attempt: u32 = 0;
    loop {
        let path = dir.join(log_file_name(started_at, attempt));
        match OpenOptions::new()
            .append(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                attempt = attempt.saturating_add(1);
            }
            Err(err) => {
                return Err(AppError::sink(SinkError::OpenLog { path, source: err }));
            }
        }
    }
}

async fn write_entries(
    path: PathBuf,
    file: File,
    mut rx: mpsc::UnboundedReceiver<LogEntry>,
    redaction: HeaderRedaction,
) -> AppResult<u64> {
    let mut writer = BufWriter::new(file);
    let mut written: u64 = 0;

    while let Some(entry) = rx.recv().await {
        match entry {
            LogEntry::Request(record) => {
                let block = record
                    .render(redaction)
                    .map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))?;
                write_block(&mut writer, &path, block.as_bytes()).await?;
                written = written.saturating_add(1);
            }
            LogEntry::Summary(lines) => {
                let mut block = String::from("\n\n");
                for line in &lines {
                    block.push_str(line);
                    block.push('\n');
                }
                write_block(&mut writer, &path, block.as_bytes()).await?;
            }
            LogEntry::Close => break,
        }
    }

    Ok(written)
}

async fn write_block(writer: &mut BufWriter<File>, path: &Path, block: &[u8]) -> AppResult<()> {
    writer.write_all(block).await.map_err(|err| {
        AppError::sink(SinkError::WriteLog {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    writer.flush().await.map_err(|err| {
        AppError::sink(SinkError::WriteLog {
            path: path.to_path_buf(),
            source: err,
        })
    })
}
