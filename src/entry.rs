use std::sync::Arc;

use chrono::Local;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::info;

use crate::args::BenchArgs;
use crate::bench::{BenchmarkConfig, run_benchmark};
use crate::config::load_request_specs;
use crate::error::{AppError, AppResult, ValidationError};
use crate::http::{HttpExecutor, build_client};
use crate::logs::{HeaderRedaction, setup_request_log};
use crate::report::{export_json, report_lines};

/// Binary entry point: parses arguments and drives one benchmark run.
///
/// # Errors
///
/// Returns an error when arguments are invalid, the request list cannot be
/// loaded, the request log cannot be written, or a worker faults.
pub fn run() -> AppResult<()> {
    let args = match BenchArgs::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.print()?;
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(&args))
}

async fn run_async(args: &BenchArgs) -> AppResult<()> {
    if args.host.trim().is_empty() {
        return Err(AppError::validation(ValidationError::EmptyHost));
    }

    let request_specs = load_request_specs(&args.config)?;
    info!(
        "Loaded {} requests from {}",
        request_specs.len(),
        args.config.display()
    );
    let config = BenchmarkConfig::new(
        args.host.clone(),
        request_specs,
        args.concurrency,
        args.token.clone(),
    );

    let started_at = Local::now();
    let redaction = if args.log_secrets {
        HeaderRedaction::Verbatim
    } else {
        HeaderRedaction::Redact
    };
    let (log, writer) = setup_request_log(&args.log_dir, &started_at, redaction).await?;
    info!("Writing request log to {}", writer.path().display());

    let client = build_client(args.timeout)?;
    let executor = Arc::new(HttpExecutor::new(
        client,
        config.target_host.clone(),
        config.auth_token.as_deref(),
        log,
    )?);

    let report = run_benchmark(&config, executor).await?;

    let lines = report_lines(&report);
    println!();
    for line in &lines {
        println!("{}", line);
    }

    writer.finish(lines).await?;

    if let Some(path) = args.export_json.as_deref() {
        export_json(path, &report).await?;
        info!("Report exported to {}", path.display());
    }
    Ok(())
}
