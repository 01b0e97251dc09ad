use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::args::PositiveUsize;
use crate::config::RequestSpec;
use crate::error::{AppError, AppResult};
use crate::http::RequestExecutor;
use crate::report::Report;

use super::{RunAccumulator, run_worker};

/// Immutable inputs of one run.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub target_host: String,
    pub request_specs: Arc<[RequestSpec]>,
    pub concurrency: PositiveUsize,
    pub auth_token: Option<String>,
}

impl BenchmarkConfig {
    #[must_use]
    pub fn new(
        target_host: String,
        request_specs: Vec<RequestSpec>,
        concurrency: PositiveUsize,
        auth_token: Option<String>,
    ) -> Self {
        Self {
            target_host,
            request_specs: request_specs.into(),
            concurrency,
            auth_token,
        }
    }

    /// Every worker replays the whole list: `len(specs) * concurrency`.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        let per_worker = u64::try_from(self.request_specs.len()).unwrap_or(u64::MAX);
        let workers = u64::try_from(self.concurrency.get()).unwrap_or(u64::MAX);
        per_worker.saturating_mul(workers)
    }
}

/// Runs `concurrency` workers over the full request list and reports totals.
///
/// Each worker's tally is merged as soon as that worker finishes. The first
/// worker fault aborts the remaining workers and is returned.
///
/// # Errors
///
/// Returns an error when a worker fails or panics.
pub async fn run_benchmark<E>(config: &BenchmarkConfig, executor: Arc<E>) -> AppResult<Report>
where
    E: RequestExecutor + ?Sized + 'static,
{
    let accumulator = RunAccumulator::new();
    let concurrency = config.concurrency.get();
    info!(
        "Replaying {} requests with {} concurrent users against {}",
        config.request_specs.len(),
        concurrency,
        config.target_host
    );

    let start = Instant::now();
    let mut workers = JoinSet::new();
    for worker_id in 0..concurrency {
        let executor = Arc::clone(&executor);
        let specs = Arc::clone(&config.request_specs);
        workers.spawn(async move {
            let tally = run_worker(executor.as_ref(), &specs).await?;
            debug!(
                "Worker {} finished: {} requests, {} successful",
                worker_id, tally.requests, tally.successful
            );
            Ok::<_, AppError>(tally)
        });
    }

    while let Some(joined) = workers.join_next().await {
        let tally = joined??;
        accumulator.merge(&tally)?;
    }
    let elapsed = start.elapsed();

    let totals = accumulator.snapshot()?;
    info!(
        "Run finished in {:?}: {}/{} requests successful",
        elapsed,
        totals.successful_count,
        config.total_requests()
    );
    Ok(Report::new(config, &totals, elapsed))
}
