use crate::config::RequestSpec;
use crate::error::AppResult;
use crate::http::RequestExecutor;

use super::WorkerTally;

/// Replays `specs` once, strictly in order, one request at a time.
///
/// # Errors
///
/// Propagates executor faults; failed requests are counted, not raised.
pub async fn run_worker<E>(executor: &E, specs: &[RequestSpec]) -> AppResult<WorkerTally>
where
    E: RequestExecutor + ?Sized,
{
    let mut tally = WorkerTally::default();
    for spec in specs {
        let outcome = executor.execute(spec).await?;
        tally.record(&outcome);
    }
    Ok(tally)
}
