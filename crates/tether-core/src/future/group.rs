//! Multi-future wait: poll many chains concurrently, keep input order.

use std::time::{Duration, Instant};

use crate::error::FutureError;

use super::{DEFAULT_POLL_INTERVAL, DEFAULT_WAIT_TIMEOUT, JobFuture, WaitOutcome};

/// [`wait_all_with`] with the default timeout/interval.
pub async fn wait_all(futures: Vec<JobFuture>) -> Result<Vec<WaitOutcome>, FutureError> {
    wait_all_with(futures, DEFAULT_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL).await
}

/// Wait on an ordered collection of futures concurrently.
///
/// One task per future, all bound by one shared deadline fixed before
/// anything is spawned; each future's poll cadence stays independent (one
/// chain sleeping never blocks another's tick). Results come back
/// index-aligned with the input, whatever the completion order.
///
/// All-or-nothing: the first error (timeout, store, continuation) aborts the
/// remaining waits and is returned; partial results are discarded. Timing out
/// does not touch the underlying jobs - they may still be running, the store
/// has no cancel primitive here.
pub async fn wait_all_with(
    futures: Vec<JobFuture>,
    timeout: Duration,
    interval: Duration,
) -> Result<Vec<WaitOutcome>, FutureError> {
    let deadline = Instant::now() + timeout;

    let mut joins = Vec::with_capacity(futures.len());
    for mut future in futures {
        joins.push(tokio::spawn(async move {
            future.wait_until(deadline, timeout, interval).await
        }));
    }

    // Join in input order so outcome[i] belongs to futures[i].
    let mut outcomes = Vec::with_capacity(joins.len());
    let mut joins = joins.into_iter();
    while let Some(join) = joins.next() {
        let result = match join.await {
            Ok(result) => result,
            Err(e) => Err(FutureError::Other(format!("wait task panicked: {e}"))),
        };
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                for join in joins {
                    join.abort();
                }
                return Err(err);
            }
        }
    }
    Ok(outcomes)
}
