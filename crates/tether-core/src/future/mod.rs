//! Future core: JobFuture (wait/status/then), chain steps, multi-wait.
//!
//! A [`JobFuture`] tracks the eventual terminal outcome of one job or a chain
//! of jobs. Progress detection is fixed-interval polling against the status
//! store - the store has no push/subscribe mechanism, so every tick is one
//! read plus a timeout/continuation decision.

mod group;
mod handle;

pub use group::{wait_all, wait_all_with};
pub use handle::StatusHandle;

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::domain::{JobId, JobStatus, JobType, Payload};
use crate::error::FutureError;
use crate::ports::{StatusStore, StoreError};
use crate::typed::{Job, encode_params};

/// Default deadline for a whole `wait` invocation (the entire chain).
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default pause between poll ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// User-supplied logic run once the upstream job is confirmed terminal.
///
/// Invoked at most once per chain link, only inside `wait` - `then` records
/// it without running anything. An `Err` aborts the chain as
/// [`FutureError::Continuation`].
pub type Continuation = Box<dyn FnOnce(JobStatus) -> Result<ChainStep, String> + Send + 'static>;

/// A continuation's verdict: chain further, or stop with a value.
pub enum ChainStep {
    /// Submit a follow-up job. The wait loop performs the one submission
    /// (at most once, through the chain's own store) and keeps polling on
    /// the new job under the original deadline.
    Submit { job_type: JobType, params: Payload },

    /// Chain onto a future that already exists.
    Future(JobFuture),

    /// Terminal value; the chain stops here.
    Value(serde_json::Value),
}

impl ChainStep {
    /// Follow up with a job of `job_type` and raw `params`.
    pub fn submit(job_type: impl Into<String>, params: Payload) -> Self {
        ChainStep::Submit {
            job_type: JobType::new(job_type),
            params,
        }
    }

    /// Typed form of [`ChainStep::submit`].
    pub fn job<J: Job>(job: &J) -> Result<Self, String> {
        let params = encode_params(job).map_err(|e| e.to_string())?;
        Ok(ChainStep::Submit {
            job_type: JobType::new(J::TYPE),
            params,
        })
    }

    /// Stop the chain with a plain value.
    pub fn value(value: impl Into<serde_json::Value>) -> Self {
        ChainStep::Value(value.into())
    }
}

/// What a finished wait hands back: the chain-final status, or the value a
/// continuation stopped the chain with.
#[derive(Debug, Clone, PartialEq)]
pub enum WaitOutcome {
    Status(JobStatus),
    Value(serde_json::Value),
}

impl WaitOutcome {
    pub fn status(&self) -> Option<&JobStatus> {
        match self {
            WaitOutcome::Status(status) => Some(status),
            WaitOutcome::Value(_) => None,
        }
    }

    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            WaitOutcome::Status(_) => None,
            WaitOutcome::Value(value) => Some(value),
        }
    }
}

/// The currently active link of a chain.
enum Link {
    /// A submitted job being chased.
    Job(StatusHandle),

    /// The chain already resolved; no more store reads needed.
    Settled(WaitOutcome),
}

/// Handle for the eventual terminal outcome of one job or a chain of jobs.
///
/// A future is the active [`Link`] plus an ordered queue of continuations
/// still separating that link from the chain-final result. A non-empty queue
/// means this future is a chain link whose own job has not been submitted
/// yet, so [`JobFuture::status`] reports `None` for it.
///
/// Ownership: exclusively owned. `then` consumes the future and `wait` takes
/// `&mut self`, so two callers cannot wait on the same instance at once.
pub struct JobFuture {
    store: Arc<dyn StatusStore>,
    link: Link,
    queue: VecDeque<Continuation>,
}

impl JobFuture {
    /// Wrap a live handle to an already-submitted job.
    pub fn new(handle: StatusHandle) -> Self {
        Self {
            store: Arc::clone(handle.store()),
            link: Link::Job(handle),
            queue: VecDeque::new(),
        }
    }

    /// Id of the tracked job, `None` while this is an unfired chain link or
    /// once the chain settled to a plain value.
    pub fn id(&self) -> Option<&JobId> {
        if !self.queue.is_empty() {
            return None;
        }
        match &self.link {
            Link::Job(handle) => Some(handle.id()),
            Link::Settled(_) => None,
        }
    }

    /// Current status along the chain: one store read on the active handle.
    ///
    /// `Ok(None)` when this future is a chain link whose continuation has not
    /// fired yet (its own job is not submitted), and when the chain settled
    /// to a plain value. Never invokes continuations.
    pub async fn status(&self) -> Result<Option<JobStatus>, StoreError> {
        if !self.queue.is_empty() {
            // Chain link: the downstream job does not exist until the
            // upstream resolves and the continuation runs.
            return Ok(None);
        }
        match &self.link {
            Link::Job(handle) => handle.status().await,
            Link::Settled(WaitOutcome::Status(status)) => Ok(Some(status.clone())),
            Link::Settled(WaitOutcome::Value(_)) => Ok(None),
        }
    }

    /// Record a continuation to run once this chain's job terminates.
    ///
    /// Lazy: no submission, no store read. The continuation fires during a
    /// later `wait`, after the upstream is confirmed terminal.
    pub fn then<F>(mut self, continuation: F) -> Self
    where
        F: FnOnce(JobStatus) -> Result<ChainStep, String> + Send + 'static,
    {
        self.queue.push_back(Box::new(continuation));
        self
    }

    /// Wait with the default timeout/interval.
    pub async fn wait(&mut self) -> Result<WaitOutcome, FutureError> {
        self.wait_with(DEFAULT_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL)
            .await
    }

    /// Poll until the chain-final result or `timeout`, sleeping `interval`
    /// between ticks.
    pub async fn wait_with(
        &mut self,
        timeout: Duration,
        interval: Duration,
    ) -> Result<WaitOutcome, FutureError> {
        let deadline = Instant::now() + timeout;
        self.wait_until(deadline, timeout, interval).await
    }

    /// The poll loop. One deadline bounds the entire chain, however many
    /// links it grows; the walk is iterative, so arbitrarily long chains
    /// never grow the call stack.
    pub(crate) async fn wait_until(
        &mut self,
        deadline: Instant,
        timeout: Duration,
        interval: Duration,
    ) -> Result<WaitOutcome, FutureError> {
        loop {
            let terminal: Option<JobStatus> = match &self.link {
                Link::Settled(WaitOutcome::Value(value)) => {
                    // The chain terminated at a plain value. Anything still
                    // queued has no terminal status to run against and is
                    // dropped.
                    let value = value.clone();
                    self.queue.clear();
                    return Ok(WaitOutcome::Value(value));
                }
                Link::Settled(WaitOutcome::Status(status)) => Some(status.clone()),
                // One read per tick; a store error fails the wait right here.
                Link::Job(handle) => handle
                    .status()
                    .await?
                    .filter(|status| status.state.is_terminal()),
            };

            if let Some(status) = terminal {
                match self.queue.pop_front() {
                    None => {
                        let outcome = WaitOutcome::Status(status);
                        self.link = Link::Settled(outcome.clone());
                        return Ok(outcome);
                    }
                    Some(continuation) => {
                        match continuation(status).map_err(FutureError::Continuation)? {
                            ChainStep::Submit { job_type, params } => {
                                let id = self.store.submit(&job_type, params).await?;
                                self.link =
                                    Link::Job(StatusHandle::new(id, Arc::clone(&self.store)));
                            }
                            ChainStep::Future(next) => {
                                // Splice the downstream chain in front of
                                // whatever we still have queued.
                                for continuation in next.queue.into_iter().rev() {
                                    self.queue.push_front(continuation);
                                }
                                self.store = next.store;
                                self.link = next.link;
                            }
                            ChainStep::Value(value) => {
                                self.queue.clear();
                                let outcome = WaitOutcome::Value(value);
                                self.link = Link::Settled(outcome.clone());
                                return Ok(outcome);
                            }
                        }
                        // The chain advanced; look at the new link right away.
                        continue;
                    }
                }
            }

            if Instant::now() >= deadline {
                return Err(FutureError::Timeout(timeout));
            }
            tokio::time::sleep(interval).await;
        }
    }
}
