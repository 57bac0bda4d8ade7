//! StatusStore port - the interface to the external job/status subsystem.
//!
//! The core only ever *reads* job progress through this port, plus one write
//! path: submitting a job. Everything behind it (queue, workers, storage
//! engine) is someone else's problem.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{JobId, JobStatus, JobType, Payload};

/// Errors raised at the store boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("unknown job: {0}")]
    UnknownJob(JobId),

    /// A transition was attempted on a job that already reached a terminal
    /// state. Terminal states never change.
    #[error("job already terminal: {0}")]
    AlreadyTerminal(JobId),

    #[error("status store unavailable: {0}")]
    Unavailable(String),
}

/// Port to the job queue + status store pair.
///
/// Design:
/// - `submit` is fire-and-forget: the id comes back immediately, execution
///   happens elsewhere.
/// - `get_status` is a single read per call; `Ok(None)` while the job is
///   unknown or not yet visible. Retry policy belongs to the caller's poll
///   loop, not to implementations.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Enqueue a job of `job_type` with `params`; returns its id.
    async fn submit(&self, job_type: &JobType, params: Payload) -> Result<JobId, StoreError>;

    /// Latest known status for `id`, or `Ok(None)` if the store has nothing.
    async fn get_status(&self, id: &JobId) -> Result<Option<JobStatus>, StoreError>;
}
