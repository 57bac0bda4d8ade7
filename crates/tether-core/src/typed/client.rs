//! JobClient - submit jobs, get futures back.

use std::sync::Arc;

use crate::domain::{JobType, Payload};
use crate::error::FutureError;
use crate::future::{JobFuture, StatusHandle};
use crate::ports::StatusStore;

use super::job::{Job, encode_params};

/// Submission front door: submits a job through the store port immediately
/// and wraps the returned id in a [`JobFuture`].
///
/// Cloning is cheap (one `Arc`); a client can be handed to as many tasks as
/// needed.
#[derive(Clone)]
pub struct JobClient {
    store: Arc<dyn StatusStore>,
}

impl JobClient {
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self { store }
    }

    /// Submit a typed job.
    pub async fn submit<J: Job>(&self, job: &J) -> Result<JobFuture, FutureError> {
        let params = encode_params(job)?;
        self.submit_raw(JobType::new(J::TYPE), params).await
    }

    /// Submit with an explicit job type and raw params.
    pub async fn submit_raw(
        &self,
        job_type: JobType,
        params: Payload,
    ) -> Result<JobFuture, FutureError> {
        let id = self.store.submit(&job_type, params).await?;
        Ok(JobFuture::new(StatusHandle::new(
            id,
            Arc::clone(&self.store),
        )))
    }
}
