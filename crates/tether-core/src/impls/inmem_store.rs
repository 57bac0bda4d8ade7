//! In-memory status store implementation (dev/test).
//!
//! Production deployments put a real queue + shared store behind the port;
//! this one keeps everything in a single mutex-guarded map so tests and the
//! demo harness can drive job lifecycles by hand.

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::domain::{JobId, JobState, JobStatus, JobType, Payload};
use crate::ports::{Clock, StatusStore, StoreError, SystemClock};

/// Everything a worker needs to execute one claimed job.
#[derive(Debug, Clone)]
pub struct JobEnvelope {
    pub id: JobId,
    pub job_type: JobType,
    pub params: Payload,
}

/// Job record: the store's single source of truth for one job.
#[derive(Debug, Clone)]
struct JobRecord {
    job_type: JobType,
    params: Payload,
    state: JobState,
    payload: Option<Payload>,

    /// Timestamps for claim ordering / observability.
    created_at: Instant,
    updated_at: Instant,
}

impl JobRecord {
    fn new(job_type: JobType, params: Payload) -> Self {
        let now = Instant::now();
        Self {
            job_type,
            params,
            state: JobState::Queued,
            payload: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn transition(&mut self, state: JobState, payload: Option<Payload>) {
        self.state = state;
        self.payload = payload;
        self.updated_at = Instant::now();
    }
}

/// Counts by state for observability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreCounts {
    pub queued: usize,
    pub working: usize,
    pub completed: usize,
    pub failed: usize,
    pub killed: usize,
}

/// In-memory implementation of the [`StatusStore`] port.
///
/// Ids are ULIDs minted from the injected [`Clock`] plus random entropy, so
/// `FixedClock` pins the timestamp half in tests. Transition methods enforce
/// the store-side invariant the poll loop relies on: a terminal state never
/// changes.
pub struct InMemoryStatusStore<C = SystemClock> {
    clock: C,
    jobs: Mutex<HashMap<JobId, JobRecord>>,
}

impl InMemoryStatusStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStatusStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStatusStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    fn mint_id(&self) -> JobId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        JobId::from(Ulid::from_parts(timestamp_ms, rand::random()))
    }

    /// Claim the oldest queued job (Queued -> Working) and hand out its
    /// envelope. Workers poll this.
    pub async fn claim_next(&self) -> Option<JobEnvelope> {
        let mut jobs = self.jobs.lock().await;
        let id = jobs
            .iter()
            .filter(|(_, record)| record.state == JobState::Queued)
            .min_by_key(|(_, record)| record.created_at)
            .map(|(id, _)| id.clone())?;

        let record = jobs.get_mut(&id)?;
        record.transition(JobState::Working, None);
        Some(JobEnvelope {
            id,
            job_type: record.job_type.clone(),
            params: record.params.clone(),
        })
    }

    /// Mark a queued job as picked up.
    pub async fn mark_working(&self, id: &JobId) -> Result<(), StoreError> {
        self.transition(id, JobState::Working, None).await
    }

    /// Finish a job successfully, recording its result payload.
    pub async fn complete(&self, id: &JobId, payload: Payload) -> Result<(), StoreError> {
        self.transition(id, JobState::Completed, Some(payload)).await
    }

    /// Finish a job with an error payload.
    pub async fn fail(&self, id: &JobId, payload: Payload) -> Result<(), StoreError> {
        self.transition(id, JobState::Failed, Some(payload)).await
    }

    /// Terminate a job from outside.
    pub async fn kill(&self, id: &JobId) -> Result<(), StoreError> {
        self.transition(id, JobState::Killed, None).await
    }

    async fn transition(
        &self,
        id: &JobId,
        state: JobState,
        payload: Option<Payload>,
    ) -> Result<(), StoreError> {
        let mut jobs = self.jobs.lock().await;
        let record = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownJob(id.clone()))?;
        if record.state.is_terminal() {
            // Terminal states never change once written.
            return Err(StoreError::AlreadyTerminal(id.clone()));
        }
        record.transition(state, payload);
        Ok(())
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn counts_by_state(&self) -> StoreCounts {
        let jobs = self.jobs.lock().await;
        let mut counts = StoreCounts::default();
        for record in jobs.values() {
            match record.state {
                JobState::Queued => counts.queued += 1,
                JobState::Working => counts.working += 1,
                JobState::Completed => counts.completed += 1,
                JobState::Failed => counts.failed += 1,
                JobState::Killed => counts.killed += 1,
            }
        }
        counts
    }
}

#[async_trait]
impl<C: Clock> StatusStore for InMemoryStatusStore<C> {
    async fn submit(&self, job_type: &JobType, params: Payload) -> Result<JobId, StoreError> {
        let id = self.mint_id();
        let mut jobs = self.jobs.lock().await;
        jobs.insert(id.clone(), JobRecord::new(job_type.clone(), params));
        Ok(id)
    }

    async fn get_status(&self, id: &JobId) -> Result<Option<JobStatus>, StoreError> {
        let jobs = self.jobs.lock().await;
        Ok(jobs.get(id).map(|record| JobStatus {
            id: id.clone(),
            state: record.state,
            payload: record.payload.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    fn payload_of(key: &str, value: serde_json::Value) -> Payload {
        let mut payload = Payload::new();
        payload.insert(key.to_string(), value);
        payload
    }

    #[tokio::test]
    async fn submitted_jobs_start_queued_without_payload() {
        let store = InMemoryStatusStore::new();
        let id = store
            .submit(&JobType::new("noop"), Payload::new())
            .await
            .unwrap();

        let status = store.get_status(&id).await.unwrap().unwrap();
        assert_eq!(status.state, JobState::Queued);
        assert_eq!(status.payload, None);
    }

    #[tokio::test]
    async fn unknown_jobs_read_as_none() {
        let store = InMemoryStatusStore::new();
        let status = store.get_status(&JobId::new("nope")).await.unwrap();
        assert!(status.is_none());
    }

    #[tokio::test]
    async fn complete_sets_terminal_state_and_payload() {
        let store = InMemoryStatusStore::new();
        let id = store
            .submit(&JobType::new("noop"), Payload::new())
            .await
            .unwrap();

        store.mark_working(&id).await.unwrap();
        store
            .complete(&id, payload_of("x", serde_json::json!(1)))
            .await
            .unwrap();

        let status = store.get_status(&id).await.unwrap().unwrap();
        assert_eq!(status.state, JobState::Completed);
        assert_eq!(status.get("x"), Some(&serde_json::json!(1)));
    }

    #[tokio::test]
    async fn terminal_states_reject_further_transitions() {
        let store = InMemoryStatusStore::new();
        let id = store
            .submit(&JobType::new("noop"), Payload::new())
            .await
            .unwrap();
        store.kill(&id).await.unwrap();

        let err = store.complete(&id, Payload::new()).await.unwrap_err();
        assert_eq!(err, StoreError::AlreadyTerminal(id.clone()));

        // Still killed, payload untouched.
        let status = store.get_status(&id).await.unwrap().unwrap();
        assert_eq!(status.state, JobState::Killed);
        assert_eq!(status.payload, None);
    }

    #[tokio::test]
    async fn transitions_on_unknown_jobs_error() {
        let store = InMemoryStatusStore::new();
        let err = store.mark_working(&JobId::new("ghost")).await.unwrap_err();
        assert_eq!(err, StoreError::UnknownJob(JobId::new("ghost")));
    }

    #[tokio::test]
    async fn claim_next_hands_out_oldest_queued_job() {
        let store = InMemoryStatusStore::new();
        let first = store
            .submit(&JobType::new("first"), payload_of("n", serde_json::json!(1)))
            .await
            .unwrap();
        // Instant has nanosecond resolution but keep the ordering unambiguous.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let _second = store
            .submit(&JobType::new("second"), Payload::new())
            .await
            .unwrap();

        let envelope = store.claim_next().await.unwrap();
        assert_eq!(envelope.id, first);
        assert_eq!(envelope.job_type.as_str(), "first");
        assert_eq!(envelope.params.get("n"), Some(&serde_json::json!(1)));

        let status = store.get_status(&first).await.unwrap().unwrap();
        assert_eq!(status.state, JobState::Working);
    }

    #[tokio::test]
    async fn counts_follow_the_lifecycle() {
        let store = InMemoryStatusStore::new();
        let a = store
            .submit(&JobType::new("a"), Payload::new())
            .await
            .unwrap();
        let _b = store
            .submit(&JobType::new("b"), Payload::new())
            .await
            .unwrap();

        store.complete(&a, Payload::new()).await.unwrap();

        let counts = store.counts_by_state().await;
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.queued, 1);
        assert_eq!(counts.working, 0);
        assert_eq!(store.job_count().await, 2);
    }

    #[tokio::test]
    async fn fixed_clock_pins_the_id_timestamp_half() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let store = InMemoryStatusStore::with_clock(FixedClock::new(t));

        let id1 = store
            .submit(&JobType::new("a"), Payload::new())
            .await
            .unwrap();
        let id2 = store
            .submit(&JobType::new("b"), Payload::new())
            .await
            .unwrap();

        // Random halves differ, timestamp halves (first 10 ULID chars) match.
        assert_ne!(id1, id2);
        assert_eq!(id1.as_str()[..10], id2.as_str()[..10]);
    }
}
