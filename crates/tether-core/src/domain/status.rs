//! Job status snapshot: the state machine plus the terminal payload.

use serde::{Deserialize, Serialize};

use super::ids::JobId;

/// Ordered payload written by the job itself on completion/failure.
///
/// serde_json is built with `preserve_order`, so key order is insertion order
/// all the way through serialization.
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Job state as reported by the status store.
///
/// State transitions (store-side):
/// - Queued -> Working -> Completed
/// - Queued -> Working -> Failed
/// - Queued/Working -> Killed
///
/// Design note: once a job reaches a terminal state it never transitions
/// again. The store guarantees this; the poll loop relies on it and does not
/// re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Accepted by the queue, not picked up yet.
    Queued,

    /// Currently being executed by a worker.
    Working,

    /// Finished successfully.
    Completed,

    /// Finished with an error reported by the job.
    Failed,

    /// Terminated from outside before finishing.
    Killed,
}

impl JobState {
    /// Is this a terminal state (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Completed | JobState::Failed | JobState::Killed
        )
    }
}

/// Snapshot of one job's status, as read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: JobId,
    pub state: JobState,

    /// Present only once the job is terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl JobStatus {
    /// Payload lookup, for continuations that pick out one result field.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.payload.as_ref().and_then(|payload| payload.get(key))
    }
}
