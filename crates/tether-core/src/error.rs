use std::time::Duration;

use thiserror::Error;

use crate::ports::store::StoreError;

/// Errors surfaced by `wait` / `wait_all` and by job submission.
#[derive(Debug, Error)]
pub enum FutureError {
    /// The shared deadline elapsed before the job chain reached a terminal,
    /// non-chained result. Never retried automatically.
    #[error("timed out after {0:?} before the job chain finished")]
    Timeout(Duration),

    /// The status store could not be reached/queried. Surfaced on the poll
    /// tick it happens (fail-fast); the loop does not absorb it.
    #[error("status store: {0}")]
    Store(#[from] StoreError),

    /// A continuation reported an error; the chain aborts at that link.
    #[error("continuation failed: {0}")]
    Continuation(String),

    /// Job params did not encode to a JSON object.
    #[error("params encode failed: {0}")]
    Encode(String),

    #[error("{0}")]
    Other(String),
}
