//! StatusHandle: one submitted job's identity plus lazy status reads.

use std::fmt;
use std::sync::Arc;

use crate::domain::{JobId, JobStatus};
use crate::ports::{StatusStore, StoreError};

/// Immutable reference to one submitted job.
///
/// `status()` performs exactly one store read per call and caches nothing;
/// callers that need repeated reads call it repeatedly (that is what the poll
/// loop does). Store errors surface as-is: retry policy belongs to the loop,
/// not here.
#[derive(Clone)]
pub struct StatusHandle {
    id: JobId,
    store: Arc<dyn StatusStore>,
}

impl StatusHandle {
    pub fn new(id: JobId, store: Arc<dyn StatusStore>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> &JobId {
        &self.id
    }

    pub(crate) fn store(&self) -> &Arc<dyn StatusStore> {
        &self.store
    }

    /// Latest known status snapshot, `Ok(None)` while the store has nothing.
    pub async fn status(&self) -> Result<Option<JobStatus>, StoreError> {
        self.store.get_status(&self.id).await
    }
}

impl fmt::Debug for StatusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
