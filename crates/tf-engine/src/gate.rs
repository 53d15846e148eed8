// Single-run gate: at most one formation run at a time, callers never wait

use std::sync::{Arc, LazyLock};
use tf_types::{internal_error, TfError, TfResult};
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

/// Admits one run at a time. A second caller is turned away with
/// [`TfError::Busy`] instead of queueing behind the first.
#[derive(Debug, Clone)]
pub struct RunGate {
    permits: Arc<Semaphore>,
}

static GLOBAL_GATE: LazyLock<RunGate> = LazyLock::new(RunGate::new);

/// Held for the lifetime of a run; dropping it reopens the gate.
#[derive(Debug)]
pub struct RunPermit {
    _permit: OwnedSemaphorePermit,
}

impl RunGate {
    /// A gate of its own, independent of every other gate.
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// The process-wide gate shared by every engine built with
    /// `FormationEngine::new`.
    pub fn global() -> Self {
        GLOBAL_GATE.clone()
    }

    /// True if both handles guard the same run slot.
    pub fn shares_with(&self, other: &RunGate) -> bool {
        Arc::ptr_eq(&self.permits, &other.permits)
    }

    pub fn try_enter(&self) -> TfResult<RunPermit> {
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => Ok(RunPermit { _permit: permit }),
            Err(TryAcquireError::NoPermits) => Err(TfError::Busy),
            Err(TryAcquireError::Closed) => Err(internal_error!("run gate closed")),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for RunGate {
    fn default() -> Self {
        Self::new()
    }
}
