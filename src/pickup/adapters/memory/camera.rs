//! Scripted camera adapter.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::pickup::{
    domain::PickupTaskId,
    ports::{EvidenceCamera, EvidenceCaptureError, EvidenceCaptureResult},
};

/// Camera that succeeds unless a failure has been scripted.
///
/// Scripted failures are consumed one per capture, in order. An optional
/// delay models a slow device so timeouts can be exercised deterministically.
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvidenceCamera {
    state: Arc<RwLock<ScriptedCameraState>>,
}

#[derive(Debug, Default)]
struct ScriptedCameraState {
    pending_failures: VecDeque<String>,
    delay: Option<Duration>,
    captured: Vec<PickupTaskId>,
}

fn lock_error(err: impl ToString) -> EvidenceCaptureError {
    EvidenceCaptureError::runtime(std::io::Error::other(err.to_string()))
}

impl ScriptedEvidenceCamera {
    /// Creates a camera that always succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next capture fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns camera runtime errors when lock acquisition fails.
    pub fn fail_next(&self, reason: impl Into<String>) -> EvidenceCaptureResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.pending_failures.push_back(reason.into());
        Ok(())
    }

    /// Delays every capture by `delay`.
    ///
    /// # Errors
    ///
    /// Returns camera runtime errors when lock acquisition fails.
    pub fn set_delay(&self, delay: Duration) -> EvidenceCaptureResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.delay = Some(delay);
        Ok(())
    }

    /// Returns the tasks for which a photo was successfully captured.
    ///
    /// # Errors
    ///
    /// Returns camera runtime errors when lock acquisition fails.
    pub fn captured(&self) -> EvidenceCaptureResult<Vec<PickupTaskId>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.captured.clone())
    }
}

#[async_trait]
impl EvidenceCamera for ScriptedEvidenceCamera {
    async fn capture(&self, task_id: PickupTaskId) -> EvidenceCaptureResult<()> {
        let delay = self.state.read().map_err(lock_error)?.delay;
        if let Some(duration) = delay {
            tokio::time::sleep(duration).await;
        }

        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(reason) = state.pending_failures.pop_front() {
            return Err(EvidenceCaptureError::Failed(reason));
        }
        state.captured.push(task_id);
        Ok(())
    }
}
