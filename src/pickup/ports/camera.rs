//! Photo-capture port used to collect pickup evidence.

use crate::pickup::domain::PickupTaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for evidence capture operations.
pub type EvidenceCaptureResult<T> = Result<T, EvidenceCaptureError>;

/// Device capability that captures an evidence photo.
///
/// The photo itself is opaque to the lifecycle; only success or failure is
/// observed.
#[async_trait]
pub trait EvidenceCamera: Send + Sync {
    /// Captures a photo for the given task.
    async fn capture(&self, task_id: PickupTaskId) -> EvidenceCaptureResult<()>;
}

/// Errors returned by camera adapters.
#[derive(Debug, Clone, Error)]
pub enum EvidenceCaptureError {
    /// The capture was attempted but did not produce a usable photo.
    #[error("evidence capture failed: {0}")]
    Failed(String),

    /// Device or runtime failure.
    #[error("camera runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl EvidenceCaptureError {
    /// Wraps a runtime error from the camera adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
