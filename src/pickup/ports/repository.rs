//! Repository port for pickup task persistence and lookup.

use crate::pickup::domain::{DriverId, PickupTask, PickupTaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for pickup task repository operations.
pub type PickupTaskRepositoryResult<T> = Result<T, PickupTaskRepositoryError>;

/// Pickup task persistence contract.
#[async_trait]
pub trait PickupTaskRepository: Send + Sync {
    /// Stores a newly assigned task.
    ///
    /// # Errors
    ///
    /// Returns [`PickupTaskRepositoryError::DuplicateTask`] when the task ID
    /// already exists.
    async fn store(&self, task: &PickupTask) -> PickupTaskRepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`PickupTaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update(&self, task: &PickupTask) -> PickupTaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: PickupTaskId) -> PickupTaskRepositoryResult<Option<PickupTask>>;

    /// Returns every task assigned to the driver, oldest assignment first.
    async fn find_by_driver(&self, driver_id: &DriverId)
    -> PickupTaskRepositoryResult<Vec<PickupTask>>;
}

/// Errors returned by pickup task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PickupTaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate pickup task identifier: {0}")]
    DuplicateTask(PickupTaskId),

    /// The task was not found.
    #[error("pickup task not found: {0}")]
    NotFound(PickupTaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PickupTaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
