//! Repository port for dispatch selection persistence.

use crate::dispatch::domain::{DispatchSelection, SelectionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for selection repository operations.
pub type DispatchSelectionRepositoryResult<T> = Result<T, DispatchSelectionRepositoryError>;

/// Dispatch selection persistence contract.
#[async_trait]
pub trait DispatchSelectionRepository: Send + Sync {
    /// Stores a new selection.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchSelectionRepositoryError::DuplicateSelection`] when
    /// the selection ID already exists.
    async fn store(&self, selection: &DispatchSelection) -> DispatchSelectionRepositoryResult<()>;

    /// Persists changes to an existing selection.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchSelectionRepositoryError::NotFound`] when the
    /// selection does not exist.
    async fn update(&self, selection: &DispatchSelection)
    -> DispatchSelectionRepositoryResult<()>;

    /// Finds a selection by identifier.
    ///
    /// Returns `None` when the selection does not exist.
    async fn find_by_id(
        &self,
        id: SelectionId,
    ) -> DispatchSelectionRepositoryResult<Option<DispatchSelection>>;
}

/// Errors returned by selection repository implementations.
#[derive(Debug, Clone, Error)]
pub enum DispatchSelectionRepositoryError {
    /// A selection with the same identifier already exists.
    #[error("duplicate dispatch selection identifier: {0}")]
    DuplicateSelection(SelectionId),

    /// The selection was not found.
    #[error("dispatch selection not found: {0}")]
    NotFound(SelectionId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl DispatchSelectionRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
