//! In-memory repository for dispatch selections.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::dispatch::{
    domain::{DispatchSelection, SelectionId},
    ports::{
        DispatchSelectionRepository, DispatchSelectionRepositoryError,
        DispatchSelectionRepositoryResult,
    },
};

/// Thread-safe in-memory selection repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDispatchSelectionRepository {
    selections: Arc<RwLock<HashMap<SelectionId, DispatchSelection>>>,
}

impl InMemoryDispatchSelectionRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> DispatchSelectionRepositoryError {
    DispatchSelectionRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl DispatchSelectionRepository for InMemoryDispatchSelectionRepository {
    async fn store(&self, selection: &DispatchSelection) -> DispatchSelectionRepositoryResult<()> {
        let mut selections = self.selections.write().map_err(lock_error)?;
        if selections.contains_key(&selection.id()) {
            return Err(DispatchSelectionRepositoryError::DuplicateSelection(
                selection.id(),
            ));
        }
        selections.insert(selection.id(), selection.clone());
        Ok(())
    }

    async fn update(&self, selection: &DispatchSelection) -> DispatchSelectionRepositoryResult<()> {
        let mut selections = self.selections.write().map_err(lock_error)?;
        let slot = selections
            .get_mut(&selection.id())
            .ok_or(DispatchSelectionRepositoryError::NotFound(selection.id()))?;
        *slot = selection.clone();
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: SelectionId,
    ) -> DispatchSelectionRepositoryResult<Option<DispatchSelection>> {
        let selections = self.selections.read().map_err(lock_error)?;
        Ok(selections.get(&id).cloned())
    }
}
