//! In-memory repository for pickup tasks.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::pickup::{
    domain::{DriverId, PickupTask, PickupTaskId},
    ports::{PickupTaskRepository, PickupTaskRepositoryError, PickupTaskRepositoryResult},
};

/// Thread-safe in-memory pickup task repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPickupTaskRepository {
    state: Arc<RwLock<InMemoryPickupState>>,
}

#[derive(Debug, Default)]
struct InMemoryPickupState {
    tasks: HashMap<PickupTaskId, PickupTask>,
    driver_index: HashMap<DriverId, Vec<PickupTaskId>>,
}

impl InMemoryPickupTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> PickupTaskRepositoryError {
    PickupTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl PickupTaskRepository for InMemoryPickupTaskRepository {
    async fn store(&self, task: &PickupTask) -> PickupTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(PickupTaskRepositoryError::DuplicateTask(task.id()));
        }
        state
            .driver_index
            .entry(task.driver_id().clone())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &PickupTask) -> PickupTaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        let slot = state
            .tasks
            .get_mut(&task.id())
            .ok_or(PickupTaskRepositoryError::NotFound(task.id()))?;
        // The owning driver never changes after assignment.
        *slot = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: PickupTaskId) -> PickupTaskRepositoryResult<Option<PickupTask>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn find_by_driver(
        &self,
        driver_id: &DriverId,
    ) -> PickupTaskRepositoryResult<Vec<PickupTask>> {
        let state = self.state.read().map_err(lock_error)?;
        let tasks = state
            .driver_index
            .get(driver_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }
}
