//! Shared world state for pickup completion BDD scenarios.

use std::sync::Arc;

use fieldgate::{
    events::adapters::InMemoryEventLog,
    pickup::{
        adapters::memory::{InMemoryPickupTaskRepository, ScriptedEvidenceCamera},
        domain::{PickupConfirmation, PickupTask, PickupTaskId},
        services::{PickupLifecycleError, PickupLifecycleService},
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestPickupService = PickupLifecycleService<
    InMemoryPickupTaskRepository,
    ScriptedEvidenceCamera,
    InMemoryEventLog,
    DefaultClock,
>;

/// Scenario world for pickup completion behaviour tests.
pub struct PickupWorld {
    pub service: TestPickupService,
    pub camera: Arc<ScriptedEvidenceCamera>,
    pub events: Arc<InMemoryEventLog>,
    pub task: Option<PickupTask>,
    pub completion_result: Option<Result<PickupConfirmation, PickupLifecycleError>>,
    pub capture_result: Option<Result<PickupTask, PickupLifecycleError>>,
}

impl PickupWorld {
    /// Creates a world with no assigned task.
    #[must_use]
    pub fn new() -> Self {
        let camera = Arc::new(ScriptedEvidenceCamera::new());
        let events = Arc::new(InMemoryEventLog::new());
        let service = PickupLifecycleService::new(
            Arc::new(InMemoryPickupTaskRepository::new()),
            Arc::clone(&camera),
            Arc::clone(&events),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            camera,
            events,
            task: None,
            completion_result: None,
            capture_result: None,
        }
    }

    /// Returns the identifier of the scenario's task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been assigned yet.
    pub fn task_id(&self) -> Result<PickupTaskId, eyre::Report> {
        self.task
            .as_ref()
            .map(PickupTask::id)
            .ok_or_else(|| eyre::eyre!("missing assigned task in scenario world"))
    }
}

impl Default for PickupWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> PickupWorld {
    PickupWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
