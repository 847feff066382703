//! Shared world state for dispatch admission BDD scenarios.

use std::sync::Arc;

use fieldgate::{
    dispatch::{
        adapters::memory::{InMemoryDispatchSelectionRepository, RecordingDispatchNotifier},
        domain::{Admission, DispatchRequested, DispatchSelection, SelectionId},
        services::{DispatchService, DispatchServiceError},
    },
    events::adapters::InMemoryEventLog,
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestDispatchService = DispatchService<
    InMemoryDispatchSelectionRepository,
    RecordingDispatchNotifier,
    InMemoryEventLog,
    DefaultClock,
>;

/// Scenario world for dispatch admission behaviour tests.
pub struct DispatchWorld {
    pub service: TestDispatchService,
    pub notifier: Arc<RecordingDispatchNotifier>,
    pub selection: Option<DispatchSelection>,
    pub admission: Option<Admission>,
    pub dispatch_result: Option<Result<DispatchSelection, DispatchServiceError>>,
    pub request_result: Option<Result<DispatchRequested, DispatchServiceError>>,
}

impl DispatchWorld {
    /// Creates a world with no open selection.
    #[must_use]
    pub fn new() -> Self {
        let notifier = Arc::new(RecordingDispatchNotifier::new());
        let service = DispatchService::new(
            Arc::new(InMemoryDispatchSelectionRepository::new()),
            Arc::clone(&notifier),
            Arc::new(InMemoryEventLog::new()),
            Arc::new(DefaultClock),
        );

        Self {
            service,
            notifier,
            selection: None,
            admission: None,
            dispatch_result: None,
            request_result: None,
        }
    }

    /// Returns the identifier of the scenario's selection.
    ///
    /// # Errors
    ///
    /// Returns an error if no selection has been opened yet.
    pub fn selection_id(&self) -> Result<SelectionId, eyre::Report> {
        self.selection
            .as_ref()
            .map(DispatchSelection::id)
            .ok_or_else(|| eyre::eyre!("missing open selection in scenario world"))
    }
}

impl Default for DispatchWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
