//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use fieldgate::{
    dispatch::{
        adapters::memory::{InMemoryDispatchSelectionRepository, RecordingDispatchNotifier},
        services::DispatchService,
    },
    events::adapters::InMemoryEventLog,
    pickup::{
        adapters::memory::{InMemoryPickupTaskRepository, ScriptedEvidenceCamera},
        services::PickupLifecycleService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Pickup service wired to in-memory adapters.
pub type PickupService = PickupLifecycleService<
    InMemoryPickupTaskRepository,
    ScriptedEvidenceCamera,
    InMemoryEventLog,
    DefaultClock,
>;

/// Dispatch service wired to in-memory adapters.
pub type SelectionService = DispatchService<
    InMemoryDispatchSelectionRepository,
    RecordingDispatchNotifier,
    InMemoryEventLog,
    DefaultClock,
>;

/// Both services sharing one event log, plus handles to their collaborators.
pub struct Engine {
    /// Pickup lifecycle service.
    pub pickup: PickupService,
    /// Dispatch service.
    pub dispatch: SelectionService,
    /// Camera used by the pickup service.
    pub camera: Arc<ScriptedEvidenceCamera>,
    /// Notifier used by the dispatch service.
    pub notifier: Arc<RecordingDispatchNotifier>,
    /// Event log shared by both services.
    pub events: Arc<InMemoryEventLog>,
}

/// Provides a fresh engine for each test.
#[fixture]
pub fn engine() -> Engine {
    let camera = Arc::new(ScriptedEvidenceCamera::new());
    let notifier = Arc::new(RecordingDispatchNotifier::new());
    let events = Arc::new(InMemoryEventLog::new());
    let clock = Arc::new(DefaultClock);

    let pickup = PickupLifecycleService::new(
        Arc::new(InMemoryPickupTaskRepository::new()),
        Arc::clone(&camera),
        Arc::clone(&events),
        Arc::clone(&clock),
    );
    let dispatch = DispatchService::new(
        Arc::new(InMemoryDispatchSelectionRepository::new()),
        Arc::clone(&notifier),
        Arc::clone(&events),
        clock,
    );

    Engine {
        pickup,
        dispatch,
        camera,
        notifier,
        events,
    }
}
