//! In-memory adapters for dispatch tests and local flows.

mod notifier;
mod selection;

pub use notifier::RecordingDispatchNotifier;
pub use selection::InMemoryDispatchSelectionRepository;
