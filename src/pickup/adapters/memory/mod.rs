//! In-memory adapters for pickup lifecycle tests and local flows.

mod camera;
mod task;

pub use camera::ScriptedEvidenceCamera;
pub use task::InMemoryPickupTaskRepository;
