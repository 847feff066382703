//! Port contracts for pickup task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by pickup services.

pub mod camera;
pub mod repository;

pub use camera::{EvidenceCamera, EvidenceCaptureError, EvidenceCaptureResult};
pub use repository::{PickupTaskRepository, PickupTaskRepositoryError, PickupTaskRepositoryResult};
