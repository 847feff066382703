//! Domain model for pickup task lifecycle management.
//!
//! The pickup domain owns the ordering and completeness rules for a single
//! driver task and keeps every infrastructure concern outside of the domain
//! boundary.

mod error;
mod evidence;
mod ids;
mod task;

pub use error::PickupDomainError;
pub use evidence::{CompletionRequirement, CrateCount, MissingRequirements, ReleaseCode};
pub use ids::{DriverId, PickupTaskId};
pub use task::{PickupAction, PickupConfirmation, PickupState, PickupTask};
