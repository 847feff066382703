//! Application services for pickup lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{PickupLifecycleError, PickupLifecycleResult, PickupLifecycleService};
