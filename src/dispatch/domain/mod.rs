//! Domain model for dispatch selections and admission.

mod admission;
mod error;
mod events;
mod ids;
mod selection;
mod truck;

pub use admission::{Admission, BlockingReason, BlockingReasons, evaluate};
pub use error::DispatchDomainError;
pub use events::{DispatchConfirmed, DispatchFailed, DispatchRequested};
pub use ids::{FarmId, SelectionId, TruckId};
pub use selection::{DispatchSelection, DispatchState};
pub use truck::{Kilograms, LoadEstimate, Truck};
