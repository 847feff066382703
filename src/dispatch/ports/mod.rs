//! Port contracts for dispatch selections.

pub mod notifier;
pub mod repository;

pub use notifier::{DispatchNotifier, DispatchNotifierError, DispatchNotifierResult};
pub use repository::{
    DispatchSelectionRepository, DispatchSelectionRepositoryError,
    DispatchSelectionRepositoryResult,
};
