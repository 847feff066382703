//! Error types for pickup domain validation and transitions.

use super::{MissingRequirements, PickupAction, PickupState, PickupTaskId};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by pickup domain constructors and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PickupDomainError {
    /// The action is not permitted from the task's current state.
    #[error("cannot {action} for pickup task {task_id} while it is {state}")]
    InvalidTransition {
        /// Task identifier.
        task_id: PickupTaskId,
        /// State the task was in when the action was attempted.
        state: PickupState,
        /// Rejected action.
        action: PickupAction,
    },

    /// The crate count is not a positive integer.
    #[error("invalid crate count '{0}', expected a positive integer")]
    InvalidCrateCount(String),

    /// The release code is empty after trimming.
    #[error("release code must not be empty")]
    EmptyReleaseCode,

    /// The driver identifier is empty after trimming.
    #[error("driver identifier must not be empty")]
    EmptyDriverId,

    /// Completion was attempted before all evidence was recorded.
    #[error("pickup task {task_id} cannot be completed, missing: {missing}")]
    PreconditionNotMet {
        /// Task identifier.
        task_id: PickupTaskId,
        /// Every unmet requirement.
        missing: MissingRequirements,
    },
}

impl PickupDomainError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::InvalidCrateCount(_) | Self::EmptyReleaseCode | Self::EmptyDriverId => {
                ErrorKind::InvalidInput
            }
            Self::PreconditionNotMet { .. } => ErrorKind::PreconditionNotMet,
        }
    }
}
