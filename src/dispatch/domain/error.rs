//! Error types for dispatch domain validation and transitions.

use super::{BlockingReasons, DispatchState, SelectionId};
use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by dispatch domain constructors and transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DispatchDomainError {
    /// The farm identifier is empty after trimming.
    #[error("farm identifier must not be empty")]
    EmptyFarmId,

    /// The truck identifier is empty after trimming.
    #[error("truck identifier must not be empty")]
    EmptyTruckId,

    /// The truck capacity is not positive.
    #[error("invalid truck capacity {0} kg, expected a positive value")]
    InvalidTruckCapacity(u64),

    /// Farms, truck or load were edited after a dispatch was issued.
    #[error("dispatch selection {selection_id} cannot be changed while {state}")]
    SelectionLocked {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Current dispatch state.
        state: DispatchState,
    },

    /// The dispatch state does not permit the requested transition.
    #[error("invalid dispatch transition for selection {selection_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Current dispatch state.
        from: DispatchState,
        /// Requested dispatch state.
        to: DispatchState,
    },

    /// A dispatch was requested while admission rules block it.
    #[error("dispatch selection {selection_id} is blocked: {reasons}")]
    PreconditionNotMet {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Every blocking reason.
        reasons: BlockingReasons,
    },

    /// A dispatch was requested while one is in flight or already done.
    #[error("dispatch selection {selection_id} is already {state}")]
    AlreadyInFlight {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Current dispatch state.
        state: DispatchState,
    },

    /// A discard was attempted while a dispatch is in flight.
    #[error("dispatch selection {selection_id} cannot be discarded while a dispatch is in flight")]
    CannotDiscardInFlight {
        /// Selection identifier.
        selection_id: SelectionId,
    },
}

impl DispatchDomainError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyFarmId | Self::EmptyTruckId | Self::InvalidTruckCapacity(_) => {
                ErrorKind::InvalidInput
            }
            Self::SelectionLocked { .. } | Self::InvalidStateTransition { .. } => {
                ErrorKind::InvalidTransition
            }
            Self::PreconditionNotMet { .. } => ErrorKind::PreconditionNotMet,
            Self::AlreadyInFlight { .. } => ErrorKind::AlreadyInFlight,
            Self::CannotDiscardInFlight { .. } => ErrorKind::CannotDiscardInFlight,
        }
    }
}
