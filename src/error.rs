//! Error taxonomy shared by the pickup and dispatch components.
//!
//! Each component keeps its own `thiserror` enums; this module maps them onto
//! a small set of kinds so callers can decide how to react (render a blocking
//! reason, retry, report a logic error) without matching on every variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The operation is not permitted from the entity's current state.
    InvalidTransition,
    /// A supplied value is malformed or missing.
    InvalidInput,
    /// Required fields or selections are incomplete.
    PreconditionNotMet,
    /// A dispatch request is already in flight or finished.
    AlreadyInFlight,
    /// A discard was attempted while a dispatch is in flight.
    CannotDiscardInFlight,
    /// An external collaborator reported failure or timed out.
    ExternalFailure,
    /// The addressed entity does not exist.
    NotFound,
    /// The persistence port failed.
    Persistence,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidTransition => "invalid_transition",
            Self::InvalidInput => "invalid_input",
            Self::PreconditionNotMet => "precondition_not_met",
            Self::AlreadyInFlight => "already_in_flight",
            Self::CannotDiscardInFlight => "cannot_discard_in_flight",
            Self::ExternalFailure => "external_failure",
            Self::NotFound => "not_found",
            Self::Persistence => "persistence",
        }
    }

    /// Returns whether retrying the same operation unchanged may succeed.
    ///
    /// Collaborator and persistence failures leave the owning entity intact,
    /// so the caller may retry them. Every other kind needs different input or
    /// state first.
    #[must_use]
    pub const fn is_retriable(self) -> bool {
        matches!(self, Self::ExternalFailure | Self::Persistence)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
