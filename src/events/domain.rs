//! Event stream types.

use crate::{
    dispatch::domain::{DispatchConfirmed, DispatchFailed, DispatchRequested},
    pickup::domain::PickupConfirmation,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event emitted by the pickup or dispatch components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A pickup task was completed.
    TaskCompleted(PickupConfirmation),
    /// A dispatch request entered its in-flight window.
    DispatchRequested(DispatchRequested),
    /// The external send for a dispatch succeeded.
    DispatchConfirmed(DispatchConfirmed),
    /// The external send for a dispatch failed and the selection is idle again.
    DispatchFailed(DispatchFailed),
}

impl DomainEvent {
    /// Returns the event type tag.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::TaskCompleted(_) => "task_completed",
            Self::DispatchRequested(_) => "dispatch_requested",
            Self::DispatchConfirmed(_) => "dispatch_confirmed",
            Self::DispatchFailed(_) => "dispatch_failed",
        }
    }
}

impl From<PickupConfirmation> for DomainEvent {
    fn from(value: PickupConfirmation) -> Self {
        Self::TaskCompleted(value)
    }
}

impl From<DispatchRequested> for DomainEvent {
    fn from(value: DispatchRequested) -> Self {
        Self::DispatchRequested(value)
    }
}

impl From<DispatchConfirmed> for DomainEvent {
    fn from(value: DispatchConfirmed) -> Self {
        Self::DispatchConfirmed(value)
    }
}

impl From<DispatchFailed> for DomainEvent {
    fn from(value: DispatchFailed) -> Self {
        Self::DispatchFailed(value)
    }
}

/// Identified, timestamped wrapper around a [`DomainEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    event_id: Uuid,
    occurred_at: DateTime<Utc>,
    event: DomainEvent,
}

impl EventEnvelope {
    /// Wraps `event` with a fresh identifier and the clock's current time.
    #[must_use]
    pub fn new<C>(event: DomainEvent, clock: &C) -> Self
    where
        C: Clock + ?Sized,
    {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: clock.utc(),
            event,
        }
    }

    /// Returns the envelope identifier.
    #[must_use]
    pub const fn event_id(&self) -> Uuid {
        self.event_id
    }

    /// Returns when the event was emitted.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns the wrapped event.
    #[must_use]
    pub const fn event(&self) -> &DomainEvent {
        &self.event
    }

    /// Consumes the envelope, returning the wrapped event.
    #[must_use]
    pub fn into_event(self) -> DomainEvent {
        self.event
    }
}
