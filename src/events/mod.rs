//! Events reported upward to downstream logging and sync collaborators.
//!
//! Payloads are owned by the component that produces them; this module wraps
//! them in a single [`DomainEvent`] stream and defines the publishing port.

pub mod adapters;
mod domain;
pub mod ports;

pub use domain::{DomainEvent, EventEnvelope};

use mockable::Clock;
use ports::EventPublisher;

/// Publishes `event` after the owning entity has been persisted.
///
/// Publishing is best-effort: the entity change has already happened, so a
/// failure is logged and otherwise ignored.
pub(crate) async fn emit<P, C>(publisher: &P, clock: &C, event: impl Into<DomainEvent>)
where
    P: EventPublisher + ?Sized,
    C: Clock + Send + Sync + ?Sized,
{
    let envelope = EventEnvelope::new(event.into(), clock);
    if let Err(err) = publisher.publish(&envelope).await {
        tracing::warn!(
            event_id = %envelope.event_id(),
            event_type = envelope.event().event_type(),
            error = %err,
            "failed to publish domain event"
        );
    }
}
