//! In-memory event log for tests and local flows.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::events::{
    DomainEvent, EventEnvelope,
    ports::{EventPublishError, EventPublishResult, EventPublisher},
};

/// Thread-safe append-only event log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEventLog {
    entries: Arc<RwLock<Vec<EventEnvelope>>>,
}

fn lock_error(err: impl ToString) -> EventPublishError {
    EventPublishError::runtime(std::io::Error::other(err.to_string()))
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every published envelope in publication order.
    ///
    /// # Errors
    ///
    /// Returns publisher runtime errors when lock acquisition fails.
    pub fn envelopes(&self) -> EventPublishResult<Vec<EventEnvelope>> {
        let entries = self.entries.read().map_err(lock_error)?;
        Ok(entries.clone())
    }

    /// Returns every published event in publication order.
    ///
    /// # Errors
    ///
    /// Returns publisher runtime errors when lock acquisition fails.
    pub fn events(&self) -> EventPublishResult<Vec<DomainEvent>> {
        Ok(self
            .envelopes()?
            .into_iter()
            .map(EventEnvelope::into_event)
            .collect())
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventLog {
    async fn publish(&self, envelope: &EventEnvelope) -> EventPublishResult<()> {
        let mut entries = self.entries.write().map_err(lock_error)?;
        entries.push(envelope.clone());
        Ok(())
    }
}
