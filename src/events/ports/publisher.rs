//! Publisher port for the domain event stream.

use crate::events::EventEnvelope;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event publishing.
pub type EventPublishResult<T> = Result<T, EventPublishError>;

/// Downstream sink for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one event envelope.
    async fn publish(&self, envelope: &EventEnvelope) -> EventPublishResult<()>;
}

/// Errors returned by publisher adapters.
#[derive(Debug, Clone, Error)]
pub enum EventPublishError {
    /// The envelope could not be encoded.
    #[error("failed to encode event: {0}")]
    Encode(Arc<serde_json::Error>),

    /// Transport or runtime failure.
    #[error("event publisher runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventPublishError {
    /// Wraps a runtime error from the publisher adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}

impl From<serde_json::Error> for EventPublishError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(Arc::new(err))
    }
}
