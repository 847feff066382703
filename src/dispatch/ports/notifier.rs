//! Notifier port that tells the assigned truck/driver about a dispatch.

use crate::dispatch::domain::{DispatchRequested, SelectionId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for notifier operations.
pub type DispatchNotifierResult<T> = Result<T, DispatchNotifierError>;

/// External send issued while a selection is `dispatching`.
///
/// This is the only dispatch operation that may take observable wall-clock
/// time; services await it without holding the selection's lock.
#[async_trait]
pub trait DispatchNotifier: Send + Sync {
    /// Delivers the dispatch order.
    async fn send(&self, order: &DispatchRequested) -> DispatchNotifierResult<()>;
}

/// Errors returned by notifier adapters.
#[derive(Debug, Clone, Error)]
pub enum DispatchNotifierError {
    /// The recipient rejected or could not receive the order.
    #[error("dispatch {selection_id} was not delivered: {reason}")]
    Undelivered {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Reason reported by the transport.
        reason: String,
    },

    /// Transport or runtime failure.
    #[error("dispatch notifier runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl DispatchNotifierError {
    /// Wraps a runtime error from the notifier adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
