//! Recording notifier adapter.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::dispatch::{
    domain::DispatchRequested,
    ports::{DispatchNotifier, DispatchNotifierError, DispatchNotifierResult},
};

/// Notifier that records delivered orders instead of contacting drivers.
///
/// Scripted failures are consumed one per send, in order. An optional delay
/// models a slow transport so the in-flight window can be observed.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatchNotifier {
    state: Arc<RwLock<RecordingNotifierState>>,
}

#[derive(Debug, Default)]
struct RecordingNotifierState {
    pending_failures: VecDeque<String>,
    delay: Option<Duration>,
    delivered: Vec<DispatchRequested>,
}

fn lock_error(err: impl ToString) -> DispatchNotifierError {
    DispatchNotifierError::runtime(std::io::Error::other(err.to_string()))
}

impl RecordingDispatchNotifier {
    /// Creates a notifier that always delivers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next send fail with `reason`.
    ///
    /// # Errors
    ///
    /// Returns notifier runtime errors when lock acquisition fails.
    pub fn fail_next(&self, reason: impl Into<String>) -> DispatchNotifierResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.pending_failures.push_back(reason.into());
        Ok(())
    }

    /// Delays every send by `delay`.
    ///
    /// # Errors
    ///
    /// Returns notifier runtime errors when lock acquisition fails.
    pub fn set_delay(&self, delay: Duration) -> DispatchNotifierResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.delay = Some(delay);
        Ok(())
    }

    /// Returns every delivered order in delivery order.
    ///
    /// # Errors
    ///
    /// Returns notifier runtime errors when lock acquisition fails.
    pub fn delivered(&self) -> DispatchNotifierResult<Vec<DispatchRequested>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.delivered.clone())
    }
}

#[async_trait]
impl DispatchNotifier for RecordingDispatchNotifier {
    async fn send(&self, order: &DispatchRequested) -> DispatchNotifierResult<()> {
        let delay = self.state.read().map_err(lock_error)?.delay;
        if let Some(duration) = delay {
            tokio::time::sleep(duration).await;
        }

        let mut state = self.state.write().map_err(lock_error)?;
        if let Some(reason) = state.pending_failures.pop_front() {
            return Err(DispatchNotifierError::Undelivered {
                selection_id: order.selection_id,
                reason,
            });
        }
        state.delivered.push(order.clone());
        Ok(())
    }
}
