//! Per-instance mutual exclusion for service operations.
//!
//! Every pickup task and dispatch selection is owned by a single logical
//! actor. Services acquire the instance's lock for the whole
//! load-mutate-store sequence so interleaved calls on the same instance queue
//! instead of overwriting each other. Different instances never contend.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of async exclusive locks keyed by entity identifier.
#[derive(Debug)]
pub struct InstanceLocks<K> {
    slots: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for InstanceLocks<K> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }
}

/// Guard held for the duration of one serialized operation.
#[derive(Debug)]
pub struct InstanceGuard {
    _guard: OwnedMutexGuard<()>,
}

impl<K> InstanceLocks<K>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other operation holds the lock for `key`.
    pub async fn acquire(&self, key: &K) -> InstanceGuard {
        let slot = self.slot(key);
        InstanceGuard {
            _guard: slot.lock_owned().await,
        }
    }

    /// Returns the number of instances with a live lock slot.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn slot(&self, key: &K) -> Arc<AsyncMutex<()>> {
        // The map only holds `()` locks, so a poisoned registry is still sound.
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.retain(|_, slot| Arc::strong_count(slot) > 1);
        Arc::clone(slots.entry(key.clone()).or_default())
    }
}
