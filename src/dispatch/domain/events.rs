//! Event payloads emitted around a dispatch request.

use super::{FarmId, SelectionId, TruckId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dispatch entered its in-flight window.
///
/// This is also the order handed to the driver notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchRequested {
    /// Selection being dispatched.
    pub selection_id: SelectionId,
    /// Farms to visit, sorted.
    pub farm_ids: Vec<FarmId>,
    /// Assigned truck.
    pub truck_id: TruckId,
}

/// The driver notification succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfirmed {
    /// Dispatched selection.
    pub selection_id: SelectionId,
    /// Confirmation timestamp.
    pub confirmed_at: DateTime<Utc>,
}

/// The driver notification failed; the selection is idle again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchFailed {
    /// Selection whose dispatch failed.
    pub selection_id: SelectionId,
    /// Failure description from the notifier.
    pub reason: String,
}
