//! Dispatch admission rules.
//!
//! Every rule is evaluated independently and all failures are reported, so a
//! caller can render each blocking reason at once.

use super::{DispatchSelection, DispatchState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reason a selection cannot be dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingReason {
    /// No farm has been selected.
    NoFarmsSelected,
    /// No truck has been selected.
    NoTruckSelected,
    /// The load exceeds the selected truck's capacity.
    Overweight,
}

impl BlockingReason {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoFarmsSelected => "no_farms_selected",
            Self::NoTruckSelected => "no_truck_selected",
            Self::Overweight => "overweight",
        }
    }
}

impl fmt::Display for BlockingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered list of blocking reasons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockingReasons(Vec<BlockingReason>);

impl BlockingReasons {
    /// Returns `true` when nothing blocks the dispatch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when `reason` is present.
    #[must_use]
    pub fn contains(&self, reason: BlockingReason) -> bool {
        self.0.contains(&reason)
    }

    /// Returns the reasons as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[BlockingReason] {
        &self.0
    }
}

impl From<Vec<BlockingReason>> for BlockingReasons {
    fn from(reasons: Vec<BlockingReason>) -> Self {
        Self(reasons)
    }
}

impl fmt::Display for BlockingReasons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for reason in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            f.write_str(reason.as_str())?;
        }
        Ok(())
    }
}

/// Outcome of evaluating a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Admission {
    can_dispatch: bool,
    is_overweight: bool,
    blocking_reasons: BlockingReasons,
}

impl Admission {
    /// Returns whether a dispatch may be requested now.
    #[must_use]
    pub const fn can_dispatch(&self) -> bool {
        self.can_dispatch
    }

    /// Returns whether the load exceeds the selected truck's capacity.
    ///
    /// Always `false` when no truck is selected.
    #[must_use]
    pub const fn is_overweight(&self) -> bool {
        self.is_overweight
    }

    /// Returns every reason blocking the dispatch.
    #[must_use]
    pub const fn blocking_reasons(&self) -> &BlockingReasons {
        &self.blocking_reasons
    }

    /// Consumes the admission, returning the blocking reasons.
    #[must_use]
    pub fn into_blocking_reasons(self) -> BlockingReasons {
        self.blocking_reasons
    }
}

/// Evaluates whether `selection` may be dispatched.
///
/// Pure: identical selections always yield identical admissions. Reasons are
/// reported in the order no farms, no truck, overweight. An in-flight or
/// finished dispatch makes `can_dispatch` false without adding a reason.
///
/// # Examples
///
/// ```
/// use fieldgate::dispatch::domain::{
///     BlockingReason, DispatchSelection, FarmId, LoadEstimate, Truck, evaluate,
/// };
/// use mockable::DefaultClock;
///
/// let clock = DefaultClock;
/// let mut selection = DispatchSelection::new(&clock);
/// selection.select_farm(FarmId::new("farm-a").expect("valid id"), &clock).expect("idle");
/// let truck = Truck::new("truck-1", 1000).expect("valid truck");
/// selection.assign_truck(truck, &clock).expect("idle");
/// selection.update_load(LoadEstimate::new(1200, 35), &clock).expect("idle");
///
/// let admission = evaluate(&selection);
/// assert!(!admission.can_dispatch());
/// assert!(admission.is_overweight());
/// assert_eq!(admission.blocking_reasons().as_slice(), &[BlockingReason::Overweight]);
/// ```
#[must_use]
pub fn evaluate(selection: &DispatchSelection) -> Admission {
    let mut reasons = Vec::new();

    if selection.farm_ids().is_empty() {
        reasons.push(BlockingReason::NoFarmsSelected);
    }

    let is_overweight = match selection.truck() {
        Some(truck) => truck.is_exceeded_by(selection.load().total_weight),
        None => {
            reasons.push(BlockingReason::NoTruckSelected);
            false
        }
    };
    if is_overweight {
        reasons.push(BlockingReason::Overweight);
    }

    let can_dispatch = reasons.is_empty() && selection.dispatch_state() == DispatchState::Idle;
    Admission {
        can_dispatch,
        is_overweight,
        blocking_reasons: BlockingReasons(reasons),
    }
}
