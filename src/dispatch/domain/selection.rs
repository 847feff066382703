//! Dispatch selection aggregate root.

use super::{
    Admission, DispatchConfirmed, DispatchDomainError, DispatchFailed, DispatchRequested, FarmId,
    LoadEstimate, SelectionId, Truck, evaluate,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Progress of a dispatch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchState {
    /// No dispatch has been issued.
    Idle,
    /// The driver notification is in flight.
    Dispatching,
    /// The driver has been notified; the selection is terminated.
    Dispatched,
}

impl DispatchState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dispatching => "dispatching",
            Self::Dispatched => "dispatched",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Idle, Self::Dispatching) | (Self::Dispatching, Self::Dispatched | Self::Idle)
        )
    }

    /// Returns whether the state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Dispatched)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logistics officer's in-progress choice of farms and truck for one trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSelection {
    id: SelectionId,
    farm_ids: BTreeSet<FarmId>,
    truck: Option<Truck>,
    load: LoadEstimate,
    dispatch_state: DispatchState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DispatchSelection {
    /// Creates an empty, idle selection.
    #[must_use]
    pub fn new(clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SelectionId::new(),
            farm_ids: BTreeSet::new(),
            truck: None,
            load: LoadEstimate::default(),
            dispatch_state: DispatchState::Idle,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the selection identifier.
    #[must_use]
    pub const fn id(&self) -> SelectionId {
        self.id
    }

    /// Returns the selected farms.
    #[must_use]
    pub const fn farm_ids(&self) -> &BTreeSet<FarmId> {
        &self.farm_ids
    }

    /// Returns the selected truck, if any.
    #[must_use]
    pub const fn truck(&self) -> Option<&Truck> {
        self.truck.as_ref()
    }

    /// Returns the current load estimate.
    #[must_use]
    pub const fn load(&self) -> LoadEstimate {
        self.load
    }

    /// Returns the dispatch state.
    #[must_use]
    pub const fn dispatch_state(&self) -> DispatchState {
        self.dispatch_state
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the selection is a pending decision for the operator.
    ///
    /// A selection without farms is inert.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !self.farm_ids.is_empty()
    }

    /// Evaluates the admission rules for the current selection.
    #[must_use]
    pub fn evaluate(&self) -> Admission {
        evaluate(self)
    }

    /// Adds a farm. Returns `false` if it was already selected.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once a dispatch has
    /// been issued.
    pub fn select_farm(
        &mut self,
        farm_id: FarmId,
        clock: &impl Clock,
    ) -> Result<bool, DispatchDomainError> {
        self.ensure_editable()?;
        let inserted = self.farm_ids.insert(farm_id);
        if inserted {
            self.touch(clock);
        }
        Ok(inserted)
    }

    /// Removes a farm. Returns `false` if it was not selected.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once a dispatch has
    /// been issued.
    pub fn deselect_farm(
        &mut self,
        farm_id: &FarmId,
        clock: &impl Clock,
    ) -> Result<bool, DispatchDomainError> {
        self.ensure_editable()?;
        let removed = self.farm_ids.remove(farm_id);
        if removed {
            self.touch(clock);
        }
        Ok(removed)
    }

    /// Chooses a truck, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once a dispatch has
    /// been issued.
    pub fn assign_truck(
        &mut self,
        truck: Truck,
        clock: &impl Clock,
    ) -> Result<(), DispatchDomainError> {
        self.ensure_editable()?;
        self.truck = Some(truck);
        self.touch(clock);
        Ok(())
    }

    /// Clears the truck choice.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once a dispatch has
    /// been issued.
    pub fn clear_truck(&mut self, clock: &impl Clock) -> Result<(), DispatchDomainError> {
        self.ensure_editable()?;
        self.truck = None;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the externally computed load estimate.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once a dispatch has
    /// been issued.
    pub fn update_load(
        &mut self,
        load: LoadEstimate,
        clock: &impl Clock,
    ) -> Result<(), DispatchDomainError> {
        self.ensure_editable()?;
        self.load = load;
        self.touch(clock);
        Ok(())
    }

    /// Issues the dispatch request, moving `idle` to `dispatching`.
    ///
    /// Returns the order to hand to the driver notifier.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::AlreadyInFlight`] unless the selection
    /// is idle, or [`DispatchDomainError::PreconditionNotMet`] carrying every
    /// blocking reason. The selection is unchanged on error.
    pub fn begin_dispatch(
        &mut self,
        clock: &impl Clock,
    ) -> Result<DispatchRequested, DispatchDomainError> {
        if self.dispatch_state != DispatchState::Idle {
            return Err(DispatchDomainError::AlreadyInFlight {
                selection_id: self.id,
                state: self.dispatch_state,
            });
        }

        let admission = self.evaluate();
        let Some(truck) = self.truck.as_ref().filter(|_| admission.can_dispatch()) else {
            return Err(DispatchDomainError::PreconditionNotMet {
                selection_id: self.id,
                reasons: admission.into_blocking_reasons(),
            });
        };

        let order = DispatchRequested {
            selection_id: self.id,
            farm_ids: self.farm_ids.iter().cloned().collect(),
            truck_id: truck.id().clone(),
        };
        self.transition_to(DispatchState::Dispatching, clock)?;
        Ok(order)
    }

    /// Confirms the in-flight dispatch, terminating the selection.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::InvalidStateTransition`] unless a
    /// dispatch is in flight.
    pub fn confirm_dispatch(
        &mut self,
        clock: &impl Clock,
    ) -> Result<DispatchConfirmed, DispatchDomainError> {
        self.transition_to(DispatchState::Dispatched, clock)?;
        Ok(DispatchConfirmed {
            selection_id: self.id,
            confirmed_at: self.updated_at,
        })
    }

    /// Reverts a failed in-flight dispatch back to `idle`.
    ///
    /// Farms, truck and load are kept so the operator can retry.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::InvalidStateTransition`] unless a
    /// dispatch is in flight.
    pub fn revert_dispatch(
        &mut self,
        reason: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<DispatchFailed, DispatchDomainError> {
        self.transition_to(DispatchState::Idle, clock)?;
        Ok(DispatchFailed {
            selection_id: self.id,
            reason: reason.into(),
        })
    }

    /// Clears farms, truck and load, returning the selection to its inert form.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::CannotDiscardInFlight`] while a dispatch
    /// is in flight and [`DispatchDomainError::SelectionLocked`] once it has
    /// been dispatched.
    pub fn discard(&mut self, clock: &impl Clock) -> Result<(), DispatchDomainError> {
        if self.dispatch_state == DispatchState::Dispatching {
            return Err(DispatchDomainError::CannotDiscardInFlight {
                selection_id: self.id,
            });
        }
        self.ensure_editable()?;
        self.farm_ids.clear();
        self.truck = None;
        self.load = LoadEstimate::default();
        self.touch(clock);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), DispatchDomainError> {
        if self.dispatch_state == DispatchState::Idle {
            return Ok(());
        }
        Err(DispatchDomainError::SelectionLocked {
            selection_id: self.id,
            state: self.dispatch_state,
        })
    }

    fn transition_to(
        &mut self,
        target: DispatchState,
        clock: &impl Clock,
    ) -> Result<(), DispatchDomainError> {
        if !self.dispatch_state.can_transition_to(target) {
            return Err(DispatchDomainError::InvalidStateTransition {
                selection_id: self.id,
                from: self.dispatch_state,
                to: target,
            });
        }
        self.dispatch_state = target;
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
