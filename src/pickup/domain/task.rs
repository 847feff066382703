//! Pickup task aggregate root and its forward-only state machine.

use super::{
    CompletionRequirement, CrateCount, DriverId, MissingRequirements, PickupDomainError,
    PickupTaskId, ReleaseCode,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pickup task lifecycle state.
///
/// States are ordered; a task's state never decreases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupState {
    /// The driver is travelling to the farm.
    EnRoute,
    /// The driver is at the farm collecting evidence.
    AtFarm,
    /// Cargo collection has been confirmed.
    Completed,
}

impl PickupState {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnRoute => "en_route",
            Self::AtFarm => "at_farm",
            Self::Completed => "completed",
        }
    }

    /// Returns whether transition to `target` is allowed.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::EnRoute, Self::AtFarm) | (Self::AtFarm, Self::Completed)
        )
    }

    /// Returns whether the state is terminal.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for PickupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Driver action applied to a pickup task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupAction {
    /// Report arrival at the farm.
    MarkArrived,
    /// Record the number of crates loaded.
    RecordCrateCount,
    /// Record the farm-issued release code.
    RecordReleaseCode,
    /// Record a captured evidence photo.
    RecordEvidence,
    /// Confirm the pickup.
    Complete,
}

impl PickupAction {
    /// Returns a human-readable description of the action.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MarkArrived => "mark arrival",
            Self::RecordCrateCount => "record a crate count",
            Self::RecordReleaseCode => "record a release code",
            Self::RecordEvidence => "record evidence",
            Self::Complete => "complete the pickup",
        }
    }
}

impl fmt::Display for PickupAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Confirmation produced by a successful completion.
///
/// This is also the payload of the `TaskCompleted` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupConfirmation {
    /// Completed task.
    pub task_id: PickupTaskId,
    /// Final crate count.
    pub crate_count: CrateCount,
    /// Completion timestamp.
    pub completed_at: DateTime<Utc>,
}

/// Pickup task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupTask {
    id: PickupTaskId,
    driver_id: DriverId,
    state: PickupState,
    crate_count: Option<CrateCount>,
    release_code: Option<ReleaseCode>,
    has_evidence_photo: bool,
    assigned_at: DateTime<Utc>,
    arrived_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
}

impl PickupTask {
    /// Creates a task assigned to `driver_id`, starting `en_route`.
    #[must_use]
    pub fn assign(driver_id: DriverId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: PickupTaskId::new(),
            driver_id,
            state: PickupState::EnRoute,
            crate_count: None,
            release_code: None,
            has_evidence_photo: false,
            assigned_at: timestamp,
            arrived_at: None,
            completed_at: None,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> PickupTaskId {
        self.id
    }

    /// Returns the owning driver.
    #[must_use]
    pub const fn driver_id(&self) -> &DriverId {
        &self.driver_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PickupState {
        self.state
    }

    /// Returns the recorded crate count, if any.
    #[must_use]
    pub const fn crate_count(&self) -> Option<CrateCount> {
        self.crate_count
    }

    /// Returns the recorded release code, if any.
    #[must_use]
    pub const fn release_code(&self) -> Option<&ReleaseCode> {
        self.release_code.as_ref()
    }

    /// Returns whether an evidence photo has been captured.
    #[must_use]
    pub const fn has_evidence_photo(&self) -> bool {
        self.has_evidence_photo
    }

    /// Returns the assignment timestamp.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns the arrival timestamp, if the driver has arrived.
    #[must_use]
    pub const fn arrived_at(&self) -> Option<DateTime<Utc>> {
        self.arrived_at
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Marks the driver as arrived at the farm.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `en_route`. Repeated arrivals are rejected rather than ignored.
    pub fn mark_arrived(&mut self, clock: &impl Clock) -> Result<(), PickupDomainError> {
        if !self.state.can_transition_to(PickupState::AtFarm) {
            return Err(self.invalid(PickupAction::MarkArrived));
        }
        let timestamp = clock.utc();
        self.state = PickupState::AtFarm;
        self.arrived_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Records the crate count, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm`.
    pub fn record_crate_count(
        &mut self,
        count: CrateCount,
        clock: &impl Clock,
    ) -> Result<(), PickupDomainError> {
        self.ensure_at_farm(PickupAction::RecordCrateCount)?;
        self.crate_count = Some(count);
        self.touch(clock);
        Ok(())
    }

    /// Records the release code, replacing any earlier value.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm`.
    pub fn record_release_code(
        &mut self,
        code: ReleaseCode,
        clock: &impl Clock,
    ) -> Result<(), PickupDomainError> {
        self.ensure_at_farm(PickupAction::RecordReleaseCode)?;
        self.release_code = Some(code);
        self.touch(clock);
        Ok(())
    }

    /// Validates that evidence may be captured for this task.
    ///
    /// Services call this before invoking the camera so a photo is never
    /// taken for a task that could not accept it.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm`.
    pub fn ensure_accepts_evidence(&self) -> Result<(), PickupDomainError> {
        self.ensure_at_farm(PickupAction::RecordEvidence)
    }

    /// Records a successful evidence capture. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm`.
    pub fn record_evidence_capture(&mut self, clock: &impl Clock) -> Result<(), PickupDomainError> {
        self.ensure_accepts_evidence()?;
        if !self.has_evidence_photo {
            self.has_evidence_photo = true;
            self.touch(clock);
        }
        Ok(())
    }

    /// Returns the completion requirements that are still unmet.
    #[must_use]
    pub fn missing_requirements(&self) -> MissingRequirements {
        MissingRequirements::collect(|requirement| match requirement {
            CompletionRequirement::CrateCount => self.crate_count.is_none(),
            CompletionRequirement::ReleaseCode => self.release_code.is_none(),
            CompletionRequirement::EvidencePhoto => !self.has_evidence_photo,
        })
    }

    /// Completes the pickup once every requirement is met.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm`, or [`PickupDomainError::PreconditionNotMet`] naming every
    /// missing requirement. The task is unchanged on error.
    pub fn try_complete(
        &mut self,
        clock: &impl Clock,
    ) -> Result<PickupConfirmation, PickupDomainError> {
        self.ensure_at_farm(PickupAction::Complete)?;
        let (Some(crate_count), Some(_), true) = (
            self.crate_count,
            self.release_code.as_ref(),
            self.has_evidence_photo,
        ) else {
            return Err(PickupDomainError::PreconditionNotMet {
                task_id: self.id,
                missing: self.missing_requirements(),
            });
        };

        let timestamp = clock.utc();
        self.state = PickupState::Completed;
        self.completed_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(PickupConfirmation {
            task_id: self.id,
            crate_count,
            completed_at: timestamp,
        })
    }

    fn ensure_at_farm(&self, action: PickupAction) -> Result<(), PickupDomainError> {
        if self.state == PickupState::AtFarm {
            return Ok(());
        }
        Err(self.invalid(action))
    }

    const fn invalid(&self, action: PickupAction) -> PickupDomainError {
        PickupDomainError::InvalidTransition {
            task_id: self.id,
            state: self.state,
            action,
        }
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
