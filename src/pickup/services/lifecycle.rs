//! Service layer for driver pickup tasks.

use crate::{
    config::EngineConfig,
    error::ErrorKind,
    events::{emit, ports::EventPublisher},
    instance_lock::InstanceLocks,
    pickup::{
        domain::{
            CrateCount, DriverId, MissingRequirements, PickupConfirmation, PickupDomainError,
            PickupTask, PickupTaskId, ReleaseCode,
        },
        ports::{
            EvidenceCamera, EvidenceCaptureError, PickupTaskRepository, PickupTaskRepositoryError,
        },
    },
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Service-level errors for pickup lifecycle operations.
#[derive(Debug, Error)]
pub enum PickupLifecycleError {
    /// Domain validation or a transition guard failed.
    #[error(transparent)]
    Domain(#[from] PickupDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PickupTaskRepositoryError),
    /// The camera reported failure.
    #[error(transparent)]
    Capture(#[from] EvidenceCaptureError),
    /// The camera did not answer in time.
    #[error("evidence capture for pickup task {task_id} timed out after {timeout:?}")]
    CaptureTimedOut {
        /// Task identifier.
        task_id: PickupTaskId,
        /// Configured timeout.
        timeout: Duration,
    },
    /// No task exists with the given identifier.
    #[error("pickup task {0} not found")]
    NotFound(PickupTaskId),
}

impl PickupLifecycleError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(PickupTaskRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(_) => ErrorKind::Persistence,
            Self::Capture(_) | Self::CaptureTimedOut { .. } => ErrorKind::ExternalFailure,
        }
    }
}

/// Result type for pickup lifecycle service operations.
pub type PickupLifecycleResult<T> = Result<T, PickupLifecycleError>;

/// Pickup task lifecycle orchestration service.
///
/// Operations on the same task are serialized; operations on different tasks
/// run independently.
pub struct PickupLifecycleService<R, K, P, C>
where
    R: PickupTaskRepository,
    K: EvidenceCamera,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    camera: Arc<K>,
    publisher: Arc<P>,
    clock: Arc<C>,
    config: EngineConfig,
    locks: InstanceLocks<PickupTaskId>,
}

impl<R, K, P, C> PickupLifecycleService<R, K, P, C>
where
    R: PickupTaskRepository,
    K: EvidenceCamera,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, camera: Arc<K>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            camera,
            publisher,
            clock,
            config: EngineConfig::default(),
            locks: InstanceLocks::new(),
        }
    }

    /// Replaces the engine configuration.
    #[must_use]
    pub const fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Assigns a new task to a driver. The task starts `en_route`.
    ///
    /// # Errors
    ///
    /// Returns [`PickupLifecycleError::Domain`] for a blank driver identifier
    /// or repository errors when persistence fails.
    pub async fn assign_task(&self, driver_id: &str) -> PickupLifecycleResult<PickupTask> {
        let driver = DriverId::new(driver_id)?;
        let task = PickupTask::assign(driver, &*self.clock);
        self.repository.store(&task).await?;
        tracing::info!(task_id = %task.id(), driver_id = %task.driver_id(), "pickup task assigned");
        Ok(task)
    }

    /// Marks the driver as arrived at the farm.
    ///
    /// # Errors
    ///
    /// Returns [`PickupLifecycleError::NotFound`] for an unknown task,
    /// [`PickupDomainError::InvalidTransition`] unless the task is
    /// `en_route`, or repository errors.
    pub async fn mark_arrived(&self, task_id: PickupTaskId) -> PickupLifecycleResult<PickupTask> {
        let (task, ()) = self
            .mutate(task_id, |task, clock| task.mark_arrived(clock))
            .await?;
        tracing::info!(task_id = %task_id, "driver arrived at farm");
        Ok(task)
    }

    /// Parses and records the crate count entered by the driver.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidCrateCount`] unless `raw` is a
    /// positive integer, [`PickupDomainError::InvalidTransition`] unless the
    /// task is `at_farm`, [`PickupLifecycleError::NotFound`] or repository
    /// errors.
    pub async fn record_crate_count(
        &self,
        task_id: PickupTaskId,
        raw: &str,
    ) -> PickupLifecycleResult<PickupTask> {
        let count = CrateCount::parse(raw).inspect_err(|err| {
            tracing::debug!(task_id = %task_id, error = %err, "crate count rejected");
        })?;
        let (task, ()) = self
            .mutate(task_id, |task, clock| task.record_crate_count(count, clock))
            .await?;
        tracing::info!(task_id = %task_id, crate_count = count.value(), "crate count recorded");
        Ok(task)
    }

    /// Records the release code obtained from farm staff.
    ///
    /// The code is not checked against any authority.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::EmptyReleaseCode`] for a blank code,
    /// [`PickupDomainError::InvalidTransition`] unless the task is `at_farm`,
    /// [`PickupLifecycleError::NotFound`] or repository errors.
    pub async fn record_release_code(
        &self,
        task_id: PickupTaskId,
        code: &str,
    ) -> PickupLifecycleResult<PickupTask> {
        let release_code = ReleaseCode::new(code).inspect_err(|err| {
            tracing::debug!(task_id = %task_id, error = %err, "release code rejected");
        })?;
        let (task, ()) = self
            .mutate(task_id, |task, clock| task.record_release_code(release_code, clock))
            .await?;
        tracing::info!(task_id = %task_id, "release code recorded");
        Ok(task)
    }

    /// Captures an evidence photo and records it on success.
    ///
    /// Repeating a successful capture is harmless. The task's lock is held
    /// while the camera runs, so other operations on this task wait for the
    /// capture or its timeout.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm` (the camera is not invoked), [`PickupLifecycleError::Capture`]
    /// or [`PickupLifecycleError::CaptureTimedOut`] when the camera fails, in
    /// which case the task is unchanged, [`PickupLifecycleError::NotFound`] or
    /// repository errors.
    pub async fn capture_evidence(
        &self,
        task_id: PickupTaskId,
    ) -> PickupLifecycleResult<PickupTask> {
        let _guard = self.locks.acquire(&task_id).await;
        let mut task = self.find_task_or_error(task_id).await?;
        task.ensure_accepts_evidence()
            .inspect_err(|err| log_rejection(task_id, err))?;

        let timeout = self.config.photo_capture_timeout();
        match tokio::time::timeout(timeout, self.camera.capture(task_id)).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                tracing::warn!(task_id = %task_id, error = %err, "evidence capture failed");
                return Err(err.into());
            }
            Err(_) => {
                tracing::warn!(task_id = %task_id, ?timeout, "evidence capture timed out");
                return Err(PickupLifecycleError::CaptureTimedOut { task_id, timeout });
            }
        }

        task.record_evidence_capture(&*self.clock)?;
        self.repository.update(&task).await?;
        tracing::info!(task_id = %task_id, "evidence photo recorded");
        Ok(task)
    }

    /// Completes the pickup and emits `TaskCompleted`.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::InvalidTransition`] unless the task is
    /// `at_farm`, [`PickupDomainError::PreconditionNotMet`] naming every
    /// missing requirement, [`PickupLifecycleError::NotFound`] or repository
    /// errors.
    pub async fn try_complete(
        &self,
        task_id: PickupTaskId,
    ) -> PickupLifecycleResult<PickupConfirmation> {
        let (_, confirmation) = self
            .mutate(task_id, |task, clock| task.try_complete(clock))
            .await?;
        tracing::info!(
            task_id = %task_id,
            crate_count = confirmation.crate_count.value(),
            "pickup completed"
        );
        emit(&*self.publisher, &*self.clock, confirmation.clone()).await;
        Ok(confirmation)
    }

    /// Returns the completion requirements the task still lacks.
    ///
    /// # Errors
    ///
    /// Returns [`PickupLifecycleError::NotFound`] for an unknown task or
    /// repository errors.
    pub async fn missing_requirements(
        &self,
        task_id: PickupTaskId,
    ) -> PickupLifecycleResult<MissingRequirements> {
        Ok(self.find_task_or_error(task_id).await?.missing_requirements())
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors when lookup fails.
    pub async fn find_by_id(
        &self,
        task_id: PickupTaskId,
    ) -> PickupLifecycleResult<Option<PickupTask>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Returns every task assigned to a driver.
    ///
    /// # Errors
    ///
    /// Returns [`PickupDomainError::EmptyDriverId`] for a blank identifier or
    /// repository errors when lookup fails.
    pub async fn find_by_driver(&self, driver_id: &str) -> PickupLifecycleResult<Vec<PickupTask>> {
        let driver = DriverId::new(driver_id)?;
        Ok(self.repository.find_by_driver(&driver).await?)
    }

    async fn find_task_or_error(
        &self,
        task_id: PickupTaskId,
    ) -> PickupLifecycleResult<PickupTask> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(PickupLifecycleError::NotFound(task_id))
    }

    /// Runs `apply` against the stored task under the task's lock and
    /// persists the result. Nothing is persisted when `apply` fails.
    async fn mutate<T>(
        &self,
        task_id: PickupTaskId,
        apply: impl FnOnce(&mut PickupTask, &C) -> Result<T, PickupDomainError> + Send,
    ) -> PickupLifecycleResult<(PickupTask, T)> {
        let _guard = self.locks.acquire(&task_id).await;
        let mut task = self.find_task_or_error(task_id).await?;
        let output = apply(&mut task, &*self.clock).inspect_err(|err| log_rejection(task_id, err))?;
        self.repository.update(&task).await?;
        Ok((task, output))
    }
}

fn log_rejection(task_id: PickupTaskId, err: &PickupDomainError) {
    tracing::debug!(
        task_id = %task_id,
        kind = %err.kind(),
        error = %err,
        "pickup operation rejected"
    );
}
