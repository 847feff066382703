//! Service layer for dispatch selections.

use crate::{
    config::EngineConfig,
    dispatch::{
        domain::{
            Admission, DispatchDomainError, DispatchRequested, DispatchSelection, FarmId,
            LoadEstimate, SelectionId, Truck,
        },
        ports::{
            DispatchNotifier, DispatchNotifierError, DispatchSelectionRepository,
            DispatchSelectionRepositoryError,
        },
    },
    error::ErrorKind,
    events::{emit, ports::EventPublisher},
    instance_lock::InstanceLocks,
};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Service-level errors for dispatch operations.
#[derive(Debug, Error)]
pub enum DispatchServiceError {
    /// Domain validation, an admission rule or a transition guard failed.
    #[error(transparent)]
    Domain(#[from] DispatchDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] DispatchSelectionRepositoryError),
    /// The driver notification failed; the selection is idle again.
    #[error(transparent)]
    Notifier(#[from] DispatchNotifierError),
    /// The driver notification did not finish in time; the selection is idle
    /// again.
    #[error("dispatch for selection {selection_id} timed out after {timeout:?}")]
    SendTimedOut {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Configured timeout.
        timeout: Duration,
    },
    /// No selection exists with the given identifier.
    #[error("dispatch selection {0} not found")]
    NotFound(SelectionId),
    /// The notification finished but its outcome could not be recorded.
    ///
    /// The selection may still be `dispatching`. When `delivered` is `true`
    /// the driver has the order and [`DispatchService::confirm_dispatch`]
    /// should be retried; otherwise [`DispatchService::fail_dispatch`].
    #[error("settling dispatch {selection_id} failed (delivered: {delivered}): {source}")]
    SettleFailed {
        /// Selection identifier.
        selection_id: SelectionId,
        /// Whether the driver notification succeeded.
        delivered: bool,
        /// Error raised while settling.
        source: Box<DispatchServiceError>,
    },
}

impl DispatchServiceError {
    /// Returns the taxonomy kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::SettleFailed { source, .. } => source.kind(),
            Self::Repository(DispatchSelectionRepositoryError::NotFound(_)) | Self::NotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Repository(_) => ErrorKind::Persistence,
            Self::Notifier(_) | Self::SendTimedOut { .. } => ErrorKind::ExternalFailure,
        }
    }
}

/// Result type for dispatch service operations.
pub type DispatchServiceResult<T> = Result<T, DispatchServiceError>;

/// Dispatch selection orchestration service.
///
/// Operations on the same selection are serialized. The driver notification
/// in [`DispatchService::dispatch`] runs without holding any lock; calls that
/// arrive during that window observe the `dispatching` state.
pub struct DispatchService<R, N, P, C>
where
    R: DispatchSelectionRepository,
    N: DispatchNotifier,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    notifier: Arc<N>,
    publisher: Arc<P>,
    clock: Arc<C>,
    config: EngineConfig,
    locks: InstanceLocks<SelectionId>,
}

impl<R, N, P, C> DispatchService<R, N, P, C>
where
    R: DispatchSelectionRepository,
    N: DispatchNotifier,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(repository: Arc<R>, notifier: Arc<N>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            repository,
            notifier,
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

    /// Creates a selection holding its first farm.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyFarmId`] for a blank farm or
    /// repository errors.
    pub async fn open_selection(
        &self,
        first_farm: &str,
    ) -> DispatchServiceResult<DispatchSelection> {
        let farm_id = FarmId::new(first_farm)?;
        let mut selection = DispatchSelection::new(&*self.clock);
        selection.select_farm(farm_id, &*self.clock)?;
        self.repository.store(&selection).await?;
        tracing::info!(selection_id = %selection.id(), "dispatch selection opened");
        Ok(selection)
    }

    /// Adds a farm to the selection.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyFarmId`],
    /// [`DispatchDomainError::SelectionLocked`] once dispatched,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn select_farm(
        &self,
        selection_id: SelectionId,
        farm: &str,
    ) -> DispatchServiceResult<DispatchSelection> {
        let farm_id = FarmId::new(farm)?;
        self.mutate(selection_id, |selection, clock| {
            selection.select_farm(farm_id, clock).map(drop)
        })
        .await
        .map(|(selection, ())| selection)
    }

    /// Removes a farm from the selection.
    ///
    /// Removing the last farm leaves the selection inert.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyFarmId`],
    /// [`DispatchDomainError::SelectionLocked`] once dispatched,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn deselect_farm(
        &self,
        selection_id: SelectionId,
        farm: &str,
    ) -> DispatchServiceResult<DispatchSelection> {
        let farm_id = FarmId::new(farm)?;
        self.mutate(selection_id, |selection, clock| {
            selection.deselect_farm(&farm_id, clock).map(drop)
        })
        .await
        .map(|(selection, ())| selection)
    }

    /// Chooses a truck from catalog data.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::EmptyTruckId`],
    /// [`DispatchDomainError::InvalidTruckCapacity`],
    /// [`DispatchDomainError::SelectionLocked`] once dispatched,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn assign_truck(
        &self,
        selection_id: SelectionId,
        truck_id: &str,
        capacity_kg: u64,
    ) -> DispatchServiceResult<DispatchSelection> {
        let truck = Truck::new(truck_id, capacity_kg)?;
        self.mutate(selection_id, |selection, clock| selection.assign_truck(truck, clock))
            .await
            .map(|(selection, ())| selection)
    }

    /// Clears the truck choice.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once dispatched,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn clear_truck(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<DispatchSelection> {
        self.mutate(selection_id, |selection, clock| selection.clear_truck(clock))
            .await
            .map(|(selection, ())| selection)
    }

    /// Replaces the externally computed load estimate.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::SelectionLocked`] once dispatched,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn update_load(
        &self,
        selection_id: SelectionId,
        load: LoadEstimate,
    ) -> DispatchServiceResult<DispatchSelection> {
        self.mutate(selection_id, |selection, clock| selection.update_load(load, clock))
            .await
            .map(|(selection, ())| selection)
    }

    /// Evaluates the admission rules for the stored selection.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn evaluate(&self, selection_id: SelectionId) -> DispatchServiceResult<Admission> {
        Ok(self.find_selection_or_error(selection_id).await?.evaluate())
    }

    /// Moves the selection to `dispatching` and emits `DispatchRequested`.
    ///
    /// The caller must follow up with [`Self::confirm_dispatch`] or
    /// [`Self::fail_dispatch`] once the external send settles.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::AlreadyInFlight`] unless idle,
    /// [`DispatchDomainError::PreconditionNotMet`] with every blocking reason,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn request_dispatch(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<DispatchRequested> {
        let (_, order) = self
            .mutate(selection_id, |selection, clock| selection.begin_dispatch(clock))
            .await?;
        tracing::info!(
            selection_id = %selection_id,
            truck_id = %order.truck_id,
            farm_count = order.farm_ids.len(),
            "dispatch requested"
        );
        emit(&*self.publisher, &*self.clock, order.clone()).await;
        Ok(order)
    }

    /// Confirms an in-flight dispatch and emits `DispatchConfirmed`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::InvalidStateTransition`] unless a
    /// dispatch is in flight, [`DispatchServiceError::NotFound`] or repository
    /// errors.
    pub async fn confirm_dispatch(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<DispatchSelection> {
        let (selection, confirmed) = self
            .mutate(selection_id, |selection, clock| selection.confirm_dispatch(clock))
            .await?;
        tracing::info!(selection_id = %selection_id, "dispatch confirmed");
        emit(&*self.publisher, &*self.clock, confirmed).await;
        Ok(selection)
    }

    /// Returns an in-flight dispatch to `idle` and emits `DispatchFailed`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::InvalidStateTransition`] unless a
    /// dispatch is in flight, [`DispatchServiceError::NotFound`] or repository
    /// errors.
    pub async fn fail_dispatch(
        &self,
        selection_id: SelectionId,
        reason: &str,
    ) -> DispatchServiceResult<DispatchSelection> {
        let (selection, failed) = self
            .mutate(selection_id, |selection, clock| selection.revert_dispatch(reason, clock))
            .await?;
        tracing::warn!(
            selection_id = %selection_id,
            reason,
            "dispatch failed, selection idle again"
        );
        emit(&*self.publisher, &*self.clock, failed).await;
        Ok(selection)
    }

    /// Requests a dispatch, notifies the driver and settles the outcome.
    ///
    /// On success the selection is `dispatched`. On notifier failure or
    /// timeout it is returned to `idle` and the error is retriable.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::request_dispatch`],
    /// [`DispatchServiceError::Notifier`] or
    /// [`DispatchServiceError::SendTimedOut`] after reverting the selection,
    /// or [`DispatchServiceError::SettleFailed`] carrying the notification
    /// outcome when the selection could not be confirmed or reverted.
    pub async fn dispatch(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<DispatchSelection> {
        let order = self.request_dispatch(selection_id).await?;

        let timeout = self.config.dispatch_send_timeout();
        match tokio::time::timeout(timeout, self.notifier.send(&order)).await {
            Ok(Ok(())) => self
                .confirm_dispatch(selection_id)
                .await
                .map_err(|err| settle_failed(selection_id, true, err)),
            Ok(Err(err)) => {
                self.fail_dispatch(selection_id, &err.to_string())
                    .await
                    .map_err(|settle_err| settle_failed(selection_id, false, settle_err))?;
                Err(err.into())
            }
            Err(_) => {
                let reason = format!("driver notification timed out after {timeout:?}");
                self.fail_dispatch(selection_id, &reason)
                    .await
                    .map_err(|err| settle_failed(selection_id, false, err))?;
                Err(DispatchServiceError::SendTimedOut {
                    selection_id,
                    timeout,
                })
            }
        }
    }

    /// Clears farms, truck and load, leaving an inert selection.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchDomainError::CannotDiscardInFlight`] while a dispatch
    /// is in flight, [`DispatchDomainError::SelectionLocked`] once dispatched,
    /// [`DispatchServiceError::NotFound`] or repository errors.
    pub async fn discard(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<DispatchSelection> {
        let (selection, ()) = self
            .mutate(selection_id, |selection, clock| selection.discard(clock))
            .await?;
        tracing::info!(selection_id = %selection_id, "dispatch selection discarded");
        Ok(selection)
    }

    /// Finds a selection by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors when lookup fails.
    pub async fn find_by_id(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<Option<DispatchSelection>> {
        Ok(self.repository.find_by_id(selection_id).await?)
    }

    async fn find_selection_or_error(
        &self,
        selection_id: SelectionId,
    ) -> DispatchServiceResult<DispatchSelection> {
        self.repository
            .find_by_id(selection_id)
            .await?
            .ok_or(DispatchServiceError::NotFound(selection_id))
    }

    /// Runs `apply` against the stored selection under its lock and persists
    /// the result. Nothing is persisted when `apply` fails.
    async fn mutate<T>(
        &self,
        selection_id: SelectionId,
        apply: impl FnOnce(&mut DispatchSelection, &C) -> Result<T, DispatchDomainError> + Send,
    ) -> DispatchServiceResult<(DispatchSelection, T)> {
        let _guard = self.locks.acquire(&selection_id).await;
        let mut selection = self.find_selection_or_error(selection_id).await?;
        let output = apply(&mut selection, &*self.clock).inspect_err(|err| {
            tracing::debug!(
                selection_id = %selection_id,
                kind = %err.kind(),
                error = %err,
                "dispatch operation rejected"
            );
        })?;
        self.repository.update(&selection).await?;
        Ok((selection, output))
    }
}

fn settle_failed(
    selection_id: SelectionId,
    delivered: bool,
    source: DispatchServiceError,
) -> DispatchServiceError {
    tracing::error!(
        selection_id = %selection_id,
        delivered,
        error = %source,
        "dispatch outcome could not be recorded"
    );
    DispatchServiceError::SettleFailed {
        selection_id,
        delivered,
        source: Box::new(source),
    }
}
