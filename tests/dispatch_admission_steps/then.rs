//! Then steps for dispatch admission BDD scenarios.

use super::world::{DispatchWorld, run_async};
use fieldgate::{
    dispatch::{
        domain::{Admission, DispatchDomainError},
        services::DispatchServiceError,
    },
    error::ErrorKind,
};
use rstest_bdd_macros::then;

fn admission(world: &DispatchWorld) -> Result<&Admission, eyre::Report> {
    world
        .admission
        .as_ref()
        .ok_or_else(|| eyre::eyre!("selection has not been evaluated"))
}

#[then("dispatch is allowed")]
fn dispatch_allowed(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = admission(world)?;
    eyre::ensure!(result.can_dispatch(), "expected admission, got {result:?}");
    Ok(())
}

#[then("dispatch is not allowed")]
fn dispatch_not_allowed(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = admission(world)?;
    eyre::ensure!(!result.can_dispatch(), "expected a block, got {result:?}");
    Ok(())
}

#[then("the selection is overweight")]
fn selection_overweight(world: &DispatchWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(admission(world)?.is_overweight(), "expected overweight");
    Ok(())
}

#[then(r#"the blocking reasons are "{reasons}""#)]
fn blocking_reasons_are(world: &DispatchWorld, reasons: String) -> Result<(), eyre::Report> {
    let reported = admission(world)?.blocking_reasons().to_string();
    eyre::ensure!(
        reported == reasons,
        "expected reasons '{reasons}', got '{reported}'"
    );
    Ok(())
}

#[then("the selection is inert")]
fn selection_inert(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let selection = world
        .selection
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing open selection"))?;
    eyre::ensure!(!selection.is_actionable(), "selection should be inert");
    Ok(())
}

#[then(r#"the dispatch state is "{state}""#)]
fn dispatch_state_is(world: &DispatchWorld, state: String) -> Result<(), eyre::Report> {
    let selection = run_async(world.service.find_by_id(world.selection_id()?))?
        .ok_or_else(|| eyre::eyre!("selection is no longer stored"))?;

    if selection.dispatch_state().as_str() != state {
        return Err(eyre::eyre!(
            "expected state {state}, found {}",
            selection.dispatch_state()
        ));
    }
    Ok(())
}

#[then("the driver received {count} order")]
fn driver_received(world: &DispatchWorld, count: usize) -> Result<(), eyre::Report> {
    let delivered = world.notifier.delivered()?;
    eyre::ensure!(
        delivered.len() == count,
        "expected {count} delivered orders, got {}",
        delivered.len()
    );
    Ok(())
}

#[then("the dispatch fails with a retriable error")]
fn dispatch_fails_retriably(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = world
        .dispatch_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing dispatch result"))?;

    if !result.as_ref().is_err_and(|err| err.kind().is_retriable()) {
        return Err(eyre::eyre!("expected a retriable failure, got {result:?}"));
    }
    Ok(())
}

#[then("the request is rejected as already in flight")]
fn request_rejected_in_flight(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = world
        .request_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;

    if !result
        .as_ref()
        .is_err_and(|err| err.kind() == ErrorKind::AlreadyInFlight)
    {
        return Err(eyre::eyre!("expected AlreadyInFlight, got {result:?}"));
    }
    Ok(())
}

#[then("the discard is rejected while in flight")]
fn discard_rejected_in_flight(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let result = world
        .dispatch_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing discard result"))?;

    if !matches!(
        result,
        Err(DispatchServiceError::Domain(
            DispatchDomainError::CannotDiscardInFlight { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected CannotDiscardInFlight, got {result:?}"));
    }
    Ok(())
}
