//! Then steps for pickup completion BDD scenarios.

use super::world::{PickupWorld, run_async};
use fieldgate::{
    error::ErrorKind,
    events::DomainEvent,
    pickup::{
        domain::PickupDomainError,
        services::PickupLifecycleError,
    },
};
use rstest_bdd_macros::then;

#[then(r#"the task state is "{state}""#)]
fn task_state_is(world: &PickupWorld, state: String) -> Result<(), eyre::Report> {
    let task = run_async(world.service.find_by_id(world.task_id()?))?
        .ok_or_else(|| eyre::eyre!("assigned task is no longer stored"))?;

    if task.state().as_str() != state {
        return Err(eyre::eyre!("expected state {state}, found {}", task.state()));
    }
    Ok(())
}

#[then("a task completed event reports {count:u32} crates")]
fn completed_event_reports(world: &PickupWorld, count: u32) -> Result<(), eyre::Report> {
    let events = world.events.events()?;
    let [DomainEvent::TaskCompleted(confirmation)] = events.as_slice() else {
        return Err(eyre::eyre!("expected one task completed event, got {events:?}"));
    };
    eyre::ensure!(
        confirmation.crate_count.value() == count,
        "expected {count} crates, event reports {}",
        confirmation.crate_count
    );
    Ok(())
}

#[then("no task completed event was emitted")]
fn no_completed_event(world: &PickupWorld) -> Result<(), eyre::Report> {
    let events = world.events.events()?;
    eyre::ensure!(events.is_empty(), "unexpected events {events:?}");
    Ok(())
}

#[then(r#"completion is rejected as missing "{missing}""#)]
fn completion_rejected_missing(world: &PickupWorld, missing: String) -> Result<(), eyre::Report> {
    let result = world
        .completion_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing completion result"))?;

    let Err(PickupLifecycleError::Domain(PickupDomainError::PreconditionNotMet {
        missing: reported,
        ..
    })) = result
    else {
        return Err(eyre::eyre!("expected PreconditionNotMet, got {result:?}"));
    };
    eyre::ensure!(
        reported.to_string() == missing,
        "expected missing '{missing}', got '{reported}'"
    );
    Ok(())
}

#[then("completion is rejected as an invalid transition")]
fn completion_rejected_invalid(world: &PickupWorld) -> Result<(), eyre::Report> {
    let result = world
        .completion_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing completion result"))?;

    if !result
        .as_ref()
        .is_err_and(|err| err.kind() == ErrorKind::InvalidTransition)
    {
        return Err(eyre::eyre!("expected InvalidTransition, got {result:?}"));
    }
    Ok(())
}

#[then("the capture fails with a retriable error")]
fn capture_fails_retriably(world: &PickupWorld) -> Result<(), eyre::Report> {
    let result = world
        .capture_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing capture result"))?;

    if !result.as_ref().is_err_and(|err| err.kind().is_retriable()) {
        return Err(eyre::eyre!("expected a retriable failure, got {result:?}"));
    }
    Ok(())
}

#[then(r#"the task still lacks "{requirement}""#)]
fn task_still_lacks(world: &PickupWorld, requirement: String) -> Result<(), eyre::Report> {
    let missing = run_async(world.service.missing_requirements(world.task_id()?))?;
    eyre::ensure!(
        missing
            .as_slice()
            .iter()
            .any(|unmet| unmet.as_str() == requirement),
        "expected '{requirement}' to be missing, got '{missing}'"
    );
    Ok(())
}
