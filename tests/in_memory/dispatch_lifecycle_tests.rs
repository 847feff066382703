//! In-memory integration tests for dispatch selections.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{Engine, engine};
use fieldgate::{
    dispatch::domain::{BlockingReason, DispatchState, LoadEstimate},
    error::ErrorKind,
    events::DomainEvent,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn officer_adjusts_overweight_selection_then_dispatches(engine: Engine) {
    let selection = engine
        .dispatch
        .open_selection("farm-a")
        .await
        .expect("selection should open");
    let id = selection.id();
    engine
        .dispatch
        .select_farm(id, "farm-b")
        .await
        .expect("farm should be added");
    engine
        .dispatch
        .assign_truck(id, "truck-small", 1_000)
        .await
        .expect("truck should be assigned");
    engine
        .dispatch
        .update_load(id, LoadEstimate::new(1_200, 64))
        .await
        .expect("load should update");

    let blocked = engine.dispatch.evaluate(id).await.expect("evaluation");
    assert!(blocked.is_overweight());
    assert_eq!(
        blocked.blocking_reasons().as_slice(),
        &[BlockingReason::Overweight]
    );

    engine
        .dispatch
        .assign_truck(id, "truck-large", 1_500)
        .await
        .expect("truck should be replaced");
    let admitted = engine.dispatch.evaluate(id).await.expect("evaluation");
    assert!(admitted.can_dispatch());

    let dispatched = engine.dispatch.dispatch(id).await.expect("dispatch");
    assert_eq!(dispatched.dispatch_state(), DispatchState::Dispatched);

    let delivered = engine.notifier.delivered().expect("notifier readable");
    assert_eq!(delivered.len(), 1);
    let order = delivered.first().expect("one delivered order");
    assert_eq!(order.truck_id.as_str(), "truck-large");
    assert_eq!(order.farm_ids.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_last_farm_leaves_selection_inert(engine: Engine) {
    let selection = engine
        .dispatch
        .open_selection("farm-a")
        .await
        .expect("selection should open");

    let emptied = engine
        .dispatch
        .deselect_farm(selection.id(), "farm-a")
        .await
        .expect("farm should be removed");

    assert!(!emptied.is_actionable());
    let admission = engine
        .dispatch
        .evaluate(selection.id())
        .await
        .expect("evaluation");
    assert!(
        admission
            .blocking_reasons()
            .contains(BlockingReason::NoFarmsSelected)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatched_selection_cannot_be_edited_or_discarded(engine: Engine) {
    let selection = engine
        .dispatch
        .open_selection("farm-a")
        .await
        .expect("selection should open");
    let id = selection.id();
    engine
        .dispatch
        .assign_truck(id, "truck-1", 2_000)
        .await
        .expect("truck");
    engine.dispatch.dispatch(id).await.expect("dispatch");

    let edit = engine
        .dispatch
        .select_farm(id, "farm-b")
        .await
        .expect_err("dispatched selection is locked");
    let discard = engine
        .dispatch
        .discard(id)
        .await
        .expect_err("dispatched selection is locked");

    assert_eq!(edit.kind(), ErrorKind::InvalidTransition);
    assert_eq!(discard.kind(), ErrorKind::InvalidTransition);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_requests_admit_exactly_one(engine: Engine) {
    let Engine {
        dispatch, events, ..
    } = engine;
    let service = Arc::new(dispatch);
    let selection = service
        .open_selection("farm-a")
        .await
        .expect("selection should open");
    let id = selection.id();
    service
        .assign_truck(id, "truck-1", 2_000)
        .await
        .expect("truck");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let requester = Arc::clone(&service);
            tokio::spawn(async move { requester.request_dispatch(id).await })
        })
        .collect();
    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("request task should not panic") {
            Ok(_) => admitted += 1,
            Err(err) => {
                assert_eq!(err.kind(), ErrorKind::AlreadyInFlight);
                rejected += 1;
            }
        }
    }

    assert_eq!(admitted, 1);
    assert_eq!(rejected, 3);
    let requested = events
        .events()
        .expect("event log readable")
        .into_iter()
        .filter(|event| matches!(event, DomainEvent::DispatchRequested(_)))
        .count();
    assert_eq!(requested, 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manual_settlement_reports_failure_then_success(engine: Engine) {
    let selection = engine
        .dispatch
        .open_selection("farm-a")
        .await
        .expect("selection should open");
    let id = selection.id();
    engine
        .dispatch
        .assign_truck(id, "truck-1", 2_000)
        .await
        .expect("truck");

    engine.dispatch.request_dispatch(id).await.expect("request");
    let reverted = engine
        .dispatch
        .fail_dispatch(id, "radio silence")
        .await
        .expect("failure recorded");
    assert_eq!(reverted.dispatch_state(), DispatchState::Idle);

    engine.dispatch.request_dispatch(id).await.expect("retry");
    let confirmed = engine
        .dispatch
        .confirm_dispatch(id)
        .await
        .expect("confirmation");
    assert_eq!(confirmed.dispatch_state(), DispatchState::Dispatched);

    let types: Vec<_> = engine
        .events
        .events()
        .expect("event log readable")
        .iter()
        .map(DomainEvent::event_type)
        .collect();
    assert_eq!(
        types,
        [
            "dispatch_requested",
            "dispatch_failed",
            "dispatch_requested",
            "dispatch_confirmed"
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn in_flight_window_is_observable(engine: Engine) {
    let Engine {
        dispatch, notifier, ..
    } = engine;
    let service = Arc::new(dispatch);
    let selection = service
        .open_selection("farm-a")
        .await
        .expect("selection should open");
    let id = selection.id();
    service
        .assign_truck(id, "truck-1", 2_000)
        .await
        .expect("truck");
    notifier
        .set_delay(Duration::from_millis(200))
        .expect("notifier script accepted");

    let dispatcher = Arc::clone(&service);
    let pending = tokio::spawn(async move { dispatcher.dispatch(id).await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let during = service
        .find_by_id(id)
        .await
        .expect("lookup should succeed")
        .expect("selection should exist");
    assert_eq!(during.dispatch_state(), DispatchState::Dispatching);
    assert!(!service.evaluate(id).await.expect("evaluation").can_dispatch());

    let settled = pending
        .await
        .expect("dispatch task should not panic")
        .expect("dispatch should succeed");
    assert_eq!(settled.dispatch_state(), DispatchState::Dispatched);
}
