//! Integration tests for the JSON lines event sink.

use std::sync::Arc;

use fieldgate::{
    dispatch::{
        adapters::memory::{InMemoryDispatchSelectionRepository, RecordingDispatchNotifier},
        services::DispatchService,
    },
    events::{DomainEvent, EventEnvelope, adapters::JsonLinesEventSink},
};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dispatch_events_are_written_as_json_lines() {
    let sink = Arc::new(JsonLinesEventSink::new(Vec::<u8>::new()));
    let service = DispatchService::new(
        Arc::new(InMemoryDispatchSelectionRepository::new()),
        Arc::new(RecordingDispatchNotifier::new()),
        Arc::clone(&sink),
        Arc::new(DefaultClock),
    );
    let selection = service
        .open_selection("farm-a")
        .await
        .expect("selection should open");
    service
        .assign_truck(selection.id(), "truck-1", 2_000)
        .await
        .expect("truck");
    service
        .dispatch(selection.id())
        .await
        .expect("dispatch should succeed");
    drop(service);

    let sink = Arc::try_unwrap(sink).expect("service released the sink");
    let bytes = sink.into_inner().expect("sink buffer recoverable");
    let text = String::from_utf8(bytes).expect("sink writes UTF-8");
    let envelopes: Vec<EventEnvelope> = text
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is an envelope"))
        .collect();

    assert_eq!(envelopes.len(), 2);
    assert!(matches!(
        envelopes.first().map(EventEnvelope::event),
        Some(DomainEvent::DispatchRequested(_))
    ));
    assert!(matches!(
        envelopes.last().map(EventEnvelope::event),
        Some(DomainEvent::DispatchConfirmed(_))
    ));
    assert!(text.contains(r#""type":"dispatch_requested""#));
}
