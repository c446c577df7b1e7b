//! Tests for audit sink

use std::sync::Arc;

use parking_lot::Mutex;
use scaling_schedule_executor::core::{
    build_audit_event, AuditSink, InMemoryAuditSink, TracingAuditSink,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        "app-1.42_start",
        "app-1",
        42,
        "notify",
        Some("success".to_string()),
    );

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0], event);
    assert_eq!(events[0].action, "notify");
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("k1", "app", 1, "notify", None));
    sink.record(build_audit_event("k2", "app", 2, "notify", None));
    sink.record(build_audit_event("k3", "app", 3, "notify", None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].trigger_key, "k2"); // First one popped
    assert_eq!(events[1].trigger_key, "k3");
}

#[test]
fn test_events_for_trigger() {
    let mut sink = InMemoryAuditSink::new(10);
    sink.record(build_audit_event("a", "app", 1, "notify", None));
    sink.record(build_audit_event("b", "app", 2, "notify", None));
    sink.record(build_audit_event("a", "app", 1, "succeeded", None));

    let actions: Vec<String> = sink.events_for("a").into_iter().map(|e| e.action).collect();
    assert_eq!(actions, vec!["notify", "succeeded"]);
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        "app-1.7_stop",
        "app-1",
        7,
        "rejected",
        Some("client error 404".to_string()),
    );

    assert_eq!(event.trigger_key, "app-1.7_stop");
    assert_eq!(event.app_id, "app-1");
    assert_eq!(event.schedule_id, 7);
    assert_eq!(event.action, "rejected");
    assert_eq!(event.payload, Some("client error 404".to_string()));
    assert!(event.created_at_ms > 0);
    assert_eq!(event.event_id.len(), 36);
    assert_eq!(
        event.to_string(),
        "[app-1.7_stop] rejected app=app-1 schedule=7 client error 404"
    );
}

#[test]
fn test_unique_event_ids() {
    let a = build_audit_event("k", "app", 1, "notify", None);
    let b = build_audit_event("k", "app", 1, "notify", None);
    assert_ne!(a.event_id, b.event_id);
}

#[test]
fn test_shared_sink_keeps_handle() {
    let shared = Arc::new(Mutex::new(InMemoryAuditSink::new(4)));
    let mut boxed: Box<dyn AuditSink> = Box::new(Arc::clone(&shared));
    boxed.record(build_audit_event("k", "app", 1, "succeeded", None));
    assert_eq!(shared.lock().events().len(), 1);
}

#[test]
fn test_tracing_sink_accepts_events() {
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event("k", "app", 1, "exhausted", Some("max 3".into())));
}
