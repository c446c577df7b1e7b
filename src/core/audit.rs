//! Audit sink implementations.
//!
//! Every notification attempt and every firing decision is recorded as an
//! [`AuditEvent`] so operators can reconstruct a firing lineage without
//! scraping logs.

use std::collections::VecDeque;
use std::fmt;

use crate::util::clock::now_ms;

/// Audit event structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Trigger that caused the firing.
    pub trigger_key: String,
    /// Application identifier.
    pub app_id: String,
    /// Schedule identifier.
    pub schedule_id: i64,
    /// Decision or step recorded (notify, succeeded, rejected, rescheduled, exhausted, scheduling_failed).
    pub action: String,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context.
    pub payload: Option<String>,
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} app={} schedule={}",
            self.trigger_key, self.action, self.app_id, self.schedule_id
        )?;
        if let Some(payload) = &self.payload {
            write!(f, " {payload}")?;
        }
        Ok(())
    }
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Events recorded for one trigger, oldest first.
    pub fn events_for(&self, trigger_key: &str) -> Vec<AuditEvent> {
        self.events
            .iter()
            .filter(|e| e.trigger_key == trigger_key)
            .cloned()
            .collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards events to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            event_id = %event.event_id,
            trigger_key = %event.trigger_key,
            app_id = %event.app_id,
            schedule_id = event.schedule_id,
            action = %event.action,
            payload = event.payload.as_deref().unwrap_or(""),
            "audit"
        );
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    trigger_key: impl Into<String>,
    app_id: impl Into<String>,
    schedule_id: i64,
    action: impl Into<String>,
    payload: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        trigger_key: trigger_key.into(),
        app_id: app_id.into(),
        schedule_id,
        action: action.into(),
        created_at_ms: now_ms(),
        payload,
    }
}

/// Shared sinks let callers keep a handle to the events they hand out.
impl<S: AuditSink> AuditSink for std::sync::Arc<parking_lot::Mutex<S>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}
