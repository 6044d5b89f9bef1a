//! EventSink implementations.

use std::sync::Mutex;

use crate::domain::DomainEvent;
use crate::ports::EventSink;

/// Emits each event as a structured `tracing` record.
///
/// Operator-fatal failures are logged at `error`, the empty-launch anomaly
/// at `warn`, everything else at `info`/`warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &DomainEvent) {
        match event {
            DomainEvent::DispatchSubmitted {
                dispatch_id,
                bucket,
                key,
            } => {
                tracing::info!(
                    event = event.name(),
                    dispatch_id = %dispatch_id,
                    bucket = %bucket,
                    key = %key,
                    "run-task submitted"
                );
            }
            DomainEvent::DispatchSucceeded {
                dispatch_id,
                task_arns,
            } => {
                tracing::info!(
                    event = event.name(),
                    dispatch_id = %dispatch_id,
                    task_arns = ?task_arns,
                    "task launched"
                );
            }
            DomainEvent::DispatchFailed {
                dispatch_id,
                kind,
                code,
                message,
            } => {
                if kind.is_fatal_for_operators() {
                    tracing::error!(
                        event = event.name(),
                        dispatch_id = %dispatch_id,
                        kind = %kind,
                        code = ?code,
                        operator_action = "fix deployment configuration",
                        "{message}"
                    );
                } else {
                    tracing::warn!(
                        event = event.name(),
                        dispatch_id = %dispatch_id,
                        kind = %kind,
                        code = ?code,
                        anomaly = kind.is_anomaly(),
                        "{message}"
                    );
                }
            }
        }
    }
}

/// Keeps every emitted event in memory.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<DomainEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<DomainEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: &DomainEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
