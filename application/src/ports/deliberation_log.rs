//! Port for structured deliberation logging.
//!
//! Defines the [`DeliberationLogger`] trait for recording deliberation
//! events (answers, verdicts, synthesis) to a structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! transcript of the run (JSONL).

use serde_json::Value;

/// A structured deliberation event for logging.
pub struct DeliberationEvent {
    /// Event type identifier (e.g., "answer", "verdict", "synthesis").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl DeliberationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging deliberation events to a structured log.
///
/// `log` is intentionally synchronous and non-fallible so the pipeline
/// never stalls on its transcript; logging failures are silently ignored.
pub trait DeliberationLogger: Send + Sync {
    fn log(&self, event: DeliberationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoDeliberationLogger;

impl DeliberationLogger for NoDeliberationLogger {
    fn log(&self, _event: DeliberationEvent) {}
}
