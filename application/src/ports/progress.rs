//! Progress notification port
//!
//! Defines the interface for reporting progress during a deliberation.
//! This doubles as the streaming event channel of the engine: callers that
//! want live progress (a CLI spinner, a websocket) implement it; event
//! order matches the coordinator's stage order.

use council_domain::Phase;

/// Callback for progress updates during a deliberation.
///
/// Implementations live in the presentation layer and can display progress
/// in various ways (console, web UI, etc.). All methods default to no-ops.
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts, with the number of calls it will issue.
    fn on_phase_start(&self, _phase: &Phase, _total_tasks: usize) {}

    /// Called when one role's generation call completes.
    fn on_generation_complete(&self, _role: &str, _success: bool) {}

    /// Called after each judge reply during peer review.
    fn on_review_progress(&self, _done: usize, _total: usize) {}

    /// Called when the chairman synthesis call completes.
    fn on_synthesis_complete(&self, _success: bool) {}

    /// Called when a phase completes.
    fn on_phase_complete(&self, _phase: &Phase) {}
}

/// No-op progress notifier for when progress reporting is not needed.
pub struct NoProgress;

impl ProgressNotifier for NoProgress {}
