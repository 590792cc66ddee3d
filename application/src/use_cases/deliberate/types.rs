//! Input and error types for the deliberate use case.

use council_domain::{CouncilOptions, Role, Task};
use thiserror::Error;

/// Errors that can end a deliberation with no usable output.
///
/// Per-call failures never surface here; they degrade into failed answers,
/// missing verdicts, or an absent synthesis.
#[derive(Error, Debug)]
pub enum DeliberateError {
    /// Malformed input; no partial output is produced.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Every generation call failed, leaving nothing to deliberate over.
    #[error("All roles failed to produce an answer")]
    AllRolesFailed,

    /// Cancellation (or the overall deadline) fired before at least two
    /// answers succeeded.
    #[error("Deliberation cancelled")]
    Cancelled,
}

impl DeliberateError {
    /// Check if this error represents a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeliberateError::Cancelled)
    }
}

/// Input for the deliberate use case.
#[derive(Debug, Clone)]
pub struct DeliberateInput {
    /// The question put before the council
    pub task: Task,
    /// Seats participating in the deliberation (at least two)
    pub roles: Vec<Role>,
    /// Per-run options, including the chairman model
    pub options: CouncilOptions,
}

impl DeliberateInput {
    pub fn new(task: impl Into<Task>, roles: Vec<Role>) -> Self {
        Self {
            task: task.into(),
            roles,
            options: CouncilOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CouncilOptions) -> Self {
        self.options = options;
        self
    }
}
