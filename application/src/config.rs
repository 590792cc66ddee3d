//! Application-level configuration
//!
//! Configuration for use case behavior like the overall deliberation
//! deadline. Per-request timeouts belong to the provider adapter.

use std::time::Duration;

/// Coordinator behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// Overall deadline for one deliberation. Expiry is equivalent to
    /// cancellation: in-flight calls are aborted and the partial output is
    /// returned. `None` disables the deadline.
    pub deadline: Option<Duration>,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            deadline: Some(Duration::from_secs(600)),
        }
    }
}

impl BehaviorConfig {
    /// Create a config with the given deadline in seconds.
    pub fn with_deadline_seconds(seconds: u64) -> Self {
        Self {
            deadline: Some(Duration::from_secs(seconds)),
        }
    }

    /// Create from an optional deadline; `None` disables the deadline.
    pub fn from_deadline_seconds(seconds: Option<u64>) -> Self {
        Self {
            deadline: seconds.map(Duration::from_secs),
        }
    }
}
