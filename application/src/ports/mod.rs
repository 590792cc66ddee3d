//! Port definitions: the interfaces the engine needs from the outside world.

pub mod deliberation_log;
pub mod progress;
pub mod provider;

pub use deliberation_log::{DeliberationEvent, DeliberationLogger, NoDeliberationLogger};
pub use progress::{NoProgress, ProgressNotifier};
pub use provider::{Completion, CompletionRequest, LlmProvider, ProviderError};
