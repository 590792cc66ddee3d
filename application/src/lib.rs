//! Application layer for llm-council
//!
//! This crate contains the deliberation use case, port definitions, and
//! coordinator configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    deliberation_log::{DeliberationEvent, DeliberationLogger, NoDeliberationLogger},
    progress::{NoProgress, ProgressNotifier},
    provider::{Completion, CompletionRequest, LlmProvider, ProviderError},
};
pub use use_cases::deliberate::{DeliberateError, DeliberateInput, DeliberateUseCase};
