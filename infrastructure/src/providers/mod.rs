//! Provider adapters implementing the application's [`LlmProvider`] port.
//!
//! [`LlmProvider`]: council_application::ports::provider::LlmProvider

pub mod openrouter;

pub use openrouter::OpenRouterProvider;
