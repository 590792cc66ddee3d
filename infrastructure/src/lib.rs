//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: the gateway provider, file configuration loading,
//! and transcript logging.

pub mod config;
pub mod logging;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigLoader, FileConfig, FileCouncilConfig, FileProviderConfig, FileRoleConfig};
pub use logging::JsonlDeliberationLogger;
pub use providers::OpenRouterProvider;
