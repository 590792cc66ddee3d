//! File configuration: TOML schema and multi-source loader.

pub mod file_config;
pub mod loader;

pub use file_config::{FileConfig, FileCouncilConfig, FileProviderConfig, FileRoleConfig};
pub use loader::{ConfigLayer, ConfigLoader};
