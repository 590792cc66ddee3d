//! Use cases of the deliberation engine.

pub mod deliberate;

pub use deliberate::{DeliberateError, DeliberateInput, DeliberateUseCase};
