//! Council entities: roles, answers, options, and the deliberation output.

pub mod answer;
pub mod options;
pub mod output;
pub mod phase;
pub mod role;

pub use answer::Answer;
pub use options::{CouncilOptions, OutputMode};
pub use output::{CouncilOutput, DeliberationMetadata};
pub use phase::Phase;
pub use role::{Role, SamplingParams};
