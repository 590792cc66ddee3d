//! Domain layer for llm-council
//!
//! This crate contains the core business logic of the deliberation engine:
//! council entities, the verdict protocol, the three rank aggregators, and
//! the prompt templates. It has no dependencies on infrastructure or I/O.

pub mod aggregation;
pub mod core;
pub mod council;
pub mod prompt;
pub mod review;

// Re-export commonly used types
pub use aggregation::{
    AggregationMethod, AggregationOutcome, AggregationScores, Aggregator, BordaAggregator,
    BradleyTerryAggregator, EloAggregator,
};
pub use self::core::{
    error::{DomainError, Severity, ValidationIssue},
    model::ModelId,
    task::Task,
};
pub use council::{
    Answer, CouncilOptions, CouncilOutput, DeliberationMetadata, OutputMode, Phase, Role,
    SamplingParams,
};
pub use prompt::PromptTemplate;
pub use review::{LabelAssignment, Verdict, VerdictOutcome, enumerate_pairs, parse_verdict};
