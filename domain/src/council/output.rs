//! Deliberation result types.

use crate::aggregation::AggregationScores;
use crate::council::answer::Answer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Counters and timings recorded alongside a deliberation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliberationMetadata {
    /// Wall-clock duration of the whole deliberation in milliseconds
    pub duration_ms: u64,
    /// Duration of the generation stage
    pub generation_ms: u64,
    /// Duration of the peer-review stage (0 when skipped)
    pub review_ms: u64,
    /// Duration of the synthesis stage (0 when skipped)
    pub synthesis_ms: u64,
    /// Number of answers with success = true
    pub successful_answers: usize,
    /// Number of failed answer stubs
    pub failed_answers: usize,
    /// Number of judges that participated in peer review
    pub judges: usize,
    /// Number of unordered candidate pairs per judge
    pub candidate_pairs: usize,
    /// judges * candidate_pairs
    pub expected_judgments: usize,
    /// Parseable verdicts collected
    pub verdicts: usize,
    /// Judge replies with no recognizable verdict token
    pub unparseable_verdicts: usize,
    /// Judge calls that failed outright
    pub failed_judgments: usize,
    /// The primary aggregation method selected by the caller
    pub primary_method: String,
    /// Candidates that never appeared in a contested verdict and received
    /// a fallback Bradley-Terry strength
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uncontested: Vec<String>,
    /// Whether the deliberation was cut short by cancellation or deadline
    pub cancelled: bool,
}

/// Complete output of one deliberation.
///
/// Serializes to the four top-level fields callers persist (`task`,
/// `results`, `aggregation_scores`, `synthesis`) plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilOutput {
    /// The original task text
    pub task: String,
    /// One answer per role, preserving input role order
    pub results: Vec<Answer>,
    /// Method name -> scores, for every method that could be computed
    pub aggregation_scores: BTreeMap<String, AggregationScores>,
    /// The chairman synthesis, when requested and successful
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<String>,
    /// Run counters and timings
    #[serde(default)]
    pub metadata: DeliberationMetadata,
}

impl CouncilOutput {
    pub fn new(task: impl Into<String>, results: Vec<Answer>) -> Self {
        Self {
            task: task.into(),
            results,
            aggregation_scores: BTreeMap::new(),
            synthesis: None,
            metadata: DeliberationMetadata::default(),
        }
    }

    /// Returns an iterator over only the successful answers.
    pub fn successful_answers(&self) -> impl Iterator<Item = &Answer> {
        self.results.iter().filter(|a| a.success)
    }

    /// Returns an iterator over only the failed answers.
    pub fn failed_answers(&self) -> impl Iterator<Item = &Answer> {
        self.results.iter().filter(|a| !a.success)
    }

    /// Scores for the caller-selected primary method, if computed.
    pub fn primary_scores(&self) -> Option<&AggregationScores> {
        self.aggregation_scores.get(&self.metadata.primary_method)
    }
}
