//! Per-deliberation options.

use crate::aggregation::AggregationMethod;
use crate::core::model::ModelId;
use serde::{Deserialize, Serialize};

/// How much of the council's work is returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Only the individual perspectives
    Perspectives,
    /// Only the chairman synthesis
    Synthesis,
    /// Both perspectives and synthesis
    #[default]
    Both,
}

impl OutputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Perspectives => "perspectives",
            OutputMode::Synthesis => "synthesis",
            OutputMode::Both => "both",
        }
    }

    /// Whether this mode requires a chairman synthesis call.
    pub fn includes_synthesis(&self) -> bool {
        matches!(self, OutputMode::Synthesis | OutputMode::Both)
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "perspectives" => Ok(OutputMode::Perspectives),
            "synthesis" => Ok(OutputMode::Synthesis),
            "both" => Ok(OutputMode::Both),
            other => Err(format!(
                "invalid output mode '{other}' (expected perspectives, synthesis, or both)"
            )),
        }
    }
}

/// Options for one deliberation.
#[derive(Debug, Clone)]
pub struct CouncilOptions {
    /// What the caller gets back
    pub output_mode: OutputMode,
    /// Whether judges and the chairman see anonymized labels instead of
    /// role names
    pub anonymize: bool,
    /// Whether to run the peer-review stage (and therefore aggregation)
    pub review: bool,
    /// Optional subset of role names acting as judges; defaults to all
    /// successful roles
    pub reviewers: Option<Vec<String>>,
    /// Primary aggregation method echoed in the output metadata. All three
    /// methods are always computed.
    pub aggregation: AggregationMethod,
    /// Model for the chairman synthesis. Required when `output_mode`
    /// includes synthesis.
    pub chairman_model: Option<ModelId>,
}

impl Default for CouncilOptions {
    fn default() -> Self {
        Self {
            output_mode: OutputMode::Both,
            anonymize: true,
            review: true,
            reviewers: None,
            aggregation: AggregationMethod::Borda,
            chairman_model: None,
        }
    }
}

impl CouncilOptions {
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    pub fn with_chairman(mut self, model: ModelId) -> Self {
        self.chairman_model = Some(model);
        self
    }

    pub fn with_reviewers(mut self, reviewers: Vec<String>) -> Self {
        self.reviewers = Some(reviewers);
        self
    }

    pub fn with_primary_method(mut self, method: AggregationMethod) -> Self {
        self.aggregation = method;
        self
    }

    pub fn without_review(mut self) -> Self {
        self.review = false;
        self
    }

    pub fn without_anonymization(mut self) -> Self {
        self.anonymize = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_mode_parse() {
        assert_eq!("both".parse::<OutputMode>().unwrap(), OutputMode::Both);
        assert_eq!(
            "Perspectives".parse::<OutputMode>().unwrap(),
            OutputMode::Perspectives
        );
        assert!("everything".parse::<OutputMode>().is_err());
    }

    #[test]
    fn test_synthesis_required() {
        assert!(OutputMode::Both.includes_synthesis());
        assert!(OutputMode::Synthesis.includes_synthesis());
        assert!(!OutputMode::Perspectives.includes_synthesis());
    }

    #[test]
    fn test_defaults() {
        let opts = CouncilOptions::default();
        assert!(opts.anonymize);
        assert!(opts.review);
        assert!(opts.reviewers.is_none());
        assert_eq!(opts.aggregation, AggregationMethod::Borda);
    }
}
