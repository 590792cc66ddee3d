//! Rank aggregation over pairwise verdicts.
//!
//! Three independent methods turn the same canonical verdict list into
//! per-candidate scores: Borda points, Bradley-Terry maximum-likelihood
//! strengths, and ELO ratings with bootstrap confidence intervals. None of
//! them reads judge identity, only the pair and margin, so they are stable
//! under reordering of judges. Divergence between the methods is
//! information for the caller, not something to smooth over.

pub mod borda;
pub mod bradley_terry;
pub mod elo;

pub use borda::BordaAggregator;
pub use bradley_terry::BradleyTerryAggregator;
pub use elo::EloAggregator;

use crate::review::Verdict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregation method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMethod {
    #[default]
    Borda,
    BradleyTerry,
    Elo,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Borda => "borda",
            AggregationMethod::BradleyTerry => "bradley_terry",
            AggregationMethod::Elo => "elo",
        }
    }

    /// All three methods, in the order they are reported.
    pub fn all() -> [AggregationMethod; 3] {
        [
            AggregationMethod::Borda,
            AggregationMethod::BradleyTerry,
            AggregationMethod::Elo,
        ]
    }
}

impl std::fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AggregationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "borda" => Ok(AggregationMethod::Borda),
            "bradley_terry" | "bradley-terry" | "bt" => Ok(AggregationMethod::BradleyTerry),
            "elo" => Ok(AggregationMethod::Elo),
            other => Err(format!(
                "invalid aggregation method '{other}' (expected borda, bradley_terry, or elo)"
            )),
        }
    }
}

/// One method's scores over the candidate set.
///
/// The key set of `scores` is exactly the candidate set the method was run
/// on. `confidence_intervals` is populated only by methods that estimate
/// uncertainty (ELO bootstrap); each interval is `(low, high)` at 95 %.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationScores {
    pub scores: BTreeMap<String, f64>,
    pub confidence_intervals: Option<BTreeMap<String, (f64, f64)>>,
}

impl AggregationScores {
    pub fn score_of(&self, role: &str) -> Option<f64> {
        self.scores.get(role).copied()
    }

    /// Candidates sorted best-first. Ties in score are broken by the
    /// candidate's position in `candidates` (generation order).
    pub fn ranked(&self, candidates: &[String]) -> Vec<(String, f64)> {
        let mut rows: Vec<(usize, &String, f64)> = candidates
            .iter()
            .enumerate()
            .filter_map(|(i, c)| self.scores.get(c).map(|s| (i, c, *s)))
            .collect();
        rows.sort_by(|a, b| {
            b.2.partial_cmp(&a.2)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        rows.into_iter().map(|(_, c, s)| (c.clone(), s)).collect()
    }
}

/// Result of one aggregator run: the scores plus bookkeeping the
/// coordinator folds into run metadata.
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    pub scores: AggregationScores,
    /// Candidates that never appeared in a contested verdict.
    pub uncontested: Vec<String>,
}

/// A rank aggregation strategy over a canonical verdict list.
///
/// `verdicts` must already be in canonical (judge index, pair index) order;
/// `candidates` are the successful role names in generation order. The
/// score map's key set equals `candidates` exactly.
pub trait Aggregator {
    fn method(&self) -> AggregationMethod;

    fn score(&self, verdicts: &[Verdict], candidates: &[String]) -> AggregationOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!(
            "bradley_terry".parse::<AggregationMethod>().unwrap(),
            AggregationMethod::BradleyTerry
        );
        assert_eq!(
            "bradley-terry".parse::<AggregationMethod>().unwrap(),
            AggregationMethod::BradleyTerry
        );
        assert_eq!("elo".parse::<AggregationMethod>().unwrap(), AggregationMethod::Elo);
        assert!("median".parse::<AggregationMethod>().is_err());
    }

    #[test]
    fn test_ranked_breaks_ties_by_candidate_order() {
        let scores = AggregationScores {
            scores: [
                ("late".to_string(), 1.0),
                ("early".to_string(), 1.0),
                ("top".to_string(), 2.0),
            ]
            .into_iter()
            .collect(),
            confidence_intervals: None,
        };
        let candidates = vec![
            "early".to_string(),
            "late".to_string(),
            "top".to_string(),
        ];
        let ranked = scores.ranked(&candidates);
        assert_eq!(ranked[0].0, "top");
        assert_eq!(ranked[1].0, "early");
        assert_eq!(ranked[2].0, "late");
    }
}
