//! Borda aggregation: weighted pairwise points.

use super::{AggregationMethod, AggregationOutcome, AggregationScores, Aggregator};
use crate::review::Verdict;
use std::collections::BTreeMap;

/// Weight of a decisive (`≫`) win.
const MAJOR_WIN_POINTS: f64 = 3.0;
/// Weight of a narrow (`>`) win.
const MINOR_WIN_POINTS: f64 = 1.0;
/// Points credited to both sides of a tie.
const TIE_POINTS: f64 = 0.5;

/// Weighted pairwise point count.
///
/// Each verdict credits points to the winner (3 for a decisive win, 1 for a
/// narrow one) or half a point to both sides of a tie. Scores are plain
/// sums with no normalization; ties in the final ranking break by
/// generation order via [`AggregationScores::ranked`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BordaAggregator;

impl Aggregator for BordaAggregator {
    fn method(&self) -> AggregationMethod {
        AggregationMethod::Borda
    }

    fn score(&self, verdicts: &[Verdict], candidates: &[String]) -> AggregationOutcome {
        let mut scores: BTreeMap<String, f64> =
            candidates.iter().map(|c| (c.clone(), 0.0)).collect();

        for verdict in verdicts {
            let (points_a, points_b) = match verdict.margin() {
                2 => (MAJOR_WIN_POINTS, 0.0),
                1 => (MINOR_WIN_POINTS, 0.0),
                0 => (TIE_POINTS, TIE_POINTS),
                -1 => (0.0, MINOR_WIN_POINTS),
                _ => (0.0, MAJOR_WIN_POINTS),
            };
            if let Some(score) = scores.get_mut(&verdict.candidate_a) {
                *score += points_a;
            }
            if let Some(score) = scores.get_mut(&verdict.candidate_b) {
                *score += points_b;
            }
        }

        AggregationOutcome {
            scores: AggregationScores {
                scores,
                confidence_intervals: None,
            },
            uncontested: Vec::new(),
        }
    }
}
