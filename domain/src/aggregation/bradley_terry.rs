//! Bradley-Terry maximum-likelihood strengths.
//!
//! Model: `P(i beats l) = s_i / (s_i + s_l)` with `s_i > 0`. Strengths are
//! fitted by the standard Minorization-Maximization iteration over weighted
//! win counts accumulated from the verdicts.

use super::{AggregationMethod, AggregationOutcome, AggregationScores, Aggregator};
use crate::review::Verdict;
use std::collections::BTreeMap;

/// Win weight of a decisive (`≫`) verdict.
const MAJOR_WIN_WEIGHT: f64 = 2.0;
/// Win weight of a narrow (`>`) verdict.
const MINOR_WIN_WEIGHT: f64 = 1.0;
/// Win weight credited to both sides of a tie.
const TIE_WEIGHT: f64 = 0.5;

/// Floor that keeps strengths positive through the iteration.
const MIN_STRENGTH: f64 = 1e-10;

/// Bradley-Terry strengths via MM iteration.
///
/// Strengths start at 1, iterate until the maximum relative change drops
/// below `tolerance` or `max_iterations` is reached, and are re-normalized
/// to geometric mean 1 for stable reporting. A candidate with zero
/// contested weight cannot be placed by the model; it receives the mean of
/// the fitted strengths and is flagged in the outcome.
#[derive(Debug, Clone, Copy)]
pub struct BradleyTerryAggregator {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for BradleyTerryAggregator {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

impl BradleyTerryAggregator {
    /// Accumulate the weighted win matrix `w[i][l]` = win weight of i over l.
    fn win_matrix(verdicts: &[Verdict], index: &BTreeMap<&str, usize>, n: usize) -> Vec<Vec<f64>> {
        let mut wins = vec![vec![0.0; n]; n];
        for verdict in verdicts {
            let (Some(&a), Some(&b)) = (
                index.get(verdict.candidate_a.as_str()),
                index.get(verdict.candidate_b.as_str()),
            ) else {
                continue;
            };
            match verdict.margin() {
                2 => wins[a][b] += MAJOR_WIN_WEIGHT,
                1 => wins[a][b] += MINOR_WIN_WEIGHT,
                0 => {
                    wins[a][b] += TIE_WEIGHT;
                    wins[b][a] += TIE_WEIGHT;
                }
                -1 => wins[b][a] += MINOR_WIN_WEIGHT,
                _ => wins[b][a] += MAJOR_WIN_WEIGHT,
            }
        }
        wins
    }

    /// Normalize strengths of the contested candidates to geometric mean 1.
    fn normalize(strengths: &mut [f64], contested: &[usize]) {
        if contested.is_empty() {
            return;
        }
        let log_sum: f64 = contested
            .iter()
            .map(|&i| strengths[i].max(MIN_STRENGTH).ln())
            .sum();
        let geo_mean = (log_sum / contested.len() as f64).exp();
        for &i in contested {
            strengths[i] = (strengths[i] / geo_mean).max(MIN_STRENGTH);
        }
    }
}

impl Aggregator for BradleyTerryAggregator {
    fn method(&self) -> AggregationMethod {
        AggregationMethod::BradleyTerry
    }

    fn score(&self, verdicts: &[Verdict], candidates: &[String]) -> AggregationOutcome {
        let n = candidates.len();
        let index: BTreeMap<&str, usize> = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let wins = Self::win_matrix(verdicts, &index, n);

        // Pair comparison counts n_il = w_il + w_li; a candidate with no
        // comparisons at all is uncontested and excluded from the fit.
        let comparisons = |i: usize, l: usize| wins[i][l] + wins[l][i];
        let contested: Vec<usize> = (0..n)
            .filter(|&i| (0..n).any(|l| l != i && comparisons(i, l) > 0.0))
            .collect();
        let uncontested: Vec<String> = (0..n)
            .filter(|i| !contested.contains(i))
            .map(|i| candidates[i].clone())
            .collect();

        let mut strengths = vec![1.0; n];

        if !contested.is_empty() {
            let total_wins: Vec<f64> = (0..n).map(|i| wins[i].iter().sum()).collect();

            for _ in 0..self.max_iterations {
                let mut next = strengths.clone();
                let mut max_relative_change: f64 = 0.0;

                for &i in &contested {
                    let mut denom = 0.0;
                    for &l in &contested {
                        if l == i {
                            continue;
                        }
                        let n_il = comparisons(i, l);
                        if n_il > 0.0 {
                            denom += n_il / (strengths[i] + strengths[l]);
                        }
                    }
                    if denom > 0.0 {
                        next[i] = (total_wins[i] / denom).max(MIN_STRENGTH);
                    }
                    max_relative_change =
                        max_relative_change.max((next[i] - strengths[i]).abs() / strengths[i]);
                }

                strengths = next;
                Self::normalize(&mut strengths, &contested);

                if max_relative_change < self.tolerance {
                    break;
                }
            }
        }

        // Uncontested candidates get the mean of the fitted strengths so the
        // score map still covers the full candidate set.
        if !uncontested.is_empty() && !contested.is_empty() {
            let mean: f64 =
                contested.iter().map(|&i| strengths[i]).sum::<f64>() / contested.len() as f64;
            for i in 0..n {
                if !contested.contains(&i) {
                    strengths[i] = mean;
                }
            }
        }

        let scores = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), strengths[i]))
            .collect();

        AggregationOutcome {
            scores: AggregationScores {
                scores,
                confidence_intervals: None,
            },
            uncontested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::VerdictOutcome;

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_win_orders_strengths() {
        let verdicts = vec![Verdict::new("r1", "r1", "r2", VerdictOutcome::StrongWinA)];
        let outcome = BradleyTerryAggregator::default().score(&verdicts, &candidates(&["r1", "r2"]));
        let s1 = outcome.scores.score_of("r1").unwrap();
        let s2 = outcome.scores.score_of("r2").unwrap();
        assert!(s1 > s2, "expected s(r1)={s1} > s(r2)={s2}");
        assert!(s1 > 0.0 && s2 > 0.0);
    }

    #[test]
    fn test_all_ties_give_equal_strengths() {
        let names = candidates(&["r1", "r2", "r3"]);
        let mut verdicts = Vec::new();
        for judge in &names {
            for (a, b) in [("r1", "r2"), ("r1", "r3"), ("r2", "r3")] {
                verdicts.push(Verdict::new(judge.clone(), a, b, VerdictOutcome::Tie));
            }
        }
        let outcome = BradleyTerryAggregator::default().score(&verdicts, &names);
        let s1 = outcome.scores.score_of("r1").unwrap();
        for name in &names {
            let s = outcome.scores.score_of(name).unwrap();
            assert!((s - s1).abs() < 1e-6, "{name}: {s} vs {s1}");
        }
        // Geometric mean 1 means all-equal strengths are all 1.
        assert!((s1 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_candidate_has_max_strength() {
        let names = candidates(&["r1", "r2", "r3"]);
        let verdicts = vec![
            Verdict::new("j", "r1", "r2", VerdictOutcome::StrongWinA),
            Verdict::new("j", "r1", "r3", VerdictOutcome::StrongWinA),
            Verdict::new("j", "r2", "r3", VerdictOutcome::Tie),
        ];
        let outcome = BradleyTerryAggregator::default().score(&verdicts, &names);
        let s1 = outcome.scores.score_of("r1").unwrap();
        assert!(s1 > outcome.scores.score_of("r2").unwrap());
        assert!(s1 > outcome.scores.score_of("r3").unwrap());
    }

    #[test]
    fn test_determinism_within_tolerance() {
        let names = candidates(&["r1", "r2", "r3"]);
        let verdicts = vec![
            Verdict::new("j1", "r1", "r2", VerdictOutcome::WinA),
            Verdict::new("j1", "r1", "r3", VerdictOutcome::WinB),
            Verdict::new("j2", "r2", "r3", VerdictOutcome::StrongWinA),
        ];
        let a = BradleyTerryAggregator::default().score(&verdicts, &names);
        let b = BradleyTerryAggregator::default().score(&verdicts, &names);
        for name in &names {
            let sa = a.scores.score_of(name).unwrap();
            let sb = b.scores.score_of(name).unwrap();
            assert!((sa - sb).abs() / sa < 1e-6);
        }
    }

    #[test]
    fn test_uncontested_candidate_flagged() {
        let names = candidates(&["r1", "r2", "r3"]);
        let verdicts = vec![Verdict::new("j", "r1", "r2", VerdictOutcome::WinA)];
        let outcome = BradleyTerryAggregator::default().score(&verdicts, &names);
        assert_eq!(outcome.uncontested, vec!["r3".to_string()]);
        // r3 still appears in the score map, at the mean of the others.
        let s3 = outcome.scores.score_of("r3").unwrap();
        let s1 = outcome.scores.score_of("r1").unwrap();
        let s2 = outcome.scores.score_of("r2").unwrap();
        assert!((s3 - (s1 + s2) / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_mean_normalization() {
        let names = candidates(&["r1", "r2"]);
        let verdicts = vec![
            Verdict::new("j", "r1", "r2", VerdictOutcome::WinA),
            Verdict::new("j", "r1", "r2", VerdictOutcome::WinA),
            Verdict::new("j", "r1", "r2", VerdictOutcome::WinB),
        ];
        let outcome = BradleyTerryAggregator::default().score(&verdicts, &names);
        let product: f64 = names
            .iter()
            .map(|n| outcome.scores.score_of(n).unwrap())
            .product();
        assert!((product - 1.0).abs() < 1e-6, "product {product}");
    }

    #[test]
    fn test_symmetry_under_relabeling() {
        let names = candidates(&["r1", "r2", "r3"]);
        let verdicts = vec![
            Verdict::new("j", "r1", "r2", VerdictOutcome::WinA),
            Verdict::new("j", "r1", "r3", VerdictOutcome::StrongWinA),
            Verdict::new("j", "r2", "r3", VerdictOutcome::WinB),
        ];
        let rename = |s: &str| s.replace('r', "seat");
        let renamed: Vec<Verdict> = verdicts
            .iter()
            .map(|v| {
                Verdict::new(
                    v.judge.clone(),
                    rename(&v.candidate_a),
                    rename(&v.candidate_b),
                    v.outcome,
                )
            })
            .collect();
        let renamed_names: Vec<String> = names.iter().map(|n| rename(n)).collect();

        let original = BradleyTerryAggregator::default().score(&verdicts, &names);
        let relabeled = BradleyTerryAggregator::default().score(&renamed, &renamed_names);
        for (old, new) in names.iter().zip(&renamed_names) {
            let so = original.scores.score_of(old).unwrap();
            let sn = relabeled.scores.score_of(new).unwrap();
            assert!((so - sn).abs() < 1e-9);
        }
    }
}
