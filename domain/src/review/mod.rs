//! Peer-review primitives: verdicts, the verdict protocol parser, and
//! anonymization labels.

pub mod labels;
pub mod verdict;

pub use labels::LabelAssignment;
pub use verdict::{Verdict, VerdictOutcome, parse_verdict};

/// Enumerate the unordered candidate pairs `(i, l)` with `i < l` in index
/// order. Every judge compares every pair exactly once, so one run issues
/// `judges * count * (count - 1) / 2` review calls.
pub fn enumerate_pairs(count: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(count.saturating_sub(1) * count / 2);
    for i in 0..count {
        for l in (i + 1)..count {
            pairs.push((i, l));
        }
    }
    pairs
}
