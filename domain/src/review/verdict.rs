//! Pairwise verdicts and the textual verdict protocol.
//!
//! Judges report their judgment as free text ending in one of five tokens:
//! `[[A≫B]]`, `[[A>B]]`, `[[A=B]]`, `[[B>A]]`, `[[B≫A]]`, where `A` is the
//! first response shown and `B` the second. The parser below is the sole
//! source of truth for what a judge decided.

use serde::{Deserialize, Serialize};

/// Outcome of one pairwise judgment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictOutcome {
    /// `[[A≫B]]` — the first response is significantly better
    StrongWinA,
    /// `[[A>B]]` — the first response is slightly better
    WinA,
    /// `[[A=B]]` — both responses are equally good
    Tie,
    /// `[[B>A]]` — the second response is slightly better
    WinB,
    /// `[[B≫A]]` — the second response is significantly better
    StrongWinB,
}

impl VerdictOutcome {
    /// Signed margin in `{-2, -1, 0, +1, +2}`; positive favors the first
    /// response.
    pub fn margin(&self) -> i8 {
        match self {
            VerdictOutcome::StrongWinA => 2,
            VerdictOutcome::WinA => 1,
            VerdictOutcome::Tie => 0,
            VerdictOutcome::WinB => -1,
            VerdictOutcome::StrongWinB => -2,
        }
    }

    pub fn from_margin(margin: i8) -> Option<Self> {
        match margin {
            2 => Some(VerdictOutcome::StrongWinA),
            1 => Some(VerdictOutcome::WinA),
            0 => Some(VerdictOutcome::Tie),
            -1 => Some(VerdictOutcome::WinB),
            -2 => Some(VerdictOutcome::StrongWinB),
            _ => None,
        }
    }

    /// Canonical token spelling (Unicode `≫` U+226B).
    pub fn token(&self) -> &'static str {
        match self {
            VerdictOutcome::StrongWinA => "[[A≫B]]",
            VerdictOutcome::WinA => "[[A>B]]",
            VerdictOutcome::Tie => "[[A=B]]",
            VerdictOutcome::WinB => "[[B>A]]",
            VerdictOutcome::StrongWinB => "[[B≫A]]",
        }
    }
}

/// One parsed pairwise judgment, normalized against the unordered candidate
/// pair: `outcome.margin()` is positive when it favors `candidate_a`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Role name of the judge
    pub judge: String,
    /// Role name of the first candidate shown (pair index i)
    pub candidate_a: String,
    /// Role name of the second candidate shown (pair index l, i < l)
    pub candidate_b: String,
    /// The parsed outcome
    pub outcome: VerdictOutcome,
    /// Raw judge reply, kept for diagnostics only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw: String,
}

impl Verdict {
    pub fn new(
        judge: impl Into<String>,
        candidate_a: impl Into<String>,
        candidate_b: impl Into<String>,
        outcome: VerdictOutcome,
    ) -> Self {
        Self {
            judge: judge.into(),
            candidate_a: candidate_a.into(),
            candidate_b: candidate_b.into(),
            outcome,
            raw: String::new(),
        }
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = raw.into();
        self
    }

    /// Signed margin favoring `candidate_a`.
    pub fn margin(&self) -> i8 {
        self.outcome.margin()
    }

    /// Whether this verdict involves the given candidate.
    pub fn involves(&self, role: &str) -> bool {
        self.candidate_a == role || self.candidate_b == role
    }
}

/// Token spellings accepted by the parser. `≫` (U+226B) and the ASCII
/// digraph `>>` are both recognized.
const TOKENS: [(&str, VerdictOutcome); 7] = [
    ("[[A≫B]]", VerdictOutcome::StrongWinA),
    ("[[A>>B]]", VerdictOutcome::StrongWinA),
    ("[[A>B]]", VerdictOutcome::WinA),
    ("[[A=B]]", VerdictOutcome::Tie),
    ("[[B>A]]", VerdictOutcome::WinB),
    ("[[B≫A]]", VerdictOutcome::StrongWinB),
    ("[[B>>A]]", VerdictOutcome::StrongWinB),
];

/// Extract the authoritative verdict token from a judge reply.
///
/// The last token occurrence in the reply wins, so a judge that reasons
/// through several tentative verdicts is scored on its conclusion. Returns
/// `None` when the reply contains no recognizable token (the judgment is
/// then counted as unparseable and excluded from aggregation).
pub fn parse_verdict(reply: &str) -> Option<VerdictOutcome> {
    let mut best: Option<(usize, VerdictOutcome)> = None;
    for (token, outcome) in TOKENS {
        if let Some(pos) = reply.rfind(token) {
            if best.is_none_or(|(p, _)| pos > p) {
                best = Some((pos, outcome));
            }
        }
    }
    best.map(|(_, outcome)| outcome)
}
