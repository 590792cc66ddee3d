//! Peer-review stage: pairwise comparison calls and verdict parsing.

use crate::ports::progress::ProgressNotifier;
use crate::ports::provider::{CompletionRequest, LlmProvider, ProviderError};
use council_domain::{
    LabelAssignment, Phase, PromptTemplate, Role, SamplingParams, Task, Verdict, enumerate_pairs,
    parse_verdict,
};
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What the peer-review stage produced.
#[derive(Debug, Default)]
pub(super) struct ReviewStageOutcome {
    /// Parsed verdicts in canonical (judge index, pair index) order
    pub verdicts: Vec<Verdict>,
    /// Judge replies with no recognizable verdict token
    pub unparseable: usize,
    /// Judge calls that failed or were cancelled
    pub failed: usize,
    /// Number of participating judges
    pub judges: usize,
    /// Number of unordered candidate pairs
    pub pairs: usize,
}

/// Run the peer-review stage.
///
/// Issues one call per (judge, unordered candidate pair) and parses each
/// reply into a verdict. Failed calls and unparseable replies only lose
/// that one judgment. Replies are reassembled into canonical (judge index,
/// pair index) order before parsing, which is what makes the downstream
/// ELO point estimate reproducible on fixed verdicts.
pub(super) async fn run_review(
    provider: &Arc<dyn LlmProvider>,
    task: &Task,
    judges: &[Role],
    candidates: &[(String, String)],
    labels: &LabelAssignment,
    token: &CancellationToken,
    progress: &dyn ProgressNotifier,
) -> ReviewStageOutcome {
    let pairs = enumerate_pairs(candidates.len());
    let total = judges.len() * pairs.len();
    progress.on_phase_start(&Phase::Review, total);

    let mut join_set = JoinSet::new();
    for (judge_idx, judge) in judges.iter().enumerate() {
        for (pair_idx, &(a, b)) in pairs.iter().enumerate() {
            let provider = Arc::clone(provider);
            let token = token.clone();
            let model = judge.model.clone();

            let (name_a, content_a) = &candidates[a];
            let (name_b, content_b) = &candidates[b];
            let label_a = labels.label_for(name_a).unwrap_or(name_a);
            let label_b = labels.label_for(name_b).unwrap_or(name_b);
            let prompt =
                PromptTemplate::pairwise_review(task.text(), label_a, content_a, label_b, content_b);

            join_set.spawn(async move {
                let request = CompletionRequest::new(model, prompt)
                    .with_sampling(SamplingParams::for_review());
                let result = tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ProviderError::Cancelled),
                    result = provider.complete(request) => result,
                };
                (judge_idx, pair_idx, result)
            });
        }
    }

    let mut collected = Vec::with_capacity(total);
    let mut done = 0;
    while let Some(result) = join_set.join_next().await {
        done += 1;
        progress.on_review_progress(done, total);
        match result {
            Ok(entry) => collected.push(entry),
            Err(e) => warn!("Review task join error: {}", e),
        }
    }

    // Reassemble into canonical order before parsing; completion order
    // depends on scheduling and must not leak into the verdict list.
    collected.sort_by_key(|&(judge_idx, pair_idx, _)| (judge_idx, pair_idx));

    let mut outcome = ReviewStageOutcome {
        judges: judges.len(),
        pairs: pairs.len(),
        ..Default::default()
    };

    for (judge_idx, pair_idx, result) in collected {
        let judge = &judges[judge_idx].name;
        let (a, b) = pairs[pair_idx];
        match result {
            Ok(completion) => match parse_verdict(&completion.text) {
                Some(verdict) => {
                    debug!(
                        "Judge {} on ({}, {}): {:?}",
                        judge, candidates[a].0, candidates[b].0, verdict
                    );
                    outcome.verdicts.push(
                        Verdict::new(
                            judge.clone(),
                            candidates[a].0.clone(),
                            candidates[b].0.clone(),
                            verdict,
                        )
                        .with_raw(completion.text),
                    );
                }
                None => {
                    warn!("Judge {} returned no verdict token; judgment dropped", judge);
                    outcome.unparseable += 1;
                }
            },
            Err(e) => {
                if !e.is_cancelled() {
                    warn!("Judge {} call failed: {}", judge, e);
                }
                outcome.failed += 1;
            }
        }
    }

    progress.on_phase_complete(&Phase::Review);
    outcome
}
