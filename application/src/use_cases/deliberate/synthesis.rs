//! Synthesis stage: one chairman call over the full deliberation.

use crate::ports::progress::ProgressNotifier;
use crate::ports::provider::{CompletionRequest, LlmProvider, ProviderError};
use council_domain::{ModelId, Phase, PromptTemplate, SamplingParams, Task};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Run the synthesis stage.
///
/// `answers` are `(label, content)` pairs using the same label assignment
/// as peer review; `digest` is the compact ranking summary. A failed or
/// empty chairman reply simply leaves the synthesis absent.
pub(super) async fn run_synthesis(
    provider: &Arc<dyn LlmProvider>,
    task: &Task,
    chairman: &ModelId,
    answers: &[(String, String)],
    digest: &str,
    token: &CancellationToken,
    progress: &dyn ProgressNotifier,
) -> Option<String> {
    progress.on_phase_start(&Phase::Synthesis, 1);

    let prompt = PromptTemplate::synthesis(task.text(), answers, digest);
    let request = CompletionRequest::new(chairman.clone(), prompt)
        .with_system(PromptTemplate::synthesis_system())
        .with_sampling(SamplingParams::for_synthesis());

    let result = tokio::select! {
        biased;
        _ = token.cancelled() => Err(ProviderError::Cancelled),
        result = provider.complete(request) => result,
    };

    let synthesis = match result {
        Ok(completion) if !completion.text.trim().is_empty() => Some(completion.text),
        Ok(_) => {
            warn!("Chairman {} returned an empty synthesis", chairman);
            None
        }
        Err(e) => {
            if !e.is_cancelled() {
                warn!("Synthesis by {} failed: {}", chairman, e);
            }
            None
        }
    };

    progress.on_synthesis_complete(synthesis.is_some());
    progress.on_phase_complete(&Phase::Synthesis);
    synthesis
}
