//! Generation stage: one provider call per role, in parallel.

use crate::ports::progress::ProgressNotifier;
use crate::ports::provider::{CompletionRequest, LlmProvider, ProviderError};
use council_domain::{Answer, Phase, PromptTemplate, Role, Task};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Run the generation stage.
///
/// Returns exactly one answer per role, preserving the input role order
/// regardless of completion order. Individual failures (including
/// cancellation of an in-flight call) become failure stubs; the stage
/// itself never fails.
pub(super) async fn run_generation(
    provider: &Arc<dyn LlmProvider>,
    task: &Task,
    roles: &[Role],
    token: &CancellationToken,
    progress: &dyn ProgressNotifier,
) -> Vec<Answer> {
    progress.on_phase_start(&Phase::Generation, roles.len());

    let mut join_set = JoinSet::new();
    for (idx, role) in roles.iter().enumerate() {
        let provider = Arc::clone(provider);
        let role = role.clone();
        let token = token.clone();
        let user = PromptTemplate::generation(task.text());

        join_set.spawn(async move {
            let started = Instant::now();
            let request = CompletionRequest::new(role.model.clone(), user)
                .with_system(role.system_prompt.clone())
                .with_sampling(role.sampling.clone());

            let result = tokio::select! {
                biased;
                _ = token.cancelled() => Err(ProviderError::Cancelled),
                result = provider.complete(request) => result,
            };

            let elapsed_ms = started.elapsed().as_millis() as u64;
            let answer = match result {
                Ok(completion) if completion.text.trim().is_empty() => {
                    Answer::failure(role.name, role.model, "empty response")
                        .with_latency(elapsed_ms)
                }
                Ok(completion) => {
                    let mut answer = Answer::success(role.name, role.model, completion.text)
                        .with_latency(elapsed_ms);
                    if let Some(tokens) = completion.tokens_used {
                        answer = answer.with_tokens(tokens);
                    }
                    answer
                }
                Err(e) => {
                    Answer::failure(role.name, role.model, e.to_string()).with_latency(elapsed_ms)
                }
            };
            (idx, answer)
        });
    }

    let mut slots: Vec<Option<Answer>> = roles.iter().map(|_| None).collect();
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok((idx, answer)) => {
                if answer.success {
                    info!("Role {} answered successfully", answer.role);
                } else {
                    warn!(
                        "Role {} failed: {}",
                        answer.role,
                        answer.error.as_deref().unwrap_or("unknown")
                    );
                }
                progress.on_generation_complete(&answer.role, answer.success);
                slots[idx] = Some(answer);
            }
            Err(e) => warn!("Generation task join error: {}", e),
        }
    }

    let answers = slots
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.unwrap_or_else(|| {
                Answer::failure(
                    roles[idx].name.clone(),
                    roles[idx].model.clone(),
                    "task aborted",
                )
            })
        })
        .collect();

    progress.on_phase_complete(&Phase::Generation);
    answers
}
