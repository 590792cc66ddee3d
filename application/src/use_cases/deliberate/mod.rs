//! Deliberate use case
//!
//! Orchestrates the full deliberation pipeline: parallel generation, fan-out
//! pairwise peer review, the three rank aggregations, and the chairman
//! synthesis. Partial failures degrade stage by stage; the run only fails
//! wholesale on invalid input, zero successful answers, or cancellation
//! before two answers succeeded.

mod generation;
mod review;
mod synthesis;
mod types;

pub use types::{DeliberateError, DeliberateInput};

use crate::config::BehaviorConfig;
use crate::ports::deliberation_log::{DeliberationEvent, DeliberationLogger, NoDeliberationLogger};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider::LlmProvider;
use council_domain::{
    AggregationMethod, Aggregator, BordaAggregator, BradleyTerryAggregator, CouncilOutput,
    DeliberationMetadata, EloAggregator, LabelAssignment, PromptTemplate, Role,
};
use review::ReviewStageOutcome;
use serde_json::json;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Use case for running one council deliberation.
pub struct DeliberateUseCase {
    provider: Arc<dyn LlmProvider>,
    behavior: BehaviorConfig,
    cancellation: CancellationToken,
    logger: Arc<dyn DeliberationLogger>,
}

impl DeliberateUseCase {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            behavior: BehaviorConfig::default(),
            cancellation: CancellationToken::new(),
            logger: Arc::new(NoDeliberationLogger),
        }
    }

    pub fn with_behavior(mut self, behavior: BehaviorConfig) -> Self {
        self.behavior = behavior;
        self
    }

    /// Thread a caller-supplied cancellation token through every provider
    /// call.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn DeliberationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress.
    pub async fn execute(&self, input: DeliberateInput) -> Result<CouncilOutput, DeliberateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    pub async fn execute_with_progress(
        &self,
        input: DeliberateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilOutput, DeliberateError> {
        Self::validate(&input)?;

        // The deadline watcher cancels a child token so caller cancellation
        // and deadline expiry travel the same path into every stage.
        let token = self.cancellation.child_token();
        let deadline_watch = self.behavior.deadline.map(|deadline| {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                token.cancel();
            })
        });

        let result = self.run_pipeline(input, &token, progress).await;

        if let Some(watch) = deadline_watch {
            watch.abort();
        }
        result
    }

    async fn run_pipeline(
        &self,
        input: DeliberateInput,
        token: &CancellationToken,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilOutput, DeliberateError> {
        let started = Instant::now();
        info!(
            "Starting deliberation with {} roles on: {}",
            input.roles.len(),
            input.task
        );

        // Stage 1: Generation
        let generation_started = Instant::now();
        let answers =
            generation::run_generation(&self.provider, &input.task, &input.roles, token, progress)
                .await;
        let generation_ms = generation_started.elapsed().as_millis() as u64;

        for answer in &answers {
            self.logger.log(DeliberationEvent::new(
                "answer",
                json!({
                    "role": answer.role,
                    "model": answer.model,
                    "success": answer.success,
                    "error": answer.error,
                    "latency_ms": answer.latency_ms,
                }),
            ));
        }

        let candidates: Vec<(String, String)> = answers
            .iter()
            .filter(|a| a.success)
            .map(|a| (a.role.clone(), a.content.clone()))
            .collect();
        let candidate_names: Vec<String> = candidates.iter().map(|(n, _)| n.clone()).collect();

        if token.is_cancelled() && candidates.len() < 2 {
            return Err(DeliberateError::Cancelled);
        }
        if candidates.is_empty() {
            return Err(DeliberateError::AllRolesFailed);
        }

        let labels = LabelAssignment::assign(&candidate_names, input.options.anonymize);

        // Stage 2: Peer review
        let review_started = Instant::now();
        let mut review_outcome = ReviewStageOutcome::default();
        if input.options.review && candidates.len() >= 2 && !token.is_cancelled() {
            let judges = Self::resolve_judges(
                &input.roles,
                &candidate_names,
                input.options.reviewers.as_deref(),
            );
            review_outcome = review::run_review(
                &self.provider,
                &input.task,
                &judges,
                &candidates,
                &labels,
                token,
                progress,
            )
            .await;

            for verdict in &review_outcome.verdicts {
                self.logger.log(DeliberationEvent::new(
                    "verdict",
                    json!({
                        "judge": verdict.judge,
                        "candidate_a": verdict.candidate_a,
                        "candidate_b": verdict.candidate_b,
                        "margin": verdict.margin(),
                    }),
                ));
            }
        }
        let review_ms = review_started.elapsed().as_millis() as u64;

        // Aggregation: three independent pure functions over the canonical
        // verdict list. An aggregator that misbehaves loses only its own map.
        let mut aggregation_scores = BTreeMap::new();
        let mut uncontested = Vec::new();
        if !review_outcome.verdicts.is_empty() {
            let aggregators: [Box<dyn Aggregator>; 3] = [
                Box::new(BordaAggregator),
                Box::new(BradleyTerryAggregator::default()),
                Box::new(EloAggregator::default()),
            ];
            for aggregator in &aggregators {
                let outcome = aggregator.score(&review_outcome.verdicts, &candidate_names);
                if outcome.scores.scores.values().any(|v| !v.is_finite()) {
                    warn!(
                        "{} aggregation produced non-finite scores; dropped",
                        aggregator.method()
                    );
                    continue;
                }
                if aggregator.method() == AggregationMethod::BradleyTerry {
                    uncontested.clone_from(&outcome.uncontested);
                }
                aggregation_scores
                    .insert(aggregator.method().as_str().to_string(), outcome.scores);
            }
        }

        // Stage 3: Synthesis
        let synthesis_started = Instant::now();
        let mut synthesis = None;
        if input.options.output_mode.includes_synthesis() && !token.is_cancelled() {
            if let Some(chairman) = &input.options.chairman_model {
                let digest =
                    PromptTemplate::ranking_digest(&aggregation_scores, &candidate_names, &labels);
                let labeled: Vec<(String, String)> = candidates
                    .iter()
                    .map(|(name, content)| {
                        let label = labels.label_for(name).unwrap_or(name);
                        (label.to_string(), content.clone())
                    })
                    .collect();
                synthesis = synthesis::run_synthesis(
                    &self.provider,
                    &input.task,
                    chairman,
                    &labeled,
                    &digest,
                    token,
                    progress,
                )
                .await;

                if let Some(text) = &synthesis {
                    self.logger.log(DeliberationEvent::new(
                        "synthesis",
                        json!({ "chairman": chairman, "bytes": text.len() }),
                    ));
                }
            }
        }
        let synthesis_ms = synthesis_started.elapsed().as_millis() as u64;

        let mut output = CouncilOutput::new(input.task.text(), answers);
        output.aggregation_scores = aggregation_scores;
        output.synthesis = synthesis;
        output.metadata = DeliberationMetadata {
            duration_ms: started.elapsed().as_millis() as u64,
            generation_ms,
            review_ms,
            synthesis_ms,
            successful_answers: candidates.len(),
            failed_answers: output.results.len() - candidates.len(),
            judges: review_outcome.judges,
            candidate_pairs: review_outcome.pairs,
            expected_judgments: review_outcome.judges * review_outcome.pairs,
            verdicts: review_outcome.verdicts.len(),
            unparseable_verdicts: review_outcome.unparseable,
            failed_judgments: review_outcome.failed,
            primary_method: input.options.aggregation.as_str().to_string(),
            uncontested,
            cancelled: token.is_cancelled(),
        };

        info!(
            "Deliberation complete: {} answers, {} verdicts, synthesis {}",
            output.results.len(),
            output.metadata.verdicts,
            if output.synthesis.is_some() { "present" } else { "absent" },
        );
        Ok(output)
    }

    /// Judges default to every successful role; an explicit reviewer subset
    /// narrows that further. Self-judgment is permitted: a judge compares
    /// pairs it belongs to, mitigated by anonymization rather than by pair
    /// exclusion.
    fn resolve_judges(
        roles: &[Role],
        candidates: &[String],
        reviewers: Option<&[String]>,
    ) -> Vec<Role> {
        roles
            .iter()
            .filter(|r| candidates.contains(&r.name))
            .filter(|r| reviewers.is_none_or(|names| names.contains(&r.name)))
            .cloned()
            .collect()
    }

    fn validate(input: &DeliberateInput) -> Result<(), DeliberateError> {
        if input.roles.len() < 2 {
            return Err(DeliberateError::InvalidRequest(
                "at least two roles are required".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for role in &input.roles {
            role.validate()
                .map_err(|e| DeliberateError::InvalidRequest(e.to_string()))?;
            if !seen.insert(role.name.as_str()) {
                return Err(DeliberateError::InvalidRequest(format!(
                    "duplicate role name '{}'",
                    role.name
                )));
            }
        }
        if input.options.output_mode.includes_synthesis()
            && input.options.chairman_model.is_none()
        {
            return Err(DeliberateError::InvalidRequest(
                "chairman model is required when synthesis is requested".to_string(),
            ));
        }
        if let Some(reviewers) = &input.options.reviewers {
            for name in reviewers {
                if !input.roles.iter().any(|r| &r.name == name) {
                    return Err(DeliberateError::InvalidRequest(format!(
                        "unknown reviewer role '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::provider::{Completion, CompletionRequest, ProviderError};
    use async_trait::async_trait;
    use council_domain::{CouncilOptions, ModelId, OutputMode};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    type Handler =
        Box<dyn Fn(&CompletionRequest) -> Result<Completion, ProviderError> + Send + Sync>;

    /// Provider fake driven by a routing closure; records every request.
    struct ScriptedProvider {
        handler: Handler,
        calls: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedProvider {
        fn new(
            handler: impl Fn(&CompletionRequest) -> Result<Completion, ProviderError>
            + Send
            + Sync
            + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                handler: Box::new(handler),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<CompletionRequest> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn complete(&self, request: CompletionRequest) -> Result<Completion, ProviderError> {
            self.calls.lock().unwrap().push(request.clone());
            (self.handler)(&request)
        }
    }

    fn ok(text: &str) -> Result<Completion, ProviderError> {
        Ok(Completion {
            text: text.to_string(),
            tokens_used: Some(10),
            latency_ms: 5,
        })
    }

    fn is_review(request: &CompletionRequest) -> bool {
        request.user.starts_with("You are evaluating")
    }

    fn is_synthesis(request: &CompletionRequest) -> bool {
        request.user.starts_with("Original question:")
    }

    fn role(name: &str, model: &str) -> Role {
        Role::new(name, ModelId::new(model))
    }

    fn options() -> CouncilOptions {
        CouncilOptions::default().with_chairman(ModelId::new("chair/model"))
    }

    fn use_case(provider: &Arc<ScriptedProvider>) -> DeliberateUseCase {
        DeliberateUseCase::new(provider.clone())
    }

    // ==================== Validation ====================

    #[tokio::test]
    async fn test_rejects_single_role() {
        let provider = ScriptedProvider::new(|_| ok("hi"));
        let input = DeliberateInput::new("q", vec![role("solo", "m1")]).with_options(options());
        let err = use_case(&provider).execute(input).await.unwrap_err();
        assert!(matches!(err, DeliberateError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_rejects_duplicate_role_names() {
        let provider = ScriptedProvider::new(|_| ok("hi"));
        let input = DeliberateInput::new("q", vec![role("twin", "m1"), role("twin", "m2")])
            .with_options(options());
        let err = use_case(&provider).execute(input).await.unwrap_err();
        assert!(matches!(err, DeliberateError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_requires_chairman_for_synthesis() {
        let provider = ScriptedProvider::new(|_| ok("hi"));
        // Default output mode is "both", so a chairman is required.
        let input = DeliberateInput::new("q", vec![role("r1", "m1"), role("r2", "m2")]);
        let err = use_case(&provider).execute(input).await.unwrap_err();
        assert!(matches!(err, DeliberateError::InvalidRequest(_)));

        // Perspectives-only runs don't need one.
        let input = DeliberateInput::new("q", vec![role("r1", "m1"), role("r2", "m2")])
            .with_options(
                CouncilOptions::default().with_output_mode(OutputMode::Perspectives),
            );
        let provider2 = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("[[A=B]]")
            } else {
                ok("fine")
            }
        });
        assert!(use_case(&provider2).execute(input).await.is_ok());
        let _ = provider;
    }

    #[tokio::test]
    async fn test_rejects_unknown_reviewer() {
        let provider = ScriptedProvider::new(|_| ok("hi"));
        let input = DeliberateInput::new("q", vec![role("r1", "m1"), role("r2", "m2")])
            .with_options(options().with_reviewers(vec!["ghost".to_string()]));
        let err = use_case(&provider).execute(input).await.unwrap_err();
        assert!(matches!(err, DeliberateError::InvalidRequest(_)));
    }

    // ==================== End-to-end scenarios ====================

    /// Two roles, one judge, one decisive verdict: all three methods agree.
    #[tokio::test]
    async fn test_single_judge_strong_win() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("Response A1 is clearly stronger.\nverdict: [[A≫B]]")
            } else if is_synthesis(request) {
                ok("The council favors the first answer.")
            } else {
                ok("an answer")
            }
        });
        let input = DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2")])
            .with_options(options().with_reviewers(vec!["R1".to_string()]));

        let output = use_case(&provider).execute(input).await.unwrap();

        assert_eq!(output.results.len(), 2);
        assert_eq!(output.metadata.successful_answers, 2);
        assert_eq!(output.metadata.judges, 1);
        assert_eq!(output.metadata.candidate_pairs, 1);
        assert_eq!(output.metadata.verdicts, 1);

        let borda = &output.aggregation_scores["borda"];
        assert_eq!(borda.score_of("R1"), Some(3.0));
        assert_eq!(borda.score_of("R2"), Some(0.0));

        let bt = &output.aggregation_scores["bradley_terry"];
        assert!(bt.score_of("R1").unwrap() > bt.score_of("R2").unwrap());

        let elo = &output.aggregation_scores["elo"];
        assert!(elo.score_of("R1").unwrap() > 1000.0);
        assert!(elo.score_of("R2").unwrap() < 1000.0);
        assert!(elo.confidence_intervals.is_some());

        assert_eq!(
            output.synthesis.as_deref(),
            Some("The council favors the first answer.")
        );
    }

    /// Three roles, every judge ties every pair: all methods report equality.
    #[tokio::test]
    async fn test_all_ties_equal_scores() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("They are equivalent. [[A=B]]")
            } else if is_synthesis(request) {
                ok("No answer stood out.")
            } else {
                ok("an answer")
            }
        });
        let input =
            DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2"), role("R3", "m3")])
                .with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();
        assert_eq!(output.metadata.verdicts, 9); // 3 judges x 3 pairs

        let borda = &output.aggregation_scores["borda"];
        let first = borda.score_of("R1").unwrap();
        assert_eq!(borda.score_of("R2"), Some(first));
        assert_eq!(borda.score_of("R3"), Some(first));

        let bt = &output.aggregation_scores["bradley_terry"];
        let s1 = bt.score_of("R1").unwrap();
        assert!((bt.score_of("R2").unwrap() - s1).abs() < 1e-6);
        assert!((bt.score_of("R3").unwrap() - s1).abs() < 1e-6);

        let elo = &output.aggregation_scores["elo"];
        for name in ["R1", "R2", "R3"] {
            assert_eq!(elo.score_of(name), Some(1000.0));
        }
    }

    /// A failed generation keeps its stub in the results but is excluded
    /// from review and aggregation.
    #[tokio::test]
    async fn test_failed_generation_excluded_from_review() {
        let provider = ScriptedProvider::new(|request| {
            if request.model.as_str() == "m1" && !is_review(request) && !is_synthesis(request) {
                Err(ProviderError::Transient("connection reset".to_string()))
            } else if is_review(request) {
                ok("[[A>B]]")
            } else if is_synthesis(request) {
                ok("synthesis")
            } else {
                ok("an answer")
            }
        });
        let input =
            DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2"), role("R3", "m3")])
                .with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();

        assert_eq!(output.results.len(), 3);
        assert_eq!(output.metadata.successful_answers, 2);
        assert_eq!(output.metadata.failed_answers, 1);
        assert!(!output.results[0].success);
        assert!(
            output.results[0]
                .error
                .as_deref()
                .unwrap()
                .contains("connection reset")
        );

        // Review ran over {R2, R3} only: 2 judges x 1 pair.
        assert_eq!(output.metadata.judges, 2);
        assert_eq!(output.metadata.candidate_pairs, 1);

        for method in ["borda", "bradley_terry", "elo"] {
            let scores = &output.aggregation_scores[method];
            assert_eq!(scores.scores.len(), 2, "{method} key set");
            assert!(scores.score_of("R1").is_none());
        }
    }

    /// One judge that never emits a token loses its judgments; the rest
    /// aggregate normally.
    #[tokio::test]
    async fn test_unparseable_judge_counted() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                if request.model.as_str() == "m4" {
                    ok("I'm not sure")
                } else {
                    ok("[[A=B]]")
                }
            } else if is_synthesis(request) {
                ok("synthesis")
            } else {
                ok("an answer")
            }
        });
        let roles = vec![
            role("R1", "m1"),
            role("R2", "m2"),
            role("R3", "m3"),
            role("R4", "m4"),
        ];
        let input = DeliberateInput::new("q", roles).with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();

        assert_eq!(output.metadata.expected_judgments, 24); // 4 judges x 6 pairs
        assert_eq!(output.metadata.unparseable_verdicts, 6);
        assert_eq!(output.metadata.verdicts, 18);
        assert_eq!(output.aggregation_scores["borda"].scores.len(), 4);
    }

    /// Cancellation mid-review: the run returns with the verdicts that had
    /// arrived, and the synthesis is absent.
    #[tokio::test]
    async fn test_cancellation_mid_review() {
        let token = CancellationToken::new();
        let review_calls = Arc::new(Mutex::new(0usize));

        let handler_token = token.clone();
        let handler_calls = review_calls.clone();
        let provider = ScriptedProvider::new(move |request| {
            if is_review(request) {
                let mut calls = handler_calls.lock().unwrap();
                *calls += 1;
                if *calls >= 2 {
                    handler_token.cancel();
                    return Err(ProviderError::Cancelled);
                }
                ok("[[A>B]]")
            } else if is_synthesis(request) {
                ok("should never be reached")
            } else {
                ok("an answer")
            }
        });

        let input =
            DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2"), role("R3", "m3")])
                .with_options(options());
        let output = use_case(&provider)
            .with_cancellation(token)
            .execute(input)
            .await
            .unwrap();

        assert!(output.metadata.cancelled);
        assert!(output.synthesis.is_none());
        assert!(output.metadata.verdicts >= 1);
        assert!(output.metadata.failed_judgments >= 1);
        // Scores reflect whatever subset of verdicts arrived.
        assert!(!output.aggregation_scores.is_empty());
        assert!(!provider.requests().iter().any(is_synthesis));
    }

    /// Anonymization: judges see labels, never role names; scores are still
    /// keyed by role names.
    #[tokio::test]
    async fn test_anonymized_prompts() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("[[A≫B]]")
            } else if is_synthesis(request) {
                ok("synthesis")
            } else if request.model.as_str() == "m1" {
                ok("the alpha answer")
            } else {
                ok("the beta answer")
            }
        });
        let input = DeliberateInput::new("q", vec![role("Rone", "m1"), role("Rtwo", "m2")])
            .with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();

        let review_prompts: Vec<_> = provider
            .requests()
            .into_iter()
            .filter(is_review)
            .collect();
        assert!(!review_prompts.is_empty());
        for request in &review_prompts {
            assert!(request.user.contains("Response A1"));
            assert!(request.user.contains("Response A2"));
            assert!(!request.user.contains("Rone"));
            assert!(!request.user.contains("Rtwo"));
        }

        // The chairman also sees labels only.
        let synthesis_prompt = provider
            .requests()
            .into_iter()
            .find(is_synthesis)
            .unwrap();
        assert!(synthesis_prompt.user.contains("Response A1"));
        assert!(!synthesis_prompt.user.contains("Rone"));

        // Output is de-anonymized.
        assert!(output.aggregation_scores["borda"].score_of("Rone").is_some());
    }

    /// Role names appear in judge prompts when anonymization is off.
    #[tokio::test]
    async fn test_plain_labels_without_anonymization() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("[[A=B]]")
            } else if is_synthesis(request) {
                ok("synthesis")
            } else {
                ok("an answer")
            }
        });
        let input = DeliberateInput::new("q", vec![role("Rone", "m1"), role("Rtwo", "m2")])
            .with_options(options().without_anonymization());

        use_case(&provider).execute(input).await.unwrap();

        let review_prompt = provider.requests().into_iter().find(is_review).unwrap();
        assert!(review_prompt.user.contains("Response Rone"));
        assert!(review_prompt.user.contains("Response Rtwo"));
    }

    // ==================== Degradation ====================

    #[tokio::test]
    async fn test_empty_response_is_failure() {
        let provider = ScriptedProvider::new(|request| {
            if request.model.as_str() == "m2" {
                ok("   ")
            } else if is_review(request) || is_synthesis(request) {
                ok("[[A=B]]")
            } else {
                ok("an answer")
            }
        });
        let input =
            DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2"), role("R3", "m3")])
                .with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();
        let failed = &output.results[1];
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("empty response"));
    }

    #[tokio::test]
    async fn test_all_roles_failed() {
        let provider =
            ScriptedProvider::new(|_| Err(ProviderError::Transient("down".to_string())));
        let input = DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2")])
            .with_options(options());
        let err = use_case(&provider).execute(input).await.unwrap_err();
        assert!(matches!(err, DeliberateError::AllRolesFailed));
    }

    #[tokio::test]
    async fn test_pre_cancelled_returns_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        let provider = ScriptedProvider::new(|_| ok("never"));
        let input = DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2")])
            .with_options(options());
        let err = use_case(&provider)
            .with_cancellation(token)
            .execute(input)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[tokio::test]
    async fn test_review_disabled_skips_aggregation() {
        let provider = ScriptedProvider::new(|request| {
            if is_synthesis(request) {
                ok("synthesis")
            } else {
                ok("an answer")
            }
        });
        let input = DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2")])
            .with_options(options().without_review());

        let output = use_case(&provider).execute(input).await.unwrap();
        assert!(output.aggregation_scores.is_empty());
        assert_eq!(output.metadata.expected_judgments, 0);
        assert!(output.synthesis.is_some());
        assert!(!provider.requests().iter().any(is_review));
    }

    #[tokio::test]
    async fn test_synthesis_failure_degrades() {
        let provider = ScriptedProvider::new(|request| {
            if is_synthesis(request) {
                Err(ProviderError::Permanent {
                    status: 404,
                    message: "no such model".to_string(),
                })
            } else if is_review(request) {
                ok("[[A>B]]")
            } else {
                ok("an answer")
            }
        });
        let input = DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2")])
            .with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();
        assert!(output.synthesis.is_none());
        assert!(!output.aggregation_scores.is_empty());
    }

    #[tokio::test]
    async fn test_output_preserves_role_order() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("[[A=B]]")
            } else if is_synthesis(request) {
                ok("synthesis")
            } else {
                ok("an answer")
            }
        });
        let roles = vec![
            role("zeta", "m1"),
            role("alpha", "m2"),
            role("mid", "m3"),
        ];
        let input = DeliberateInput::new("q", roles).with_options(options());

        let output = use_case(&provider).execute(input).await.unwrap();
        let names: Vec<_> = output.results.iter().map(|a| a.role.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn test_primary_method_echoed() {
        let provider = ScriptedProvider::new(|request| {
            if is_review(request) {
                ok("[[A>B]]")
            } else if is_synthesis(request) {
                ok("synthesis")
            } else {
                ok("an answer")
            }
        });
        let input = DeliberateInput::new("q", vec![role("R1", "m1"), role("R2", "m2")])
            .with_options(options().with_primary_method(AggregationMethod::Elo));

        let output = use_case(&provider).execute(input).await.unwrap();
        assert_eq!(output.metadata.primary_method, "elo");
        assert!(output.primary_scores().is_some());
    }
}
