//! Prompt templates for the deliberation flow.

use crate::aggregation::AggregationScores;
use crate::review::LabelAssignment;
use std::collections::BTreeMap;

/// Templates for the prompts sent at each stage.
pub struct PromptTemplate;

impl PromptTemplate {
    /// User prompt for the generation stage.
    ///
    /// The role's own system prompt carries its perspective; when that is
    /// empty, the seat's identity is the model alone.
    pub fn generation(task: &str) -> String {
        format!(
            "Task: {task}\n\nBe parsimonious in your response. Focus on key points without unnecessary elaboration."
        )
    }

    /// User prompt for one pairwise judgment.
    ///
    /// The verdict tokens always use the literal letters A and B for the
    /// first and second response shown; `label_a` / `label_b` only identify
    /// which (possibly anonymized) answers those are.
    pub fn pairwise_review(
        task: &str,
        label_a: &str,
        content_a: &str,
        label_b: &str,
        content_b: &str,
    ) -> String {
        format!(
            r#"You are evaluating responses to the task: "{task}"

Below are two responses to compare. In the verdict tokens, A refers to Response {label_a} (shown first) and B refers to Response {label_b} (shown second).

--- Response {label_a} ---
{content_a}

--- Response {label_b} ---
{content_b}

Compare these responses based on:
- Accuracy and correctness
- Clarity and coherence
- Completeness of the answer
- Insightfulness and depth

First, briefly explain what each response does well and what it does poorly. Then conclude with your verdict using EXACTLY one of these tokens:
- [[A>>B]]: the first response is significantly better
- [[A>B]]: the first response is slightly better
- [[A=B]]: both responses are equally good
- [[B>A]]: the second response is slightly better
- [[B>>A]]: the second response is significantly better

Only the last token in your reply counts.

Example format:
Response {label_a} covers the key constraint but misses an edge case...
Response {label_b} is accurate but lacks depth...
[[A>B]]

Now provide your evaluation:"#
        )
    }

    /// System prompt for the chairman synthesis call.
    pub fn synthesis_system() -> &'static str {
        r#"You are the chairman of a council of language models. Several models have independently answered a question and then ranked each other's answers through pairwise comparison. Your task is to synthesize everything into a single, comprehensive, accurate answer. Consider:
- The individual responses and their insights
- The peer rankings and what they reveal about response quality
- Any patterns of agreement or disagreement

Be balanced and objective. Give weight to well-reasoned arguments regardless of source."#
    }

    /// User prompt for the chairman synthesis call.
    ///
    /// `answers` are `(label, content)` pairs using the same label
    /// assignment the judges saw; `digest` is the compact ranking summary
    /// from [`PromptTemplate::ranking_digest`].
    pub fn synthesis(task: &str, answers: &[(String, String)], digest: &str) -> String {
        let mut prompt = format!("Original question: {task}\n\nCouncil responses:\n");
        for (label, content) in answers {
            prompt.push_str(&format!("\n--- Response {label} ---\n{content}\n"));
        }
        if !digest.is_empty() {
            prompt.push_str("\nPeer-review rankings:\n");
            prompt.push_str(digest);
            prompt.push('\n');
        }
        prompt.push_str(
            "\nProvide a clear, well-reasoned final answer that represents the council's collective wisdom:",
        );
        prompt
    }

    /// Compact per-method ranking tables for the synthesis prompt.
    ///
    /// Candidates appear under the same labels the judges saw. ELO rows
    /// include the 95 % interval when available.
    pub fn ranking_digest(
        scores: &BTreeMap<String, AggregationScores>,
        candidates: &[String],
        labels: &LabelAssignment,
    ) -> String {
        let mut lines = Vec::new();
        for (method, aggregation) in scores {
            let ranked = aggregation.ranked(candidates);
            if ranked.is_empty() {
                continue;
            }
            let row = ranked
                .iter()
                .map(|(role, score)| {
                    let label = labels.label_for(role).unwrap_or(role.as_str());
                    match aggregation
                        .confidence_intervals
                        .as_ref()
                        .and_then(|ci| ci.get(role))
                    {
                        Some((low, high)) => {
                            format!("{label} ({score:.1} [{low:.1}, {high:.1}])")
                        }
                        None => format!("{label} ({score:.2})"),
                    }
                })
                .collect::<Vec<_>>()
                .join(" > ");
            lines.push(format!("{method}: {row}"));
        }
        lines.join("\n")
    }
}
