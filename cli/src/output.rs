//! Console rendering of a finished deliberation.

use colored::Colorize;
use council_domain::{CouncilOutput, OutputMode};

/// Print the deliberation report: perspectives, ranking tables, synthesis.
pub fn print_report(output: &CouncilOutput, mode: OutputMode) {
    println!();
    println!("{}", "=".repeat(64));
    println!("{}", "COUNCIL DELIBERATION".bold());
    println!("{}", "=".repeat(64));
    println!();
    println!("{} {}", "Task:".bold(), output.task);

    if mode != OutputMode::Synthesis {
        print_perspectives(output);
    }

    print_rankings(output);

    if let Some(synthesis) = &output.synthesis {
        println!();
        println!("{}", "-".repeat(64));
        println!("{}", "SYNTHESIS".bold());
        println!("{}", "-".repeat(64));
        println!("{synthesis}");
    }

    print_metadata(output);
}

fn print_perspectives(output: &CouncilOutput) {
    println!();
    println!("{}", "-".repeat(64));
    println!("{}", "PERSPECTIVES".bold());
    println!("{}", "-".repeat(64));

    for answer in &output.results {
        println!();
        if answer.success {
            println!(
                "{} {} ({}, {} ms{})",
                "●".green(),
                answer.role.bold(),
                answer.model,
                answer.latency_ms,
                answer
                    .tokens_used
                    .map(|t| format!(", {t} tokens"))
                    .unwrap_or_default(),
            );
            println!("{}", answer.content);
        } else {
            println!(
                "{} {} ({}) {}",
                "○".red(),
                answer.role.bold(),
                answer.model,
                format!("failed: {}", answer.error.as_deref().unwrap_or("unknown")).red(),
            );
        }
    }
}

fn print_rankings(output: &CouncilOutput) {
    if output.aggregation_scores.is_empty() {
        return;
    }

    let candidates: Vec<String> = output
        .successful_answers()
        .map(|a| a.role.clone())
        .collect();

    println!();
    println!("{}", "-".repeat(64));
    println!("{}", "RANKINGS".bold());
    println!("{}", "-".repeat(64));

    for (method, scores) in &output.aggregation_scores {
        let marker = if *method == output.metadata.primary_method {
            "*"
        } else {
            " "
        };
        println!();
        println!("{marker} {}", method.bold());
        for (rank, (role, score)) in scores.ranked(&candidates).iter().enumerate() {
            let interval = scores
                .confidence_intervals
                .as_ref()
                .and_then(|ci| ci.get(role))
                .map(|(low, high)| format!("  95% CI [{low:.1}, {high:.1}]"))
                .unwrap_or_default();
            println!("  {}. {role}  {score:.3}{interval}", rank + 1);
        }
    }

    if !output.metadata.uncontested.is_empty() {
        println!();
        println!(
            "{}",
            format!(
                "note: no contested verdicts for {}; Bradley-Terry used the mean of the others",
                output.metadata.uncontested.join(", ")
            )
            .yellow()
        );
    }
}

fn print_metadata(output: &CouncilOutput) {
    let meta = &output.metadata;
    println!();
    println!(
        "{}",
        format!(
            "{} answers ({} failed), {}/{} judgments parsed ({} unparseable, {} failed), {:.1}s total{}",
            meta.successful_answers,
            meta.failed_answers,
            meta.verdicts,
            meta.expected_judgments,
            meta.unparseable_verdicts,
            meta.failed_judgments,
            meta.duration_ms as f64 / 1000.0,
            if meta.cancelled { ", cancelled early" } else { "" },
        )
        .dimmed()
    );
}
