//! Console progress reporting for a running deliberation.

use colored::Colorize;
use council_application::ports::progress::ProgressNotifier;
use council_domain::Phase;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Reports deliberation progress with a per-phase progress bar.
pub struct ConsoleProgress {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }

    fn phase_display_name(phase: &Phase) -> &'static str {
        match phase {
            Phase::Generation => "Phase 1: Generation",
            Phase::Review => "Phase 2: Peer Review",
            Phase::Synthesis => "Phase 3: Synthesis",
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ConsoleProgress {
    fn on_phase_start(&self, phase: &Phase, total_tasks: usize) {
        let bar = self.multi.add(ProgressBar::new(total_tasks as u64));
        bar.set_style(Self::phase_style());
        bar.set_prefix(Self::phase_display_name(phase));
        bar.set_message("starting");
        *self.phase_bar.lock().unwrap() = Some(bar);
    }

    fn on_generation_complete(&self, role: &str, success: bool) {
        if let Some(bar) = self.phase_bar.lock().unwrap().as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), role)
            } else {
                format!("{} {}", "x".red(), role)
            };
            bar.set_message(status);
            bar.inc(1);
        }
    }

    fn on_review_progress(&self, done: usize, total: usize) {
        if let Some(bar) = self.phase_bar.lock().unwrap().as_ref() {
            bar.set_position(done as u64);
            bar.set_message(format!("{done}/{total} judgments"));
        }
    }

    fn on_synthesis_complete(&self, success: bool) {
        if let Some(bar) = self.phase_bar.lock().unwrap().as_ref() {
            if success {
                bar.inc(1);
            } else {
                bar.set_message(format!("{}", "synthesis failed".red()));
            }
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        if let Some(bar) = self.phase_bar.lock().unwrap().take() {
            bar.finish_with_message(format!(
                "{} complete",
                Self::phase_display_name(phase).green()
            ));
        }
    }
}
