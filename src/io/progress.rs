//! Batch progress display for multi-dataset runs

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] {{prefix}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks completed and failed items of a batch
///
/// Counting happens even when the bar is hidden, so callers can summarize a quiet run.
pub struct ProgressManager {
    bar: ProgressBar,
    succeeded: usize,
    failed: usize,
}

impl ProgressManager {
    /// Create a visible progress bar for `total` items
    pub fn new(prefix: &'static str, total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(BATCH_STYLE.clone());
        bar.set_prefix(prefix);
        Self {
            bar,
            succeeded: 0,
            failed: 0,
        }
    }

    /// Create a manager that never draws
    pub fn hidden(total: usize) -> Self {
        let manager = Self::new("", total);
        manager.bar.set_draw_target(ProgressDrawTarget::hidden());
        manager
    }

    /// Show the item currently being processed
    pub fn start_item(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    /// Record an item that finished successfully
    pub fn complete_item(&mut self) {
        self.succeeded += 1;
        self.bar.inc(1);
    }

    /// Record an item that was skipped or failed
    pub fn fail_item(&mut self) {
        self.failed += 1;
        self.bar.inc(1);
    }

    /// Items completed successfully
    pub const fn succeeded(&self) -> usize {
        self.succeeded
    }

    /// Items skipped or failed
    pub const fn failed(&self) -> usize {
        self.failed
    }

    /// Items handled so far
    pub const fn processed(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
