//! Progress reporting for window fetches.

use crate::executor::{WindowOutcome, WindowStatus};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

/// Observer notified as windows are admitted and finished.
///
/// Reporting has no effect on the scrape result.
pub trait ProgressReporter: Send + Sync {
    /// Called once a window passes the admission gate. `ordinal` is 1-based.
    fn window_admitted(&self, ordinal: usize, total: usize, url: &str);

    fn window_finished(&self, _outcome: &WindowOutcome) {}

    fn done(&self) {}
}

/// Discards all progress events.
#[derive(Debug, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn window_admitted(&self, _ordinal: usize, _total: usize, _url: &str) {}
}

/// Emits one `info` event per admitted window.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn window_admitted(&self, ordinal: usize, total: usize, url: &str) {
        info!(ordinal, total, url, "Fetching window {}/{}", ordinal, total);
    }
}

/// Terminal progress bar advanced as windows finish.
#[derive(Debug)]
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} windows ({eta}) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressReporter for BarProgress {
    fn window_admitted(&self, _ordinal: usize, total: usize, _url: &str) {
        self.bar.set_length(total as u64);
    }

    fn window_finished(&self, outcome: &WindowOutcome) {
        if let WindowStatus::Failed { .. } = outcome.status {
            self.bar.set_message(format!("last failure: window {}", outcome.ordinal));
        }
        self.bar.inc(1);
    }

    fn done(&self) {
        self.bar.finish_and_clear();
    }
}
