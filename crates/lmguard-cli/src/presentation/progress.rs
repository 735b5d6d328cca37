//! Download progress bar.

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use lmguard_core::ProgressCallback;

/// Percent-based progress bar driven by the guard's download callback.
///
/// Hidden until the first event arrives, so initializations that need no
/// download print nothing.
#[derive(Clone)]
pub struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    pub fn new() -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} Downloading model [{bar:40.cyan/blue}] {pos:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        Self { bar }
    }

    /// Callback to hand to `InitOptions::with_download_progress`.
    pub fn callback(&self) -> ProgressCallback {
        let bar = self.bar.clone();
        Arc::new(move |percent: f64| {
            if bar.is_hidden() {
                bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            }
            // Percentages arrive clamped to 0..=100.
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            bar.set_position(percent.round() as u64);
        })
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clear the bar if it was ever shown.
    pub fn finish(&self) {
        if !self.bar.is_hidden() {
            self.bar.finish_and_clear();
        }
    }
}

impl Default for DownloadBar {
    fn default() -> Self {
        Self::new()
    }
}
