//! Terminal progress bar.

use chrono::{DateTime, FixedOffset};
use gitmetrics_core::dates::format_day;
use gitmetrics_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};

/// [`Progress`] drawn as an indicatif bar on stderr.
#[derive(Default)]
pub struct BarProgress {
    bar: Option<ProgressBar>,
    label: String,
}

impl BarProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░  ")
}

impl Progress for BarProgress {
    fn start(&mut self, label: &str, total: u64) {
        let bar = ProgressBar::new(total);
        bar.set_style(bar_style());
        bar.set_message(label.to_string());
        self.label = label.to_string();
        self.bar = Some(bar);
    }

    fn advance(&mut self, date: &DateTime<FixedOffset>) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{} {}", self.label, format_day(date)));
            bar.inc(1);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
