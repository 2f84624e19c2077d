//! Progress observation for long-running loops.

use chrono::{DateTime, FixedOffset};

/// Receives progress from the aggregator and the similarity sweep.
///
/// All methods default to doing nothing.
pub trait Progress {
    /// The loop is about to run `total` steps.
    fn start(&mut self, _label: &str, _total: u64) {}

    /// One step, ending at `date`, is done.
    fn advance(&mut self, _date: &DateTime<FixedOffset>) {}

    /// The loop is done.
    fn finish(&mut self) {}
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {}
