//! Day-by-day commit activity.

use crate::dates::{check_range, date_range, format_day};
use crate::progress::Progress;
use crate::source::HistorySource;
use crate::{BranchRef, Error, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::HashSet;
use std::ops::AddAssign;
use tracing::debug;

/// Activity of one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityRow {
    /// Day, `YYYY-MM-DD`
    pub date: String,
    /// Non-merge commits in the day
    pub n_commits: usize,
    /// Distinct authors of those commits
    pub n_authors: usize,
    /// Lines inserted
    pub n_insertions: usize,
    /// Lines deleted
    pub n_deletions: usize,
}

/// Counters of a short-stat line such as
/// `3 files changed, 10 insertions(+), 4 deletions(-)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortStat {
    /// Files changed
    pub files_changed: usize,
    /// Lines inserted
    pub insertions: usize,
    /// Lines deleted
    pub deletions: usize,
}

impl ShortStat {
    /// Parse one short-stat line.
    ///
    /// Each comma-separated segment is classified by keyword: "changed"
    /// counts files, "insert" counts insertions, anything else deletions.
    pub fn parse(line: &str) -> Result<Self> {
        let mut stat = ShortStat::default();
        for segment in line.split(',') {
            let value = parse_count(segment)
                .ok_or_else(|| Error::Parse(format!("no count in short-stat \"{}\"", line.trim())))?;
            if segment.contains("changed") {
                stat.files_changed += value;
            } else if segment.contains("insert") {
                stat.insertions += value;
            } else {
                stat.deletions += value;
            }
        }
        Ok(stat)
    }
}

impl AddAssign for ShortStat {
    fn add_assign(&mut self, other: Self) {
        self.files_changed += other.files_changed;
        self.insertions += other.insertions;
        self.deletions += other.deletions;
    }
}

/// Digits of `segment` read as one number, ignoring everything else.
fn parse_count(segment: &str) -> Option<usize> {
    let digits: String = segment.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Sum the counters of several short-stat lines.
pub fn summarize<'a, I>(lines: I) -> Result<ShortStat>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = ShortStat::default();
    for line in lines {
        total += ShortStat::parse(line)?;
    }
    Ok(total)
}

/// One row per day boundary after `start`, up to and including `end`.
///
/// Each row covers the half-open window `(previous boundary, boundary]` and
/// is dated by its closing boundary, so `2024-01-01..2024-01-03` yields rows
/// for the 2nd and the 3rd.
pub fn aggregate<H: HistorySource + ?Sized>(
    history: &H,
    branch: &BranchRef,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
    progress: &mut dyn Progress,
) -> Result<Vec<ActivityRow>> {
    check_range(start, end)?;
    let boundaries = date_range(start, end);

    progress.start("Compiling git activity", boundaries.len().saturating_sub(1) as u64);
    let mut rows = Vec::with_capacity(boundaries.len());
    for window in boundaries.windows(2) {
        let (since, until) = (window[0], window[1]);
        let commits = history.log_window(branch, since, until)?;

        let stat = summarize(commits.iter().filter_map(|c| c.shortstat.as_deref()))?;
        let ids: HashSet<_> = commits.iter().map(|c| &c.id).collect();
        let authors: HashSet<_> = commits.iter().map(|c| c.author.as_str()).collect();

        let row = ActivityRow {
            date: format_day(&until),
            n_commits: ids.len(),
            n_authors: authors.len(),
            n_insertions: stat.insertions,
            n_deletions: stat.deletions,
        };
        debug!(
            "{}: {} commit(s), {} file(s) changed",
            row.date, row.n_commits, stat.files_changed
        );
        rows.push(row);
        progress.advance(&until);
    }
    progress.finish();

    Ok(rows)
}
