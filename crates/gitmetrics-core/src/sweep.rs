//! Commit-to-commit similarity, single and swept over time.

use crate::corpus::{extract, FileFilter};
use crate::dates::{check_range, date_range, format_day};
use crate::progress::Progress;
use crate::similarity::{Scorer, Similarity};
use crate::source::{recent_commit, HistorySource, TreeSource};
use crate::{BranchRef, ObjectId, Result};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::debug;

/// One comparison of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimilarityRow {
    /// Commit in effect at the anchor
    pub start_commit: ObjectId,
    /// Commit in effect at the compared day
    pub end_commit: ObjectId,
    /// Anchor day, `YYYY-MM-DD`
    pub start_date: String,
    /// Compared day, `YYYY-MM-DD`
    pub end_date: String,
    /// Similarity index
    pub similarity: Similarity,
}

/// Similarity of the filtered snapshots of two commits.
pub fn compare<R: TreeSource + ?Sized>(
    repo: &R,
    scorer: &dyn Scorer,
    start: &ObjectId,
    end: &ObjectId,
    filter: &FileFilter,
) -> Result<Similarity> {
    let start_corpus = extract(repo, start, filter)?;
    let end_corpus = extract(repo, end, filter)?;
    debug!(
        "Comparing {} ({} file(s)) with {} ({} file(s)) using {}",
        start.short(),
        start_corpus.files.len(),
        end.short(),
        end_corpus.files.len(),
        scorer.name()
    );
    scorer.score(start_corpus.as_str(), end_corpus.as_str())
}

/// Compare the branch snapshot at each anchor with the snapshot at every
/// day from that anchor through `end`.
///
/// Anchors are processed in the order given; days within an anchor in
/// chronological order. Fails with [`crate::Error::InvalidRange`] before
/// any comparison if an anchor lies after `end`.
pub fn sweep<R>(
    repo: &R,
    scorer: &dyn Scorer,
    branch: &BranchRef,
    anchors: &[DateTime<FixedOffset>],
    end: DateTime<FixedOffset>,
    filter: &FileFilter,
    progress: &mut dyn Progress,
) -> Result<Vec<SimilarityRow>>
where
    R: HistorySource + TreeSource + ?Sized,
{
    for anchor in anchors {
        check_range(*anchor, end)?;
    }

    let total: usize = anchors.iter().map(|a| date_range(*a, end).len()).sum();
    progress.start("Comparing snapshots", total as u64);

    let mut rows = Vec::with_capacity(total);
    for anchor in anchors {
        let start_commit = recent_commit(repo, branch, *anchor)?;
        let start_corpus = extract(repo, &start_commit.id, filter)?;
        debug!(
            "Anchor {} at {} ({} file(s))",
            format_day(anchor),
            start_commit.id.short(),
            start_corpus.files.len()
        );

        for day in date_range(*anchor, end) {
            let end_commit = recent_commit(repo, branch, day)?;
            let similarity = if end_commit.id == start_commit.id {
                scorer.score(start_corpus.as_str(), start_corpus.as_str())?
            } else {
                let end_corpus = extract(repo, &end_commit.id, filter)?;
                scorer.score(start_corpus.as_str(), end_corpus.as_str())?
            };

            rows.push(SimilarityRow {
                start_commit: start_commit.id.clone(),
                end_commit: end_commit.id,
                start_date: format_day(anchor),
                end_date: format_day(&day),
                similarity,
            });
            progress.advance(&day);
        }
    }
    progress.finish();

    Ok(rows)
}
