//! Per-commit information: time, author and short-stat.

use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{Commit, Repository};
use gitmetrics_core::{author_identity, Error, LoggedCommit, ObjectId, ResolvedCommit, Result};

/// Commit time in the committer's offset.
pub fn commit_time(commit: &Commit) -> Result<DateTime<FixedOffset>> {
    let time = commit.time();
    FixedOffset::east_opt(time.offset_minutes() * 60)
        .and_then(|offset| offset.timestamp_opt(time.seconds(), 0).single())
        .ok_or_else(|| Error::Query(format!("commit {} has an invalid timestamp", commit.id())))
}

/// Id and time of a commit.
pub fn resolved(commit: &Commit) -> Result<ResolvedCommit> {
    Ok(ResolvedCommit {
        id: ObjectId::new(commit.id().to_string()),
        time: commit_time(commit)?,
    })
}

/// Id, author and short-stat of a commit, as a log query reports it.
pub fn logged(repo: &Repository, commit: &Commit) -> Result<LoggedCommit> {
    let author = commit.author();
    Ok(LoggedCommit {
        id: ObjectId::new(commit.id().to_string()),
        author: author_identity(
            author.name().unwrap_or("Unknown"),
            author.email().unwrap_or(""),
        ),
        shortstat: shortstat(repo, commit)?,
    })
}

/// Short-stat line of a commit against its first parent.
///
/// Renames are detected, so a moved file counts once. Returns `None` when
/// the commit changes no files.
pub fn shortstat(repo: &Repository, commit: &Commit) -> Result<Option<String>> {
    let stat_error = |e: git2::Error| Error::Query(format!("diff of {} failed: {}", commit.id(), e.message()));

    let tree = commit.tree().map_err(stat_error)?;
    let parent_tree = if commit.parent_count() > 0 {
        Some(commit.parent(0).and_then(|p| p.tree()).map_err(stat_error)?)
    } else {
        None
    };

    let mut diff = repo
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
        .map_err(stat_error)?;
    diff.find_similar(None).map_err(stat_error)?;
    let stats = diff.stats().map_err(stat_error)?;

    Ok(format_shortstat(
        stats.files_changed(),
        stats.insertions(),
        stats.deletions(),
    ))
}

/// Render counters the way `git log --shortstat` prints them.
pub fn format_shortstat(files: usize, insertions: usize, deletions: usize) -> Option<String> {
    if files == 0 {
        return None;
    }

    let plural = |n: usize| if n == 1 { "" } else { "s" };
    let mut line = format!("{} file{} changed", files, plural(files));
    if insertions > 0 || deletions == 0 {
        line.push_str(&format!(", {} insertion{}(+)", insertions, plural(insertions)));
    }
    if deletions > 0 || insertions == 0 {
        line.push_str(&format!(", {} deletion{}(-)", deletions, plural(deletions)));
    }
    Some(line)
}
