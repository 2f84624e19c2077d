//! Capability traits over a git repository.

use crate::{BranchRef, Error, LoggedCommit, ObjectId, ResolvedCommit, Result, TreeEntry};
use chrono::{DateTime, FixedOffset};

/// Branch, commit and log access.
pub trait HistorySource {
    /// Look up a local branch by name.
    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>>;

    /// Resolve a ref string (hash, branch, tag, `HEAD~2`, ...) to a commit.
    ///
    /// Unparsable refs fail with [`Error::Parse`]; well-formed refs that name
    /// nothing return `Ok(None)`.
    fn find_commit(&self, reference: &str) -> Result<Option<ResolvedCommit>>;

    /// Most recent commit reachable from `branch` committed at or before `until`.
    fn commit_at(
        &self,
        branch: &BranchRef,
        until: DateTime<FixedOffset>,
    ) -> Result<Option<ResolvedCommit>>;

    /// Non-merge commits reachable from `branch` committed in `(since, until]`.
    fn log_window(
        &self,
        branch: &BranchRef,
        since: DateTime<FixedOffset>,
        until: DateTime<FixedOffset>,
    ) -> Result<Vec<LoggedCommit>>;
}

/// Tree and blob access.
pub trait TreeSource {
    /// Root tree of a commit.
    fn root_tree(&self, commit: &ObjectId) -> Result<ObjectId>;

    /// Entries of a tree, in listing order.
    fn list_tree(&self, tree: &ObjectId) -> Result<Vec<TreeEntry>>;

    /// Raw contents of a blob.
    fn read_blob(&self, blob: &ObjectId) -> Result<Vec<u8>>;
}

/// Name tried when `main` is requested but absent.
const FALLBACK_NAME: &str = "master";

/// Resolve a branch by name, falling back from `main` to `master`.
pub fn resolve_branch<H: HistorySource + ?Sized>(history: &H, name: &str) -> Result<BranchRef> {
    if let Some(branch) = history.find_branch(name)? {
        return Ok(branch);
    }
    if name == "main" {
        if let Some(branch) = history.find_branch(FALLBACK_NAME)? {
            tracing::debug!("Branch \"main\" not found, using \"{}\"", FALLBACK_NAME);
            return Ok(branch);
        }
    }
    Err(Error::NotFound(format!(
        "\"{}\" does not resolve to a valid branch",
        name
    )))
}

/// Resolve a commit ref, falling back from `main` to `master`.
pub fn resolve_commit<H: HistorySource + ?Sized>(
    history: &H,
    reference: &str,
) -> Result<ResolvedCommit> {
    if let Some(commit) = history.find_commit(reference)? {
        return Ok(commit);
    }
    if reference == "main" {
        if let Some(commit) = history.find_commit(FALLBACK_NAME)? {
            tracing::debug!("Ref \"main\" not found, using \"{}\"", FALLBACK_NAME);
            return Ok(commit);
        }
    }
    Err(Error::NotFound(format!(
        "\"{}\" does not resolve to a valid commit",
        reference
    )))
}

/// Resolve the branch commit in effect at `date`.
pub fn recent_commit<H: HistorySource + ?Sized>(
    history: &H,
    branch: &BranchRef,
    date: DateTime<FixedOffset>,
) -> Result<ResolvedCommit> {
    history.commit_at(branch, date)?.ok_or_else(|| {
        Error::NotFound(format!(
            "no commits were made on \"{}\" prior to {}",
            branch.name,
            date.to_rfc3339()
        ))
    })
}
