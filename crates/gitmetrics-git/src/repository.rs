//! Git repository wrapper.

use crate::commit;
use chrono::{DateTime, FixedOffset};
use git2::{BranchType, ErrorCode, ObjectType, Oid, Repository, Sort};
use gitmetrics_core::source::{HistorySource, TreeSource};
use gitmetrics_core::{BranchRef, Error, LoggedCommit, ObjectId, ResolvedCommit, Result, TreeEntry};
use std::path::Path;
use tracing::{debug, warn};

/// Wrapper around a git repository.
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open the git repository at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::open(path).map_err(|_| {
            Error::NotFound(format!(
                "Could not find a valid git repository at \"{}\"",
                path.display()
            ))
        })?;
        debug!("Opened git repository at {}", repo.path().display());

        Ok(Self { repo })
    }

    /// Walk the commits reachable from `head`, newest commit time first.
    fn walk<F>(&self, head: &ObjectId, mut visit: F) -> Result<()>
    where
        F: FnMut(git2::Commit) -> Result<bool>,
    {
        let walk_error = |e: git2::Error| {
            Error::Query(format!("could not walk history from {}: {}", head.short(), e.message()))
        };

        let mut revwalk = self.repo.revwalk().map_err(walk_error)?;
        revwalk.push(parse_oid(head)?).map_err(walk_error)?;
        revwalk.set_sorting(Sort::TIME).map_err(walk_error)?;

        for oid_result in revwalk {
            let oid = oid_result.map_err(walk_error)?;
            let commit = self.repo.find_commit(oid).map_err(walk_error)?;
            if !visit(commit)? {
                break;
            }
        }

        Ok(())
    }
}

impl HistorySource for GitRepository {
    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        let branch = match self.repo.find_branch(name, BranchType::Local) {
            Ok(branch) => branch,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) if e.code() == ErrorCode::InvalidSpec => {
                return Err(Error::Parse(format!("\"{}\" is not a valid branch name", name)))
            }
            Err(e) => {
                return Err(Error::Query(format!(
                    "could not look up branch \"{}\": {}",
                    name,
                    e.message()
                )))
            }
        };

        let head = branch.get().peel_to_commit().map_err(|e| {
            Error::NotFound(format!("branch \"{}\" has no commit: {}", name, e.message()))
        })?;
        Ok(Some(BranchRef {
            name: name.to_string(),
            head: ObjectId::new(head.id().to_string()),
        }))
    }

    fn find_commit(&self, reference: &str) -> Result<Option<ResolvedCommit>> {
        let object = match self.repo.revparse_single(reference) {
            Ok(object) => object,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) if e.code() == ErrorCode::Ambiguous => {
                return Err(Error::NotFound(format!(
                    "\"{}\" is ambiguous: {}",
                    reference,
                    e.message()
                )))
            }
            Err(e) => {
                return Err(Error::Parse(format!(
                    "\"{}\" is not a valid commit reference: {}",
                    reference,
                    e.message()
                )))
            }
        };

        match object.peel_to_commit() {
            Ok(found) => Ok(Some(commit::resolved(&found)?)),
            Err(_) => Ok(None),
        }
    }

    fn commit_at(
        &self,
        branch: &BranchRef,
        until: DateTime<FixedOffset>,
    ) -> Result<Option<ResolvedCommit>> {
        let mut found = None;
        self.walk(&branch.head, |c| {
            let resolved = commit::resolved(&c)?;
            if resolved.time <= until {
                found = Some(resolved);
                return Ok(false);
            }
            Ok(true)
        })?;
        Ok(found)
    }

    fn log_window(
        &self,
        branch: &BranchRef,
        since: DateTime<FixedOffset>,
        until: DateTime<FixedOffset>,
    ) -> Result<Vec<LoggedCommit>> {
        let mut logged = Vec::new();
        let mut window_end = WindowEnd::new(since);
        self.walk(&branch.head, |c| {
            let time = commit::commit_time(&c)?;
            if window_end.passed(time) {
                return Ok(false);
            }
            if c.parent_count() > 1 {
                return Ok(true);
            }
            if time > since && time <= until {
                logged.push(commit::logged(&self.repo, &c)?);
            }
            Ok(true)
        })?;

        debug!(
            "{} commit(s) on {} in ({}, {}]",
            logged.len(),
            branch.name,
            since.to_rfc3339(),
            until.to_rfc3339()
        );
        Ok(logged)
    }
}

impl TreeSource for GitRepository {
    fn root_tree(&self, commit: &ObjectId) -> Result<ObjectId> {
        let found = self
            .repo
            .find_commit(parse_oid(commit)?)
            .map_err(|_| Error::NotFound(format!("commit {} not found", commit)))?;
        Ok(ObjectId::new(found.tree_id().to_string()))
    }

    fn list_tree(&self, tree: &ObjectId) -> Result<Vec<TreeEntry>> {
        let found = self
            .repo
            .find_tree(parse_oid(tree)?)
            .map_err(|_| Error::NotFound(format!("tree {} not found", tree)))?;

        let mut entries = Vec::with_capacity(found.len());
        for entry in found.iter() {
            let name = String::from_utf8_lossy(entry.name_bytes()).into_owned();
            let id = ObjectId::new(entry.id().to_string());
            match entry.kind() {
                Some(ObjectType::Blob) => entries.push(TreeEntry::blob(name, id)),
                Some(ObjectType::Tree) => entries.push(TreeEntry::tree(name, id)),
                _ => warn!("Skipping {} in tree {} (not a file or directory)", name, tree.short()),
            }
        }
        Ok(entries)
    }

    fn read_blob(&self, blob: &ObjectId) -> Result<Vec<u8>> {
        let found = self
            .repo
            .find_blob(parse_oid(blob)?)
            .map_err(|_| Error::NotFound(format!("blob {} not found", blob)))?;
        Ok(found.content().to_vec())
    }
}

/// Commits in a row older than a log window before the walk gives up on it.
///
/// The walk is sorted by commit time, but clock skew can put an older commit
/// ahead of a newer one.
const WINDOW_SLOP: usize = 5;

/// Notices when a newest-first walk has left a log window behind.
struct WindowEnd {
    since: DateTime<FixedOffset>,
    older: usize,
}

impl WindowEnd {
    fn new(since: DateTime<FixedOffset>) -> Self {
        Self { since, older: 0 }
    }

    /// Record the next commit time; true once [`WINDOW_SLOP`] commits in a
    /// row predate the window.
    fn passed(&mut self, time: DateTime<FixedOffset>) -> bool {
        if time <= self.since {
            self.older += 1;
        } else {
            self.older = 0;
        }
        self.older >= WINDOW_SLOP
    }
}

fn parse_oid(id: &ObjectId) -> Result<Oid> {
    Oid::from_str(id.as_str()).map_err(|_| Error::Parse(format!("invalid object id \"{}\"", id)))
}

/// Version of the linked libgit2.
///
/// Fails with [`Error::Execution`] if the library reports no version.
pub fn libgit2_version() -> Result<String> {
    match git2::Version::get().libgit2_version() {
        (0, 0, 0) => Err(Error::Execution("libgit2 is not available".to_string())),
        (major, minor, rev) => Ok(format!("{}.{}.{}", major, minor, rev)),
    }
}
