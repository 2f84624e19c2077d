//! Repository model types shared by the extractor, the aggregator and the git adapter.

use crate::ObjectId;
use chrono::{DateTime, FixedOffset};

/// A resolved local branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRef {
    /// Short branch name (e.g. `master`)
    pub name: String,
    /// Commit the branch points at
    pub head: ObjectId,
}

/// A commit reference resolved against a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommit {
    /// Full commit id
    pub id: ObjectId,
    /// Commit time, in the committer's offset
    pub time: DateTime<FixedOffset>,
}

/// One commit returned by a windowed log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedCommit {
    /// Full commit id
    pub id: ObjectId,
    /// Author identity in "Name <email>" format
    pub author: String,
    /// Short-stat line, absent when the commit changes no files
    pub shortstat: Option<String>,
}

/// Kind of a tree entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// File contents
    Blob,
    /// Subdirectory
    Tree,
}

/// A single entry of a tree listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Entry name within its parent tree
    pub name: String,
    /// Blob or tree
    pub kind: EntryKind,
    /// Object the entry points at
    pub id: ObjectId,
}

impl TreeEntry {
    /// Create a blob entry.
    pub fn blob(name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Blob,
            id,
        }
    }

    /// Create a subtree entry.
    pub fn tree(name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Tree,
            id,
        }
    }
}

/// Format an author identity the way log queries report it.
pub fn author_identity(name: &str, email: &str) -> String {
    if email.is_empty() {
        name.to_string()
    } else {
        format!("{} <{}>", name, email)
    }
}
