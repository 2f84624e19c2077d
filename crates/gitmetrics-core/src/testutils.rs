//! Test utilities for gitmetrics.
//!
//! Provides an in-memory repository implementing the source traits, plus
//! date helpers.

use crate::source::{HistorySource, TreeSource};
use crate::{BranchRef, Error, LoggedCommit, ObjectId, ResolvedCommit, Result, TreeEntry};
use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Midnight UTC on the given day.
pub fn day(year: i32, month: u32, day: u32) -> DateTime<FixedOffset> {
    at(year, month, day, 0)
}

/// The given hour (UTC) on the given day.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
}

/// A zone at UTC-5 that moves to UTC-4 at 02:00 local on 2024-03-10.
#[derive(Debug, Clone, Copy)]
pub struct SpringForward;

impl SpringForward {
    fn standard() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn daylight() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn switch() -> NaiveDateTime {
        // 02:00 at UTC-5
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap().and_hms_opt(7, 0, 0).unwrap()
    }
}

impl TimeZone for SpringForward {
    type Offset = FixedOffset;

    fn from_offset(_offset: &FixedOffset) -> Self {
        SpringForward
    }

    fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
        self.offset_from_local_datetime(&local.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
        let valid: Vec<_> = [Self::standard(), Self::daylight()]
            .into_iter()
            .filter(|offset| self.offset_from_utc_datetime(&(*local - *offset)) == *offset)
            .collect();
        match valid.as_slice() {
            [] => LocalResult::None,
            [offset] => LocalResult::Single(*offset),
            [first, second, ..] => LocalResult::Ambiguous(*first, *second),
        }
    }

    fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
        self.offset_from_utc_datetime(&utc.and_hms_opt(0, 0, 0).unwrap())
    }

    fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
        if *utc < Self::switch() {
            Self::standard()
        } else {
            Self::daylight()
        }
    }
}

struct MemoryCommit {
    id: ObjectId,
    time: DateTime<FixedOffset>,
    author: String,
    parents: Vec<ObjectId>,
    tree: ObjectId,
    shortstat: Option<String>,
}

enum Node {
    File(Vec<u8>),
    Dir(BTreeMap<String, Node>),
}

/// An in-memory repository built commit by commit.
#[derive(Default)]
pub struct MemoryRepo {
    commits: Vec<MemoryCommit>,
    branches: BTreeMap<String, ObjectId>,
    trees: HashMap<ObjectId, Vec<TreeEntry>>,
    blobs: HashMap<ObjectId, Vec<u8>>,
    reads: std::cell::RefCell<Vec<ObjectId>>,
    next_object: usize,
}

impl MemoryRepo {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a commit with text files on top of `branch`.
    pub fn commit(
        self,
        id: &str,
        branch: &str,
        time: DateTime<FixedOffset>,
        author: &str,
        files: &[(&str, &str)],
    ) -> Self {
        let files = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec()))
            .collect();
        self.commit_raw(id, branch, time, author, files)
    }

    /// Add a commit with raw file contents on top of `branch`.
    pub fn commit_raw(
        mut self,
        id: &str,
        branch: &str,
        time: DateTime<FixedOffset>,
        author: &str,
        files: Vec<(String, Vec<u8>)>,
    ) -> Self {
        let mut root = BTreeMap::new();
        for (path, content) in files {
            let parts: Vec<&str> = path.split('/').collect();
            let mut dir = &mut root;
            for part in &parts[..parts.len() - 1] {
                let node = dir
                    .entry(part.to_string())
                    .or_insert_with(|| Node::Dir(BTreeMap::new()));
                dir = match node {
                    Node::Dir(children) => children,
                    Node::File(_) => panic!("{} is both a file and a directory", part),
                };
            }
            dir.insert(parts[parts.len() - 1].to_string(), Node::File(content));
        }
        let tree = self.write_tree(root);

        let parents = self.branches.get(branch).cloned().into_iter().collect();
        self.push_commit(id, branch, time, author, parents, tree)
    }

    /// Merge `other` into `branch`, keeping the tree of `branch`.
    pub fn merge(
        mut self,
        id: &str,
        branch: &str,
        other: &str,
        time: DateTime<FixedOffset>,
        author: &str,
    ) -> Self {
        let ours = self.branches[branch].clone();
        let theirs = self.branches[other].clone();
        let tree = self.find(&ours).tree.clone();
        self.push_commit(id, branch, time, author, vec![ours, theirs], tree)
    }

    /// Set the short-stat line of the most recent commit.
    pub fn with_stat(mut self, shortstat: &str) -> Self {
        if let Some(last) = self.commits.last_mut() {
            last.shortstat = Some(shortstat.to_string());
        }
        self
    }

    /// Blobs read so far, in read order.
    pub fn blob_reads(&self) -> Vec<ObjectId> {
        self.reads.borrow().clone()
    }

    fn push_commit(
        mut self,
        id: &str,
        branch: &str,
        time: DateTime<FixedOffset>,
        author: &str,
        parents: Vec<ObjectId>,
        tree: ObjectId,
    ) -> Self {
        let id = ObjectId::new(id);
        self.commits.push(MemoryCommit {
            id: id.clone(),
            time,
            author: author.to_string(),
            parents,
            tree,
            shortstat: None,
        });
        self.branches.insert(branch.to_string(), id);
        self
    }

    fn write_tree(&mut self, dir: BTreeMap<String, Node>) -> ObjectId {
        let mut entries = Vec::new();
        for (name, node) in dir {
            match node {
                Node::File(content) => {
                    let id = self.next_id("blob");
                    self.blobs.insert(id.clone(), content);
                    entries.push(TreeEntry::blob(name, id));
                }
                Node::Dir(children) => {
                    let id = self.write_tree(children);
                    entries.push(TreeEntry::tree(name, id));
                }
            }
        }
        let id = self.next_id("tree");
        self.trees.insert(id.clone(), entries);
        id
    }

    fn next_id(&mut self, prefix: &str) -> ObjectId {
        self.next_object += 1;
        ObjectId::new(format!("{}{}", prefix, self.next_object))
    }

    fn find(&self, id: &ObjectId) -> &MemoryCommit {
        self.commits
            .iter()
            .find(|c| &c.id == id)
            .expect("unknown commit")
    }

    fn reachable(&self, head: &ObjectId) -> Vec<&MemoryCommit> {
        let mut seen = HashSet::new();
        let mut stack = vec![head.clone()];
        let mut found = Vec::new();
        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let commit = self.find(&id);
            stack.extend(commit.parents.iter().cloned());
            found.push(commit);
        }
        found.sort_by(|a, b| b.time.cmp(&a.time));
        found
    }
}

impl HistorySource for MemoryRepo {
    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        Ok(self.branches.get(name).map(|head| BranchRef {
            name: name.to_string(),
            head: head.clone(),
        }))
    }

    fn find_commit(&self, reference: &str) -> Result<Option<ResolvedCommit>> {
        if reference.is_empty() || reference.contains(char::is_whitespace) {
            return Err(Error::Parse(format!("invalid ref \"{}\"", reference)));
        }
        let id = self
            .branches
            .get(reference)
            .cloned()
            .unwrap_or_else(|| ObjectId::new(reference));
        Ok(self.commits.iter().find(|c| c.id == id).map(|c| ResolvedCommit {
            id: c.id.clone(),
            time: c.time,
        }))
    }

    fn commit_at(
        &self,
        branch: &BranchRef,
        until: DateTime<FixedOffset>,
    ) -> Result<Option<ResolvedCommit>> {
        Ok(self
            .reachable(&branch.head)
            .into_iter()
            .find(|c| c.time <= until)
            .map(|c| ResolvedCommit {
                id: c.id.clone(),
                time: c.time,
            }))
    }

    fn log_window(
        &self,
        branch: &BranchRef,
        since: DateTime<FixedOffset>,
        until: DateTime<FixedOffset>,
    ) -> Result<Vec<LoggedCommit>> {
        if !self.branches.values().any(|head| head == &branch.head) {
            return Err(Error::Query(format!("unknown branch \"{}\"", branch.name)));
        }
        Ok(self
            .reachable(&branch.head)
            .into_iter()
            .filter(|c| c.parents.len() <= 1 && c.time > since && c.time <= until)
            .map(|c| LoggedCommit {
                id: c.id.clone(),
                author: c.author.clone(),
                shortstat: c.shortstat.clone(),
            })
            .collect())
    }
}

impl TreeSource for MemoryRepo {
    fn root_tree(&self, commit: &ObjectId) -> Result<ObjectId> {
        self.commits
            .iter()
            .find(|c| &c.id == commit)
            .map(|c| c.tree.clone())
            .ok_or_else(|| Error::NotFound(format!("commit {}", commit)))
    }

    fn list_tree(&self, tree: &ObjectId) -> Result<Vec<TreeEntry>> {
        self.trees
            .get(tree)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("tree {}", tree)))
    }

    fn read_blob(&self, blob: &ObjectId) -> Result<Vec<u8>> {
        self.reads.borrow_mut().push(blob.clone());
        self.blobs
            .get(blob)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("blob {}", blob)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_trees_are_listed_by_name() {
        let repo = MemoryRepo::new().commit(
            "c1",
            "master",
            day(2024, 1, 1),
            "Ada <ada@example.com>",
            &[("src/b.js", "b"), ("README.md", "hi"), ("src/a.js", "a")],
        );
        let root = repo.root_tree(&ObjectId::new("c1")).unwrap();
        let entries = repo.list_tree(&root).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "src"]);

        let src = repo.list_tree(&entries[1].id).unwrap();
        let names: Vec<_> = src.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.js", "b.js"]);
    }

    #[test]
    fn test_log_window_skips_merges() {
        let repo = MemoryRepo::new()
            .commit("c1", "master", at(2024, 1, 1, 10), "Ada <ada@example.com>", &[("a.txt", "a")])
            .commit("c2", "topic", at(2024, 1, 1, 11), "Bob <bob@example.com>", &[("b.txt", "b")])
            .merge("m1", "master", "topic", at(2024, 1, 1, 12), "Ada <ada@example.com>");
        let branch = repo.find_branch("master").unwrap().unwrap();

        let logged = repo.log_window(&branch, day(2024, 1, 1), day(2024, 1, 2)).unwrap();
        let ids: Vec<_> = logged.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1"]);
    }
}
