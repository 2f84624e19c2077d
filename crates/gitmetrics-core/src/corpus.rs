//! Corpus extraction from commit snapshots.
//!
//! A corpus is the newline-joined text of every file in a commit's tree
//! that passes a [`FileFilter`]. Trees are walked with an explicit stack in
//! pre-order: a tree's own files come first, then each subtree in listing
//! order.

use crate::source::TreeSource;
use crate::{EntryKind, Error, ObjectId, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::path::Path;
use tracing::debug;

/// Extensions read by default. Everything else is assumed binary or generated.
pub const DEFAULT_EXTENSIONS: &[&str] = &[".md", ".html", ".js", ".css", ".txt"];

/// Which files of a snapshot take part in a corpus.
///
/// The glob is matched segment by segment, so `*` never crosses a `/`. A
/// relative glob is anchored at the end of the path: `guide.md` selects
/// `docs/guide.md`, and `docs/*` selects `docs/a.md` but not
/// `docs/sub/b.md`. A glob starting with `/` must match the whole
/// repository-relative path.
#[derive(Debug, Clone)]
pub struct FileFilter {
    pattern: String,
    matcher: GlobMatcher,
    /// Trailing path segments a relative glob is matched against
    segments: Option<usize>,
    /// Allowed extensions with leading dot; `None` allows every extension
    extensions: Option<Vec<String>>,
}

impl FileFilter {
    /// Create a filter from a glob and an optional extension allow-list.
    ///
    /// Extensions may be given with or without the leading dot.
    pub fn new(pattern: &str, extensions: Option<Vec<String>>) -> Result<Self> {
        let (anchored, body) = match pattern.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let body = body.trim_end_matches('/');
        if body.is_empty() {
            return Err(Error::Parse(format!("empty glob \"{}\"", pattern)));
        }

        let matcher = GlobBuilder::new(body)
            .literal_separator(true)
            .build()
            .map_err(|e| Error::Parse(format!("invalid glob \"{}\": {}", pattern, e)))?
            .compile_matcher();
        let segments = (!anchored).then(|| body.split('/').count());
        let extensions = extensions.map(|exts| {
            exts.into_iter()
                .map(|ext| {
                    if ext.starts_with('.') {
                        ext
                    } else {
                        format!(".{}", ext)
                    }
                })
                .collect()
        });
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
            segments,
            extensions,
        })
    }

    /// Default extensions under the given glob.
    pub fn with_glob(pattern: &str) -> Result<Self> {
        Self::new(pattern, Some(default_extensions()))
    }

    /// The glob pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Allowed extensions, or `None` when unfiltered.
    pub fn extensions(&self) -> Option<&[String]> {
        self.extensions.as_deref()
    }

    /// Check a repository-relative file path against the glob and extensions.
    pub fn matches(&self, path: &str) -> bool {
        let candidate = match self.segments {
            None => Some(path),
            Some(n) => trailing_segments(path, n),
        };
        if !candidate.map_or(false, |c| self.matcher.is_match(c)) {
            return false;
        }
        match &self.extensions {
            None => true,
            Some(allowed) => {
                let ext = Path::new(path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| format!(".{}", e));
                ext.map_or(false, |ext| allowed.iter().any(|a| *a == ext))
            }
        }
    }
}

impl Default for FileFilter {
    fn default() -> Self {
        Self::with_glob("*").expect("\"*\" is a valid glob")
    }
}

/// The last `n` segments of `path`, or `None` if it has fewer.
fn trailing_segments(path: &str, n: usize) -> Option<&str> {
    if n == 0 {
        return None;
    }
    match path.rmatch_indices('/').nth(n - 1) {
        Some((i, _)) => Some(&path[i + 1..]),
        None if path.split('/').count() == n => Some(path),
        None => None,
    }
}

/// The default extension list as owned strings.
pub fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Text of the filtered files of one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Paths of the files read, in traversal order
    pub files: Vec<String>,
    /// Non-empty file contents joined by newlines
    pub text: String,
}

impl Corpus {
    /// Corpus text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether the corpus has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Build the corpus of `commit`.
///
/// Fails with [`Error::Decode`] on the first matching file that is not valid
/// UTF-8. Files rejected by the filter are never read.
pub fn extract<T: TreeSource + ?Sized>(
    source: &T,
    commit: &ObjectId,
    filter: &FileFilter,
) -> Result<Corpus> {
    let root = source.root_tree(commit)?;
    let mut stack = vec![(root, String::new())];
    let mut files = Vec::new();
    let mut texts = Vec::new();

    while let Some((tree, prefix)) = stack.pop() {
        let mut subtrees = Vec::new();
        for entry in source.list_tree(&tree)? {
            let path = format!("{}{}", prefix, entry.name);
            match entry.kind {
                EntryKind::Tree => subtrees.push((entry.id, format!("{}/", path))),
                EntryKind::Blob => {
                    if !filter.matches(&path) {
                        continue;
                    }
                    let bytes = source.read_blob(&entry.id)?;
                    let text = String::from_utf8(bytes).map_err(|_| Error::Decode {
                        path: path.clone(),
                    })?;
                    if !text.is_empty() {
                        texts.push(text);
                    }
                    files.push(path);
                }
            }
        }
        // Reversed so the first subtree is popped next
        stack.extend(subtrees.into_iter().rev());
    }

    debug!(
        "Extracted {} file(s) from {} matching \"{}\"",
        files.len(),
        commit.short(),
        filter.pattern()
    );

    Ok(Corpus {
        files,
        text: texts.join("\n"),
    })
}
