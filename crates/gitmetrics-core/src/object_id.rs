//! Object identifiers for commits, trees and blobs.

use serde::Serialize;
use std::fmt;

/// Hex name of a git object (commit, tree or blob).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ObjectId(String);

impl ObjectId {
    /// Wrap a hex object name.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Get the full hex name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the abbreviated name (7 characters).
    pub fn short(&self) -> &str {
        &self.0[..7.min(self.0.len())]
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.short())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
