//! Repository access abstraction layer.
//!
//! This module provides the capability traits the core computes against.
//! The git adapter crate implements them with libgit2; tests use an
//! in-memory repository.

mod traits;

pub use traits::{recent_commit, resolve_branch, resolve_commit, HistorySource, TreeSource};
