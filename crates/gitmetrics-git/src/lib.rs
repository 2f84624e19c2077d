//! gitmetrics Git Integration
//!
//! libgit2-backed implementation of the core repository traits: branch and
//! commit resolution, windowed log queries with short-stats, and tree/blob
//! access for corpus extraction.

pub mod commit;
pub mod repository;

pub use repository::{libgit2_version, GitRepository};
