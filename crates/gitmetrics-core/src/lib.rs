//! gitmetrics Core Library
//!
//! Corpus extraction, similarity scoring and activity aggregation over a
//! git repository reached through the [`source`] traits.

pub mod activity;
pub mod corpus;
pub mod dates;
pub mod error;
pub mod model;
pub mod object_id;
pub mod progress;
pub mod report;
pub mod similarity;
pub mod source;
pub mod sweep;

#[cfg(test)]
pub mod testutils;

pub use activity::{aggregate, ActivityRow, ShortStat};
pub use corpus::{extract, Corpus, FileFilter, DEFAULT_EXTENSIONS};
pub use error::{Error, Result};
pub use model::{author_identity, BranchRef, EntryKind, LoggedCommit, ResolvedCommit, TreeEntry};
pub use object_id::ObjectId;
pub use progress::{NoProgress, Progress};
pub use similarity::{score, LcsRatio, RatcliffObershelp, Scorer, ScorerKind, Similarity};
pub use sweep::{compare, sweep, SimilarityRow};
