//! Command implementations.

pub mod activity;
pub mod across;
pub mod similarity;

use anyhow::Result;
use clap::Args;
use gitmetrics_core::{FileFilter, ScorerKind};

/// File selection and comparison options shared by the similarity commands.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Glob the file paths must match
    #[arg(short, long, default_value = "*")]
    pub glob: String,

    /// File extension to include (repeatable, defaults to .md .html .js .css .txt)
    #[arg(short = 'e', long = "ext")]
    pub extensions: Vec<String>,

    /// Include every file the glob matches, whatever its extension
    #[arg(long, conflicts_with = "extensions")]
    pub all_types: bool,

    /// Comparison algorithm (lcs or ratcliff)
    #[arg(long, default_value = "lcs")]
    pub scorer: ScorerKind,
}

impl FilterArgs {
    /// Build the file filter these options describe.
    pub fn file_filter(&self) -> Result<FileFilter> {
        let extensions = if self.all_types {
            None
        } else if self.extensions.is_empty() {
            Some(gitmetrics_core::corpus::default_extensions())
        } else {
            Some(self.extensions.clone())
        };
        Ok(FileFilter::new(&self.glob, extensions)?)
    }
}
