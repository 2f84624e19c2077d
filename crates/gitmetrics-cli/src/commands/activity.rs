//! Activity command implementation.

use crate::output::confirm_overwrite;
use crate::progress::BarProgress;
use anyhow::{Context, Result};
use colored::Colorize;
use gitmetrics_core::dates::{self, parse_date};
use gitmetrics_core::report::write_csv;
use gitmetrics_core::source::resolve_branch;
use gitmetrics_core::aggregate;
use gitmetrics_git::GitRepository;
use std::path::PathBuf;

/// Run the activity command.
pub fn run(
    repository: PathBuf,
    branch: String,
    start: String,
    end: Option<String>,
    output: PathBuf,
    force: bool,
) -> Result<()> {
    let start = parse_date(&start)?;
    let end = match end {
        Some(end) => parse_date(&end)?,
        None => dates::now(),
    };
    dates::check_range(start, end)?;
    confirm_overwrite(&output, force)?;

    let repo = GitRepository::open(&repository)?;
    let branch = resolve_branch(&repo, &branch)?;

    eprintln!(
        "{} Compiling activity on {} from {} to {}",
        "→".blue(),
        branch.name.cyan(),
        dates::format_day(&start),
        dates::format_day(&end)
    );

    let mut progress = BarProgress::new();
    let rows = aggregate(&repo, &branch, start, end, &mut progress)?;
    write_csv(&rows, &output)
        .with_context(|| format!("Failed to write activity report to {}", output.display()))?;

    let commits: usize = rows.iter().map(|r| r.n_commits).sum();
    eprintln!(
        "{} Wrote {} day(s), {} commit(s) to {}",
        "✓".green(),
        rows.len(),
        commits,
        output.display()
    );

    Ok(())
}
