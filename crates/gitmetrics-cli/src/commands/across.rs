//! Similarity-across command implementation.

use super::FilterArgs;
use crate::output::confirm_overwrite;
use crate::progress::BarProgress;
use anyhow::{Context, Result};
use colored::Colorize;
use gitmetrics_core::dates::{self, parse_date};
use gitmetrics_core::report::write_csv;
use gitmetrics_core::source::resolve_branch;
use gitmetrics_core::sweep;
use gitmetrics_git::GitRepository;
use std::path::PathBuf;

/// Run the similarity-across command.
pub fn run(
    repository: PathBuf,
    end: String,
    starts: Vec<String>,
    branch: String,
    output: PathBuf,
    force: bool,
    filter: FilterArgs,
) -> Result<()> {
    let end = parse_date(&end)?;
    let anchors = starts
        .iter()
        .map(|s| parse_date(s).with_context(|| format!("Invalid start date \"{}\"", s)))
        .collect::<Result<Vec<_>>>()?;
    for anchor in &anchors {
        dates::check_range(*anchor, end)?;
    }
    let file_filter = filter.file_filter()?;
    confirm_overwrite(&output, force)?;

    let repo = GitRepository::open(&repository)?;
    let branch = resolve_branch(&repo, &branch)?;

    eprintln!(
        "{} Comparing {} start date(s) on {} through {} ({})",
        "→".blue(),
        anchors.len(),
        branch.name.cyan(),
        dates::format_day(&end),
        filter.scorer
    );

    let scorer = filter.scorer.scorer();
    let mut progress = BarProgress::new();
    let rows = sweep(
        &repo,
        scorer.as_ref(),
        &branch,
        &anchors,
        end,
        &file_filter,
        &mut progress,
    )?;
    write_csv(&rows, &output)
        .with_context(|| format!("Failed to write similarity report to {}", output.display()))?;

    eprintln!(
        "{} Wrote {} comparison(s) to {}",
        "✓".green(),
        rows.len(),
        output.display()
    );

    Ok(())
}
