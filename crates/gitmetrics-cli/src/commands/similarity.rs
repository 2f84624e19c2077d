//! Similarity command implementation.

use super::FilterArgs;
use anyhow::Result;
use colored::Colorize;
use gitmetrics_core::dates::parse_date;
use gitmetrics_core::similarity::HIGH_SIMILARITY;
use gitmetrics_core::source::{recent_commit, resolve_branch, resolve_commit};
use gitmetrics_core::{compare, ResolvedCommit};
use gitmetrics_git::GitRepository;
use std::path::PathBuf;

/// Run the similarity command.
pub fn run(
    repository: PathBuf,
    start: String,
    end: String,
    dates: bool,
    branch: String,
    filter: FilterArgs,
) -> Result<()> {
    let repo = GitRepository::open(&repository)?;
    let file_filter = filter.file_filter()?;

    let (start_commit, end_commit) = if dates {
        let branch = resolve_branch(&repo, &branch)?;
        let start_commit = recent_commit(&repo, &branch, parse_date(&start)?)?;
        let end_commit = recent_commit(&repo, &branch, parse_date(&end)?)?;
        (start_commit, end_commit)
    } else {
        (resolve_commit(&repo, &start)?, resolve_commit(&repo, &end)?)
    };

    eprintln!(
        "{} Comparing {} with {}",
        "→".blue(),
        describe(&start_commit),
        describe(&end_commit)
    );

    let scorer = filter.scorer.scorer();
    let similarity = compare(
        &repo,
        scorer.as_ref(),
        &start_commit.id,
        &end_commit.id,
        &file_filter,
    )?;

    let value = similarity.to_string().bold();
    let value = if similarity > HIGH_SIMILARITY {
        value.green()
    } else {
        value.blue()
    };
    println!("Repository similarity is ~{}", value);

    Ok(())
}

fn describe(commit: &ResolvedCommit) -> String {
    format!("{} ({})", commit.id.short(), commit.time.format("%Y-%m-%d %H:%M"))
}
