//! gitmetrics CLI
//!
//! Command-line interface for repository similarity and activity metrics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;
mod progress;

use commands::FilterArgs;

#[derive(Parser)]
#[command(name = "gitmetrics")]
#[command(author, version, about = "Similarity and activity metrics for git repositories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score how similar the files at two commits are
    Similarity {
        /// Path to the repository
        repository: PathBuf,

        /// Start commit ref (or date with --dates)
        start: String,

        /// End commit ref (or date with --dates)
        end: String,

        /// Treat start and end as dates on --branch
        #[arg(short, long)]
        dates: bool,

        /// Branch used with --dates
        #[arg(short, long, default_value = "main")]
        branch: String,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Write day-by-day commit activity to CSV
    Activity {
        /// Path to the repository
        repository: PathBuf,

        /// Branch to report on
        branch: String,

        /// First day boundary
        start: String,

        /// Last day boundary (defaults to now)
        end: Option<String>,

        /// Output CSV path
        #[arg(short, long, default_value = "./git-activity.csv")]
        output: PathBuf,

        /// Overwrite the output file without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Write the similarity of each start date against every later day to CSV
    SimilarityAcross {
        /// Path to the repository
        repository: PathBuf,

        /// Last day to compare against
        end: String,

        /// Start date to compare from (repeatable)
        #[arg(short, long = "start", required = true)]
        starts: Vec<String>,

        /// Branch to follow
        #[arg(short, long, default_value = "main")]
        branch: String,

        /// Output CSV path
        #[arg(short, long, default_value = "./git-similarity.csv")]
        output: PathBuf,

        /// Overwrite the output file without asking
        #[arg(short, long)]
        force: bool,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "gitmetrics=debug"
    } else {
        "gitmetrics=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let libgit2 = gitmetrics_git::libgit2_version().context("git support is unavailable")?;
    tracing::debug!("Using libgit2 {}", libgit2);

    match cli.command {
        Commands::Similarity {
            repository,
            start,
            end,
            dates,
            branch,
            filter,
        } => {
            commands::similarity::run(repository, start, end, dates, branch, filter)?;
        }
        Commands::Activity {
            repository,
            branch,
            start,
            end,
            output,
            force,
        } => {
            commands::activity::run(repository, branch, start, end, output, force)?;
        }
        Commands::SimilarityAcross {
            repository,
            end,
            starts,
            branch,
            output,
            force,
            filter,
        } => {
            commands::across::run(repository, end, starts, branch, output, force, filter)?;
        }
    }

    Ok(())
}
