//! Output file handling.

use anyhow::{bail, Result};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask before replacing an existing output file, unless `force` is set.
pub fn confirm_overwrite(path: &Path, force: bool) -> Result<()> {
    if path.is_dir() {
        bail!("\"{}\" is a directory", path.display());
    }
    if force || !path.exists() {
        return Ok(());
    }

    eprint!(
        "{} {} already exists. Overwrite? [y/N] ",
        "?".yellow(),
        path.display()
    );
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    if is_yes(&answer) {
        Ok(())
    } else {
        bail!(
            "Not overwriting \"{}\" (pass --force to skip this prompt)",
            path.display()
        )
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
