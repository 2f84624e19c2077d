//! CSV report output.

use crate::{Error, Result};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Write `rows` as CSV to `path`, header first.
///
/// The header is taken from the row type's field names, so an empty slice
/// is refused. Every field is quoted and records end in CRLF. Missing
/// parent directories are created.
pub fn write_csv<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    if rows.is_empty() {
        return Err(Error::EmptyReport);
    }
    if path.is_dir() {
        return Err(Error::Output(format!(
            "\"{}\" is a directory",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::CRLF)
        .from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Wrote {} row(s) to {}", rows.len(), path.display());
    Ok(())
}
