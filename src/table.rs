use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::dates;
use crate::formatter;
use crate::types::{ChangeEntry, Result};

/// Append entries published after `threshold` to the artifact at `path`, one
/// row per line, preserving feed order. Returns the number of rows written.
///
/// An entry whose `published` field does not parse fails the whole build;
/// there is no per-entry skip-and-continue.
pub fn build_table(
    entries: &[ChangeEntry],
    threshold: DateTime<Utc>,
    path: &Path,
) -> Result<usize> {
    let mut output = OpenOptions::new().create(true).append(true).open(path)?;
    let mut new_entries = 0;

    for entry in entries {
        let published = dates::parse_timestamp(&entry.published)?;
        if published > threshold {
            let row = formatter::format_row(entry, published, false);
            writeln!(output, "{}", row)?;
            new_entries += 1;
        }
    }

    debug!("Appended {} rows to {}", new_entries, path.display());
    Ok(new_entries)
}
