// SPDX-License-Identifier: MPL-2.0
//! Builds the online catalog from the extracted database files.
//!
//! Each line reads `path|dimensions^thumbnail`. Lines starting with `#` are
//! comments, lines without `|` or with an empty path are skipped, and an
//! empty thumbnail means the image is its own thumbnail.

use crate::catalog::Catalog;
use crate::error::Result;
use std::fs;
use std::path::Path;

/// One parsed database line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseLine<'a> {
    pub source: &'a str,
    pub dimensions: Option<&'a str>,
    pub thumbnail: Option<&'a str>,
}

#[must_use]
pub fn parse_line(line: &str) -> Option<DatabaseLine<'_>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.starts_with('#') {
        return None;
    }
    let (source, rest) = line.split_once('|')?;
    if source.is_empty() {
        return None;
    }
    let (dimensions, thumbnail) = match rest.split_once('^') {
        Some((dims, thumb)) => (dims, thumb),
        None => (rest, ""),
    };
    Some(DatabaseLine {
        source,
        dimensions: Some(dimensions).filter(|d| !d.is_empty()),
        thumbnail: Some(thumbnail).filter(|t| !t.is_empty()),
    })
}

/// Adds every line of `text` to `catalog`. Returns the number of entries
/// created. A leading byte order mark is ignored.
pub fn merge_text(text: &str, catalog: &mut Catalog) -> usize {
    text.strip_prefix('\u{feff}')
        .unwrap_or(text)
        .lines()
        .filter_map(parse_line)
        .filter(|line| catalog.add(line.source, line.thumbnail, line.dimensions))
        .count()
}

/// Adds the lines of every file in `dir` (in file name order) to `catalog`.
/// Unreadable files are logged and skipped.
///
/// # Errors
///
/// Returns an error if `dir` cannot be listed.
pub fn merge_directory(dir: &Path, catalog: &mut Catalog) -> Result<usize> {
    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    files.sort();

    let mut added = 0;
    for path in files {
        match fs::read(&path) {
            Ok(bytes) => added += merge_text(&String::from_utf8_lossy(&bytes), catalog),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping unreadable database file");
            }
        }
    }
    tracing::info!(dir = %dir.display(), added, "merged online database");
    Ok(added)
}
