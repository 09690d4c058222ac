// SPDX-License-Identifier: MPL-2.0
//! Recency-based trimming of a cache directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Deletes every regular file in `dir` except the `keep` most recently
/// modified ones. Returns how many files were removed.
///
/// Per-file failures (unreadable metadata, failed deletes) are logged and
/// skipped; a missing directory is treated as empty.
pub fn evict_to(dir: &Path, keep: usize) -> usize {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return 0;
    };

    let mut files: Vec<(SystemTime, PathBuf)> = read_dir
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.path())
        })
        .collect();

    if files.len() <= keep {
        return 0;
    }

    // Newest first.
    files.sort_by(|a, b| b.0.cmp(&a.0));

    let mut removed = 0;
    for (_, path) in files.into_iter().skip(keep) {
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "cache eviction skipped file");
            }
        }
    }
    if removed > 0 {
        tracing::debug!(dir = %dir.display(), removed, "evicted cached files");
    }
    removed
}
