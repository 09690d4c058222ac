// SPDX-License-Identifier: MPL-2.0
//! Flat extraction of the database archive.

use crate::error::Result;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use zip::ZipArchive;

/// Deletes `dir` (if present) and creates it empty.
///
/// # Errors
///
/// Returns an error if the directory cannot be created. A failed removal of
/// the previous contents is only logged.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        if let Err(err) = fs::remove_dir_all(dir) {
            tracing::warn!(path = %dir.display(), error = %err, "could not clear extraction directory");
        }
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Opens and validates the archive at `path`.
///
/// # Errors
///
/// Returns [`crate::error::Error::Parse`] if the file is not a readable
/// archive, or an I/O error if it cannot be opened.
pub fn open(path: &Path) -> Result<ZipArchive<File>> {
    Ok(ZipArchive::new(File::open(path)?)?)
}

/// Extracts every file of `zip` directly into `dest`, dropping any directory
/// structure inside the archive. Entries that fail to extract are skipped.
/// Returns the number of files written.
pub fn extract_flat(zip: &mut ZipArchive<File>, dest: &Path) -> usize {
    let mut written = 0;

    for index in 0..zip.len() {
        let mut entry = match zip.by_index(index) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(index, error = %err, "skipping unreadable archive entry");
                continue;
            }
        };
        if entry.is_dir() {
            continue;
        }
        let Some(file_name) = entry
            .enclosed_name()
            .and_then(|path| path.file_name().map(ToOwned::to_owned))
        else {
            tracing::debug!(name = entry.name(), "skipping archive entry without a usable name");
            continue;
        };

        let target = dest.join(file_name);
        let copied = File::create(&target).and_then(|mut out| io::copy(&mut entry, &mut out));
        match copied {
            Ok(_) => written += 1,
            Err(err) => {
                tracing::debug!(path = %target.display(), error = %err, "skipping archive entry");
                let _ = fs::remove_file(&target);
            }
        }
    }

    written
}
