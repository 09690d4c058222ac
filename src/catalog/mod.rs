// SPDX-License-Identifier: MPL-2.0
//! Ordered, deduplicated wallpaper collection.
//!
//! A catalog keeps its entries in a growable sequence (used for display and
//! index-based navigation) plus a map from the lowercased source to the
//! entry's position in that sequence. Both structures are updated together
//! on every insert and removal.
//!
//! Two flavors exist:
//! - [`CatalogMode::Unsorted`]: insertion order, appends only.
//! - [`CatalogMode::Sorted`]: ascending byte-wise order of `source`. Bulk
//!   inserts of clustered keys (a directory walk, for example) start their
//!   search from the last insertion point, so they stay close to O(1) each.

pub mod store;

use crate::domain::wallpaper::{is_supported_source, WallpaperEntry};
use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use store::StoredEntry;
use walkdir::WalkDir;

/// Ordering policy for a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
    Sorted,
    Unsorted,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    mode: CatalogMode,
    path: Option<PathBuf>,
    entries: Vec<WallpaperEntry>,
    positions: HashMap<String, usize>,
    /// Position of the most recent insertion; `None` when unknown.
    last_insert: Option<usize>,
}

impl Catalog {
    /// Creates an empty catalog with no backing file.
    #[must_use]
    pub fn new(mode: CatalogMode) -> Self {
        Self {
            mode,
            path: None,
            entries: Vec::new(),
            positions: HashMap::new(),
            last_insert: None,
        }
    }

    /// Creates an empty catalog that persists to `path`.
    #[must_use]
    pub fn with_path(mode: CatalogMode, path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::new(mode)
        }
    }

    /// Creates a catalog backed by `path` and loads it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Parse`] if the file exists but is not a
    /// valid catalog.
    pub fn open(mode: CatalogMode, path: impl Into<PathBuf>) -> Result<Self> {
        let mut catalog = Self::with_path(mode, path);
        catalog.load()?;
        Ok(catalog)
    }

    #[must_use]
    pub fn mode(&self) -> CatalogMode {
        self.mode
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WallpaperEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entry_at(&self, index: usize) -> Option<&WallpaperEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn get(&self, source: &str) -> Option<&WallpaperEntry> {
        self.position(source).map(|i| &self.entries[i])
    }

    #[must_use]
    pub fn contains(&self, source: &str) -> bool {
        self.positions.contains_key(&source.to_lowercase())
    }

    /// Returns the sequence position of `source`.
    #[must_use]
    pub fn position(&self, source: &str) -> Option<usize> {
        self.positions.get(&source.to_lowercase()).copied()
    }

    /// Adds a file with its own path as thumbnail.
    pub fn add_file(&mut self, source: &str) -> bool {
        self.add(source, None, None)
    }

    /// Adds an entry. Returns `true` if a new entry was created.
    ///
    /// Sources without a supported image extension are rejected, and a
    /// source already present is left untouched.
    pub fn add(
        &mut self,
        source: &str,
        thumbnail_source: Option<&str>,
        dimensions: Option<&str>,
    ) -> bool {
        if !is_supported_source(source) || self.contains(source) {
            return false;
        }
        let entry = WallpaperEntry::new(source, thumbnail_source, dimensions);
        let index = match self.mode {
            CatalogMode::Unsorted => self.entries.len(),
            CatalogMode::Sorted => self.sorted_position(entry.source()),
        };
        self.insert_at(index, entry);
        self.last_insert = Some(index);
        true
    }

    /// Finds where `source` belongs in a sorted sequence, walking from the
    /// last insertion point when it is still valid.
    fn sorted_position(&self, source: &str) -> usize {
        let len = self.entries.len();
        let Some(last) = self.last_insert.filter(|&i| i < len) else {
            return self
                .entries
                .iter()
                .position(|e| e.source() > source)
                .unwrap_or(len);
        };

        if self.entries[last].source() > source {
            // Walk down to the first entry that sorts at or before the new key.
            (0..last)
                .rev()
                .find(|&i| self.entries[i].source() <= source)
                .map_or(0, |i| i + 1)
        } else {
            (last + 1..len)
                .find(|&i| self.entries[i].source() > source)
                .unwrap_or(len)
        }
    }

    fn insert_at(&mut self, index: usize, entry: WallpaperEntry) {
        let key = entry.key();
        self.entries.insert(index, entry);
        for (i, shifted) in self.entries.iter().enumerate().skip(index + 1) {
            self.positions.insert(shifted.key(), i);
        }
        self.positions.insert(key, index);
    }

    /// Removes `source` from the catalog, returning the removed entry.
    ///
    /// With `also_delete_file`, a local file behind the entry is moved to the
    /// platform trash. Trash failures are logged and otherwise ignored.
    pub fn remove(&mut self, source: &str, also_delete_file: bool) -> Option<WallpaperEntry> {
        let index = self.positions.remove(&source.to_lowercase())?;
        let entry = self.entries.remove(index);
        for (i, shifted) in self.entries.iter().enumerate().skip(index) {
            self.positions.insert(shifted.key(), i);
        }
        self.last_insert = None;

        if also_delete_file {
            trash_local_file(entry.source());
        }
        Some(entry)
    }

    pub fn remove_all(&mut self) {
        self.entries.clear();
        self.positions.clear();
        self.last_insert = None;
    }

    /// Records the decoded size of `source`. Returns `false` if absent.
    pub fn set_dimensions(&mut self, source: &str, dimensions: &str) -> bool {
        match self.position(source) {
            Some(i) => {
                self.entries[i].set_dimensions(dimensions);
                true
            }
            None => false,
        }
    }

    /// Recursively adds every supported file under `dir`.
    ///
    /// Returns the number of entries created. Unreadable directory entries
    /// are skipped.
    pub fn add_directory(&mut self, dir: &Path) -> usize {
        if !dir.is_dir() {
            return 0;
        }
        let mut added = 0;
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by(|a, b| {
                b.file_type()
                    .is_dir()
                    .cmp(&a.file_type().is_dir())
                    .then_with(|| a.file_name().cmp(b.file_name()))
            });
        for entry in walker.into_iter().filter_map(std::result::Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(path) = entry.path().to_str() else {
                tracing::debug!(path = ?entry.path(), "skipping non UTF-8 path");
                continue;
            };
            if self.add_file(path) {
                added += 1;
            }
        }
        added
    }

    /// Replaces the contents with the backing file. A missing file leaves the
    /// catalog empty. Stored order is kept as-is.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Parse`] for a corrupt file or
    /// [`crate::error::Error::Io`] if it cannot be read. The catalog is empty
    /// after a failure.
    pub fn load(&mut self) -> Result<()> {
        self.remove_all();
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        self.load_from_path(&path)
    }

    /// Like [`Catalog::load`] but reads from an explicit file.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`].
    pub fn load_from_path(&mut self, path: &Path) -> Result<()> {
        self.remove_all();
        for record in store::read_entries(path)? {
            if self.contains(&record.source) {
                continue;
            }
            let entry = WallpaperEntry::new(
                record.source,
                Some(&record.thumbnail_source),
                Some(&record.dimensions),
            );
            let index = self.entries.len();
            self.positions.insert(entry.key(), index);
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Writes the sequence to the backing file. Does nothing without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => self.save_to_path(path),
            None => Ok(()),
        }
    }

    /// Like [`Catalog::save`] but writes to an explicit file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let records: Vec<StoredEntry> = self
            .entries
            .iter()
            .map(|e| StoredEntry {
                source: e.source().to_string(),
                thumbnail_source: e.thumbnail_source().to_string(),
                dimensions: e.dimensions().unwrap_or_default().to_string(),
            })
            .collect();
        store::write_entries(path, &records)
    }
}

fn trash_local_file(source: &str) {
    let path = Path::new(source);
    if !path.is_file() {
        return;
    }
    if let Err(err) = trash::delete(path) {
        tracing::warn!(path = %path.display(), error = %err, "failed to move file to trash");
    }
}
