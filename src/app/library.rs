// SPDX-License-Identifier: MPL-2.0
//! Loading the active wallpaper list.
//!
//! The local list is a sorted catalog maintained by the user. The online
//! list is an unsorted catalog rebuilt from the repository database whenever
//! a sync brings in a new version.

use super::paths::DataLayout;
use crate::application::port::HttpClient;
use crate::catalog::{Catalog, CatalogMode};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::sync::RepositorySync;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// Which list wallpapers are drawn from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSelection {
    #[default]
    Local,
    Online,
}

impl ListSelection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ListSelection::Local => "local",
            ListSelection::Online => "online",
        }
    }

    #[must_use]
    pub fn catalog_mode(self) -> CatalogMode {
        match self {
            ListSelection::Local => CatalogMode::Sorted,
            ListSelection::Online => CatalogMode::Unsorted,
        }
    }

    #[must_use]
    pub fn list_path(self, layout: &DataLayout) -> PathBuf {
        match self {
            ListSelection::Local => layout.local_list(),
            ListSelection::Online => layout.online_list(),
        }
    }
}

impl fmt::Display for ListSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(ListSelection::Local),
            "online" => Ok(ListSelection::Online),
            other => Err(Error::Config(format!(
                "unknown list '{other}' (expected local or online)"
            ))),
        }
    }
}

/// Repository sync configured from the settings and writing into `layout`.
pub fn repository<C: HttpClient>(
    client: Arc<C>,
    config: &Config,
    layout: &DataLayout,
) -> RepositorySync<C> {
    RepositorySync::new(
        client,
        config.repository.manifest_url.clone(),
        config.repository.categories_url.clone(),
        layout.sync_paths(),
    )
}

/// Opens the catalog stored at `path`. A corrupt file is deleted and an
/// empty catalog returned in its place.
#[must_use]
pub fn open_catalog(mode: CatalogMode, path: &Path) -> Catalog {
    match Catalog::open(mode, path) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "discarding unreadable wallpaper list");
            if matches!(err, Error::Parse(_)) {
                remove_if_present(path);
            }
            Catalog::with_path(mode, path)
        }
    }
}

/// Opens the list without contacting the repository.
#[must_use]
pub fn open_cached(selection: ListSelection, layout: &DataLayout) -> Catalog {
    open_catalog(selection.catalog_mode(), &selection.list_path(layout))
}

/// Opens the list, syncing the repository first for the online list.
pub async fn open<C: HttpClient>(
    selection: ListSelection,
    layout: &DataLayout,
    repository: &RepositorySync<C>,
) -> Catalog {
    match selection {
        ListSelection::Local => open_cached(selection, layout),
        ListSelection::Online => open_online(layout, repository).await,
    }
}

/// Syncs the repository and returns the online list, rebuilding it from
/// the database when a new version arrived or no list exists yet. A failed
/// sync is logged and the cached list is used.
pub async fn open_online<C: HttpClient>(
    layout: &DataLayout,
    repository: &RepositorySync<C>,
) -> Catalog {
    match sync_online(layout, repository).await {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::warn!(error = %err, "online sync failed, using cached list");
            build_online(layout, repository)
        }
    }
}

/// Like [`open_online`] but returns sync failures.
///
/// # Errors
///
/// See [`RepositorySync::sync`].
pub async fn sync_online<C: HttpClient>(
    layout: &DataLayout,
    repository: &RepositorySync<C>,
) -> Result<Catalog> {
    if repository.sync().await? {
        remove_if_present(&layout.online_list());
    }
    Ok(build_online(layout, repository))
}

/// Loads the saved online list, or merges the extracted database into a new
/// one when none is saved.
fn build_online<C: HttpClient>(layout: &DataLayout, repository: &RepositorySync<C>) -> Catalog {
    let path = layout.online_list();
    if path.exists() {
        return open_catalog(CatalogMode::Unsorted, &path);
    }

    let mut catalog = Catalog::with_path(CatalogMode::Unsorted, &path);
    if !repository.paths().database_dir.is_dir() {
        return catalog;
    }
    match repository.merge_into(&mut catalog) {
        Ok(_) => {
            if let Err(err) = catalog.save() {
                tracing::warn!(path = %path.display(), error = %err, "could not save online list");
            }
        }
        Err(err) => tracing::warn!(error = %err, "could not read online database"),
    }
    catalog
}

/// Discards every local artifact of the online list (extracted database,
/// version marker, archive and saved list), then syncs and rebuilds it from
/// a fresh download.
///
/// # Errors
///
/// See [`RepositorySync::sync`]. The discarded artifacts stay gone when the
/// sync fails.
pub async fn refresh_online<C: HttpClient>(
    layout: &DataLayout,
    repository: &RepositorySync<C>,
) -> Result<Catalog> {
    let paths = repository.paths();
    if let Err(err) = fs::remove_dir_all(&paths.database_dir) {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %paths.database_dir.display(), error = %err, "could not remove online database");
        }
    }
    for file in [&paths.marker, &paths.archive, &layout.online_list()] {
        remove_if_present(file);
    }
    tracing::info!("discarded local online data, downloading again");
    sync_online(layout, repository).await
}

fn remove_if_present(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), error = %err, "could not remove file");
        }
    }
}
