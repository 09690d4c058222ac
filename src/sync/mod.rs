// SPDX-License-Identifier: MPL-2.0
//! Online repository synchronization.
//!
//! [`RepositorySync::sync`] fetches the manifest, refreshes the categories
//! file, and downloads the database archive from the first working mirror
//! when the manifest announces a newer version than the local marker. The
//! extracted files are turned into catalog entries by [`merge`].

pub mod archive;
pub mod manifest;
pub mod merge;

use crate::application::port::HttpClient;
use crate::catalog::Catalog;
use crate::error::{AggregateFetchError, Result};
use chrono::NaiveDateTime;
use manifest::Manifest;
use rand::Rng;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use manifest::{format_timestamp, parse_timestamp};

/// Local artifacts written by a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPaths {
    /// Extraction directory of the database archive.
    pub database_dir: PathBuf,
    /// Where the downloaded archive is kept.
    pub archive: PathBuf,
    /// Holds the version of the last extracted database.
    pub marker: PathBuf,
    pub categories: PathBuf,
}

/// Appends a random six-digit `SID` query so caches along the way do not
/// serve a stale document.
fn with_session_id(url: &str) -> String {
    let sid: u32 = rand::thread_rng().gen_range(100_000..1_000_000);
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}SID={sid:06}")
}

pub struct RepositorySync<C> {
    client: Arc<C>,
    manifest_url: String,
    categories_url: String,
    paths: SyncPaths,
}

impl<C: HttpClient> RepositorySync<C> {
    pub fn new(
        client: Arc<C>,
        manifest_url: impl Into<String>,
        categories_url: impl Into<String>,
        paths: SyncPaths,
    ) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
            categories_url: categories_url.into(),
            paths,
        }
    }

    #[must_use]
    pub fn paths(&self) -> &SyncPaths {
        &self.paths
    }

    /// Refreshes the local copy of the repository.
    ///
    /// Returns `true` when a new database was downloaded and extracted, and
    /// `false` when the local copy is already current.
    ///
    /// # Errors
    ///
    /// - [`crate::error::Error::Fetch`] if the manifest or categories
    ///   request fails
    /// - [`crate::error::Error::Parse`] for an incomplete manifest (nothing
    ///   else is requested then)
    /// - [`crate::error::Error::AggregateFetch`] when every mirror fails
    pub async fn sync(&self) -> Result<bool> {
        let body = self
            .client
            .fetch_text(&with_session_id(&self.manifest_url))
            .await?;
        let manifest = Manifest::parse(&body)?;
        tracing::debug!(
            database = %manifest.last_database_update,
            categories = %manifest.last_categories_update,
            mirrors = manifest.mirrors.len(),
            "fetched repository manifest"
        );

        self.refresh_categories().await?;

        if !self.needs_download(manifest.last_database_update).await {
            tracing::info!(version = %manifest.last_database_update, "online database is up to date");
            return Ok(false);
        }

        let mut failures = AggregateFetchError::default();
        for mirror in &manifest.mirrors {
            match self.install_from(mirror, manifest.last_database_update).await {
                Ok(files) => {
                    tracing::info!(mirror = %mirror, files, "downloaded online database");
                    return Ok(true);
                }
                Err(err) => {
                    tracing::warn!(mirror = %mirror, error = %err, "mirror failed");
                    failures.push(mirror.as_str(), err);
                }
            }
        }
        Err(failures.into())
    }

    /// Adds the extracted database to `catalog`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extraction directory cannot be listed.
    pub fn merge_into(&self, catalog: &mut Catalog) -> Result<usize> {
        merge::merge_directory(&self.paths.database_dir, catalog)
    }

    async fn refresh_categories(&self) -> Result<()> {
        let body = self
            .client
            .fetch_text(&with_session_id(&self.categories_url))
            .await?;
        if let Some(parent) = self.paths.categories.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.paths.categories, body).await?;
        Ok(())
    }

    /// The marker is trusted only while the extracted database it describes
    /// is still on disk.
    async fn needs_download(&self, remote: NaiveDateTime) -> bool {
        if !self.paths.database_dir.is_dir() {
            return true;
        }
        match tokio::fs::read_to_string(&self.paths.marker).await {
            Ok(text) => parse_timestamp(&text).is_none_or(|local| local < remote),
            Err(_) => true,
        }
    }

    async fn install_from(&self, mirror: &str, version: NaiveDateTime) -> Result<usize> {
        self.client.download(mirror, &self.paths.archive, None).await?;

        let archive = self.paths.archive.clone();
        let dest = self.paths.database_dir.clone();
        let files = tokio::task::spawn_blocking(move || extract(&archive, &dest)).await??;

        tokio::fs::write(&self.paths.marker, format_timestamp(version)).await?;
        Ok(files)
    }
}

/// The archive is opened before the previous database is wiped, so a corrupt
/// download leaves it in place.
fn extract(archive: &Path, dest: &Path) -> Result<usize> {
    let mut zip = archive::open(archive)?;
    archive::reset_dir(dest)?;
    Ok(archive::extract_flat(&mut zip, dest))
}
