// SPDX-License-Identifier: MPL-2.0
//! Local materialization of wallpaper references.
//!
//! [`AssetCache::resolve`] turns a reference (local path, `file://` URL or
//! `http(s)://` URL) into a path that exists on disk. Remote images are
//! downloaded into one of two bounded directories, one per [`AssetKind`],
//! and named after the last segment of their URL. A cached file is reused
//! without any freshness check.
//!
//! Concurrent resolves of the same reference are not coalesced; callers
//! serialize access (the navigation engine does so through its busy gate).

pub mod eviction;

use crate::application::port::HttpClient;
use crate::config::defaults::{FETCH_TIMEOUT_SECS, FULL_CACHE_CAPACITY, THUMBNAIL_CACHE_CAPACITY};
use crate::error::{Error, Result};
use reqwest::Url;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Which cache directory a reference is materialized into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Thumbnail,
    Full,
}

/// A reference after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Local(PathBuf),
    Remote(Url),
}

impl Reference {
    /// Classifies a catalog reference. Anything that is not an `http`,
    /// `https` or `file` URL is taken as a filesystem path.
    #[must_use]
    pub fn classify(reference: &str) -> Self {
        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Reference::Remote(url),
            Ok(url) if url.scheme() == "file" => match url.to_file_path() {
                Ok(path) => Reference::Local(path),
                Err(()) => Reference::Local(PathBuf::from(reference)),
            },
            _ => Reference::Local(PathBuf::from(reference)),
        }
    }

    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Reference::Remote(_))
    }
}

/// Directory and capacity of one cache kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheDir {
    pub path: PathBuf,
    pub capacity: usize,
}

pub struct AssetCache<C> {
    client: Arc<C>,
    thumbnails: CacheDir,
    full: CacheDir,
    timeout: Duration,
}

impl<C: HttpClient> AssetCache<C> {
    /// Creates a cache with the default capacities and fetch timeout.
    pub fn new(
        client: Arc<C>,
        thumbnail_dir: impl Into<PathBuf>,
        full_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            thumbnails: CacheDir {
                path: thumbnail_dir.into(),
                capacity: THUMBNAIL_CACHE_CAPACITY,
            },
            full: CacheDir {
                path: full_dir.into(),
                capacity: FULL_CACHE_CAPACITY,
            },
            timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
        }
    }

    /// Overrides the capacity of one kind. A capacity below 1 is raised to 1.
    #[must_use]
    pub fn with_capacity(mut self, kind: AssetKind, capacity: usize) -> Self {
        self.dir_mut(kind).capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn dir(&self, kind: AssetKind) -> &CacheDir {
        match kind {
            AssetKind::Thumbnail => &self.thumbnails,
            AssetKind::Full => &self.full,
        }
    }

    fn dir_mut(&mut self, kind: AssetKind) -> &mut CacheDir {
        match kind {
            AssetKind::Thumbnail => &mut self.thumbnails,
            AssetKind::Full => &mut self.full,
        }
    }

    /// Where a remote reference is (or would be) cached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resolve`] if the URL has no file name.
    pub fn cache_path(&self, url: &Url, kind: AssetKind) -> Result<PathBuf> {
        let file_name = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .ok_or_else(|| Error::Resolve(format!("{url}: no file name in URL")))?;
        Ok(self.dir(kind).path.join(file_name))
    }

    /// Returns a local path holding the image behind `reference`.
    ///
    /// Local references are returned as-is without any network activity.
    /// Remote references are served from the cache directory of `kind`,
    /// downloading them on a miss after trimming the directory so it stays
    /// within capacity once the new file lands.
    ///
    /// # Errors
    ///
    /// - [`Error::Resolve`] for a local path that does not exist or a URL
    ///   without a file name
    /// - [`Error::Fetch`] when the download fails
    pub async fn resolve(&self, reference: &str, kind: AssetKind) -> Result<PathBuf> {
        let url = match Reference::classify(reference) {
            Reference::Local(path) => {
                return if path.exists() {
                    Ok(path)
                } else {
                    Err(Error::Resolve(format!("{}: file not found", path.display())))
                };
            }
            Reference::Remote(url) => url,
        };

        let dest = self.cache_path(&url, kind)?;
        if dest.exists() {
            tracing::debug!(url = %url, path = %dest.display(), "cache hit");
            return Ok(dest);
        }

        let dir = self.dir(kind);
        let (evict_dir, keep) = (dir.path.clone(), dir.capacity.saturating_sub(1));
        tokio::task::spawn_blocking(move || eviction::evict_to(&evict_dir, keep)).await?;
        tokio::fs::create_dir_all(&dir.path).await?;

        tracing::debug!(url = %url, ?kind, "fetching remote asset");
        match self
            .client
            .download(url.as_str(), &dest, Some(self.timeout))
            .await
        {
            Ok(_) => Ok(dest),
            Err(err) => {
                remove_partial(&dest).await;
                Err(err.into())
            }
        }
    }
}

async fn remove_partial(path: &Path) {
    if let Err(err) = tokio::fs::remove_file(path).await {
        if err.kind() != std::io::ErrorKind::NotFound {
            tracing::debug!(path = %path.display(), error = %err, "could not remove partial download");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeHttp;
    use std::fs;
    use tempfile::tempdir;

    fn cache_in(dir: &Path, http: FakeHttp) -> (AssetCache<FakeHttp>, Arc<FakeHttp>) {
        let http = Arc::new(http);
        let cache = AssetCache::new(
            Arc::clone(&http),
            dir.join("thumbnailCache"),
            dir.join("wallpaperCache"),
        );
        (cache, http)
    }

    #[test]
    fn classifies_references() {
        assert!(Reference::classify("http://host/a.jpg").is_remote());
        assert!(Reference::classify("https://host/a.jpg").is_remote());
        assert_eq!(
            Reference::classify("/home/me/a.jpg"),
            Reference::Local(PathBuf::from("/home/me/a.jpg"))
        );
        assert!(!Reference::classify("C:\\walls\\a.jpg").is_remote());
        assert!(!Reference::classify("ftp://host/a.jpg").is_remote());
    }

    #[cfg(unix)]
    #[test]
    fn file_urls_become_paths() {
        assert_eq!(
            Reference::classify("file:///tmp/a.jpg"),
            Reference::Local(PathBuf::from("/tmp/a.jpg"))
        );
    }

    #[tokio::test]
    async fn local_reference_makes_no_request() {
        let dir = tempdir().expect("temp dir");
        let image = dir.path().join("local.jpg");
        fs::write(&image, b"img").expect("write");
        let (cache, http) = cache_in(dir.path(), FakeHttp::new());

        for kind in [AssetKind::Thumbnail, AssetKind::Full] {
            let resolved = cache
                .resolve(image.to_str().unwrap(), kind)
                .await
                .expect("resolve");
            assert_eq!(resolved, image);
        }
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn missing_local_file_is_resolve_error_without_request() {
        let dir = tempdir().expect("temp dir");
        let (cache, http) = cache_in(dir.path(), FakeHttp::new());

        let err = cache
            .resolve(dir.path().join("gone.jpg").to_str().unwrap(), AssetKind::Full)
            .await
            .expect_err("should fail");

        assert!(matches!(err, Error::Resolve(_)));
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn remote_miss_downloads_then_hits() {
        let dir = tempdir().expect("temp dir");
        let http = FakeHttp::new().with_file("http://host/img/sea.jpg", b"sea".to_vec());
        let (cache, http) = cache_in(dir.path(), http);

        let first = cache
            .resolve("http://host/img/sea.jpg", AssetKind::Thumbnail)
            .await
            .expect("resolve");
        assert_eq!(first, dir.path().join("thumbnailCache").join("sea.jpg"));
        assert_eq!(fs::read(&first).expect("read"), b"sea");

        let second = cache
            .resolve("http://host/img/sea.jpg", AssetKind::Thumbnail)
            .await
            .expect("resolve");
        assert_eq!(second, first);
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn leftover_partial_download_is_not_a_cache_hit() {
        let dir = tempdir().expect("temp dir");
        let cache_dir = dir.path().join("wallpaperCache");
        fs::create_dir_all(&cache_dir).expect("mkdir");
        fs::write(cache_dir.join("sea.jpg.part"), b"se").expect("write partial");
        let http = FakeHttp::new().with_file("http://host/sea.jpg", b"sea".to_vec());
        let (cache, http) = cache_in(dir.path(), http);

        let resolved = cache
            .resolve("http://host/sea.jpg", AssetKind::Full)
            .await
            .expect("resolve");

        assert_eq!(resolved, cache_dir.join("sea.jpg"));
        assert_eq!(fs::read(&resolved).expect("read"), b"sea");
        assert_eq!(http.request_count(), 1);
    }

    #[tokio::test]
    async fn kinds_use_independent_directories() {
        let dir = tempdir().expect("temp dir");
        let http = FakeHttp::new().with_file("http://host/a.png", b"a".to_vec());
        let (cache, http) = cache_in(dir.path(), http);

        let thumb = cache
            .resolve("http://host/a.png", AssetKind::Thumbnail)
            .await
            .expect("thumb");
        let full = cache
            .resolve("http://host/a.png", AssetKind::Full)
            .await
            .expect("full");

        assert_ne!(thumb, full);
        assert_eq!(http.request_count(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_is_fetch_error_and_leaves_nothing() {
        let dir = tempdir().expect("temp dir");
        let (cache, _http) = cache_in(dir.path(), FakeHttp::new());

        let err = cache
            .resolve("http://host/missing.jpg", AssetKind::Full)
            .await
            .expect_err("should fail");

        assert!(matches!(err, Error::Fetch(_)));
        assert!(!dir.path().join("wallpaperCache").join("missing.jpg").exists());
    }

    #[tokio::test]
    async fn eviction_keeps_directory_within_capacity() {
        let dir = tempdir().expect("temp dir");
        let mut http = FakeHttp::new();
        for i in 0..8 {
            http = http.with_file(&format!("http://host/{i}.jpg"), vec![i as u8]);
        }
        let (cache, _http) = cache_in(dir.path(), http);
        let cache = cache.with_capacity(AssetKind::Full, 3);

        for i in 0..8 {
            cache
                .resolve(&format!("http://host/{i}.jpg"), AssetKind::Full)
                .await
                .expect("resolve");
            let count = fs::read_dir(dir.path().join("wallpaperCache"))
                .expect("read dir")
                .count();
            assert!(count <= 3, "cache holds {count} files after fetch {i}");
        }
        assert!(dir.path().join("wallpaperCache").join("7.jpg").exists());
    }

    #[test]
    fn default_capacities_per_kind() {
        let (cache, _) = cache_in(Path::new("/data"), FakeHttp::new());
        assert_eq!(cache.dir(AssetKind::Thumbnail).capacity, 1000);
        assert_eq!(cache.dir(AssetKind::Full).capacity, 100);
    }

    #[test]
    fn url_without_file_name_is_rejected() {
        let (cache, _) = cache_in(Path::new("/data"), FakeHttp::new());
        let url = Url::parse("http://host/").expect("url");
        assert!(cache.cache_path(&url, AssetKind::Full).is_err());
    }
}
