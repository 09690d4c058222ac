// SPDX-License-Identifier: MPL-2.0
//! Where wallswap keeps its files.
//!
//! # Path Resolution Order
//!
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI arguments** (`--data-dir`, `--config-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`WALLSWAP_DATA_DIR`, `WALLSWAP_CONFIG_DIR`)
//! 4. **Platform default** - via `dirs` crate
//!
//! [`DataLayout`] names every file and directory inside the data directory.

use crate::sync::SyncPaths;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "WallSwap";

/// Environment variable to override the data directory.
pub const ENV_DATA_DIR: &str = "WALLSWAP_DATA_DIR";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "WALLSWAP_CONFIG_DIR";

static CLI_DATA_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Records `--data-dir` / `--config-dir` from the command line.
///
/// # Panics
///
/// Panics if called more than once (OnceLock can only be set once).
pub fn init_cli_overrides(data_dir: Option<String>, config_dir: Option<String>) {
    CLI_DATA_DIR
        .set(data_dir.map(PathBuf::from))
        .expect("CLI data dir override already initialized");
    CLI_CONFIG_DIR
        .set(config_dir.map(PathBuf::from))
        .expect("CLI config dir override already initialized");
}

fn resolve(
    override_path: Option<PathBuf>,
    cli: &OnceLock<Option<PathBuf>>,
    env_var: &str,
    platform: fn() -> Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }
    if let Some(path) = cli.get().and_then(Clone::clone) {
        return Some(path);
    }
    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }
    platform().map(|mut path| {
        path.push(APP_NAME);
        path
    })
}

/// Directory for catalogs, caches, the online database and session state.
///
/// Linux: `~/.local/share/WallSwap/`, macOS:
/// `~/Library/Application Support/WallSwap/`, Windows:
/// `%APPDATA%\WallSwap\`. Returns `None` if no home directory is known.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_DATA_DIR, ENV_DATA_DIR, dirs::data_dir)
}

/// Directory holding `settings.toml`.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, &CLI_CONFIG_DIR, ENV_CONFIG_DIR, dirs::config_dir)
}

/// Named locations inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout rooted at the resolved data directory.
    #[must_use]
    pub fn resolve() -> Option<Self> {
        get_app_data_dir().map(Self::new)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn thumbnail_cache_dir(&self) -> PathBuf {
        self.root.join("thumbnailCache")
    }

    #[must_use]
    pub fn wallpaper_cache_dir(&self) -> PathBuf {
        self.root.join("wallpaperCache")
    }

    /// Extraction directory of the online database archive.
    #[must_use]
    pub fn online_database_dir(&self) -> PathBuf {
        self.root.join("onlineDatabase")
    }

    #[must_use]
    pub fn database_archive(&self) -> PathBuf {
        self.root.join("lastDataFile.zip")
    }

    /// Marker holding the version of the last downloaded database.
    #[must_use]
    pub fn database_marker(&self) -> PathBuf {
        self.root.join("lastDataFile.txt")
    }

    #[must_use]
    pub fn categories_file(&self) -> PathBuf {
        self.root.join("categories.txt")
    }

    #[must_use]
    pub fn local_list(&self) -> PathBuf {
        self.root.join("localList.xml")
    }

    #[must_use]
    pub fn online_list(&self) -> PathBuf {
        self.root.join("onlineList.xml")
    }

    /// Artifacts of the online repository sync.
    #[must_use]
    pub fn sync_paths(&self) -> SyncPaths {
        SyncPaths {
            database_dir: self.online_database_dir(),
            archive: self.database_archive(),
            marker: self.database_marker(),
            categories: self.categories_file(),
        }
    }

    /// Last composed canvas, as handed to the desktop.
    #[must_use]
    pub fn composed_bitmap(&self) -> PathBuf {
        self.root.join("wallswap.bmp")
    }
}
