// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use wallswap::config::{self, Config};
//! use wallswap::domain::wallpaper::DisplayMode;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.display.mode = DisplayMode::Tile;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::app::library::ListSelection;
use crate::app::paths;
use crate::compositor::CanvasSpec;
use crate::domain::wallpaper::{BackgroundColor, DisplayMode};
use crate::error::Result;
use defaults::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_CATEGORIES_URL, DEFAULT_INTERVAL_MINUTES,
    DEFAULT_MANIFEST_URL, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH, DEFAULT_TASKBAR_MARGIN,
    MAX_INTERVAL_MINUTES, MIN_INTERVAL_MINUTES,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub screen: ScreenConfig,
    pub rotation: RotationConfig,
    pub repository: RepositoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    pub background_color: BackgroundColor,
    /// Command run after the composed bitmap is written; `{path}` is
    /// replaced with the bitmap location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apply_command: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::default(),
            background_color: BackgroundColor::parse_or_white(DEFAULT_BACKGROUND_COLOR),
            apply_command: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: u32,
    pub height: u32,
    pub taskbar_margin: u32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            taskbar_margin: DEFAULT_TASKBAR_MARGIN,
        }
    }
}

impl ScreenConfig {
    #[must_use]
    pub fn canvas(&self) -> CanvasSpec {
        CanvasSpec {
            width: self.width,
            height: self.height,
            taskbar_margin: self.taskbar_margin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub change_randomly: bool,
    pub change_automatically: bool,
    pub interval_minutes: u32,
    pub change_at_startup: bool,
    pub high_resolution_thumbnails: bool,
    /// Move files of broken local entries to the trash when they are purged.
    pub trash_purged_files: bool,
    pub list: ListSelection,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            change_randomly: true,
            change_automatically: false,
            interval_minutes: DEFAULT_INTERVAL_MINUTES,
            change_at_startup: false,
            high_resolution_thumbnails: false,
            trash_purged_files: false,
            list: ListSelection::default(),
        }
    }
}

impl RotationConfig {
    /// The automatic change interval, clamped to the supported range.
    #[must_use]
    pub fn interval(&self) -> Duration {
        let minutes = self
            .interval_minutes
            .clamp(MIN_INTERVAL_MINUTES, MAX_INTERVAL_MINUTES);
        Duration::from_secs(u64::from(minutes) * 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepositoryConfig {
    pub manifest_url: String,
    pub categories_url: String,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            categories_url: DEFAULT_CATEGORIES_URL.to_string(),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

/// Loads `settings.toml` from the config directory, or defaults if absent.
///
/// # Errors
///
/// Returns [`crate::error::Error::Parse`] if the file is malformed.
pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

/// Saves `settings.toml` into the config directory.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the file cannot be read or is malformed.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
