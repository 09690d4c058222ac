// SPDX-License-Identifier: MPL-2.0
//! Session state persisted between runs in CBOR format.
//!
//! This is state the user never edits by hand (unlike `settings.toml`): the
//! wallpaper that was last applied and the list it came from, so a later run
//! can resume from the same position.
//!
//! # Path Resolution
//!
//! 1. Use `load_from()`/`save_to()` with explicit path override
//! 2. Set `WALLSWAP_DATA_DIR` environment variable
//! 3. Falls back to platform-specific data directory

use super::library::ListSelection;
use super::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppState {
    /// Source of the wallpaper most recently selected or applied.
    #[serde(default)]
    pub current_source: Option<String>,

    /// List `current_source` belongs to.
    #[serde(default)]
    pub current_list: Option<ListSelection>,

    /// Unix timestamp (seconds) of the last successful apply.
    #[serde(default)]
    pub last_applied_at: Option<i64>,
}

impl AppState {
    /// Loads state from the default location.
    ///
    /// Returns the state plus a warning when the file existed but could not
    /// be used; the state is the default in that case.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };

        if !path.exists() {
            return (Self::default(), None);
        }

        match fs::File::open(&path) {
            Ok(file) => match ciborium::from_reader(BufReader::new(file)) {
                Ok(state) => (state, None),
                Err(err) => (
                    Self::default(),
                    Some(format!("state file {} is corrupt: {err}", path.display())),
                ),
            },
            Err(err) => (
                Self::default(),
                Some(format!("state file {} is unreadable: {err}", path.display())),
            ),
        }
    }

    /// Saves state to the default location, returning a warning on failure.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return Some("no data directory available for state file".to_string());
        };

        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                return Some(format!("cannot create {}: {err}", parent.display()));
            }
        }

        match fs::File::create(&path) {
            Ok(file) => match ciborium::into_writer(self, BufWriter::new(file)) {
                Ok(()) => None,
                Err(err) => Some(format!("cannot write {}: {err}", path.display())),
            },
            Err(err) => Some(format!("cannot create {}: {err}", path.display())),
        }
    }

    fn state_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|mut path| {
            path.push(STATE_FILE);
            path
        })
    }

    /// Remembers `source` as the current wallpaper of `list`.
    pub fn record_current(&mut self, list: ListSelection, source: Option<&str>) {
        self.current_list = Some(list);
        self.current_source = source.map(str::to_string);
    }

    /// The remembered current source, if it belongs to `list`.
    #[must_use]
    pub fn current_for(&self, list: ListSelection) -> Option<&str> {
        if self.current_list == Some(list) {
            self.current_source.as_deref()
        } else {
            None
        }
    }

    pub fn mark_applied(&mut self) {
        self.last_applied_at = Some(chrono::Utc::now().timestamp());
    }
}
