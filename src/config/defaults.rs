// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Screen**: Canvas size used when nothing is configured
//! - **Rotation**: Automatic change interval bounds
//! - **Cache**: Asset cache capacities and fetch timeout
//! - **Repository**: Online manifest and categories locations

// ==========================================================================
// Screen Defaults
// ==========================================================================

/// Default canvas width in pixels.
pub const DEFAULT_SCREEN_WIDTH: u32 = 1920;

/// Default canvas height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 1080;

/// Default height reserved at the bottom of the canvas for a taskbar.
pub const DEFAULT_TASKBAR_MARGIN: u32 = 0;

/// Default background color name.
pub const DEFAULT_BACKGROUND_COLOR: &str = "black";

// ==========================================================================
// Rotation Defaults
// ==========================================================================

/// Default automatic change interval (in minutes).
pub const DEFAULT_INTERVAL_MINUTES: u32 = 30;

/// Minimum automatic change interval (in minutes).
pub const MIN_INTERVAL_MINUTES: u32 = 1;

/// Maximum automatic change interval (one day).
pub const MAX_INTERVAL_MINUTES: u32 = 24 * 60;

// ==========================================================================
// Cache Defaults
// ==========================================================================

/// Files kept in the thumbnail cache directory.
pub const THUMBNAIL_CACHE_CAPACITY: usize = 1000;

/// Files kept in the full-size wallpaper cache directory.
pub const FULL_CACHE_CAPACITY: usize = 100;

/// Timeout for a single remote image fetch (in seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 3;

// ==========================================================================
// Repository Defaults
// ==========================================================================

/// Manifest describing the current online database and its mirrors.
pub const DEFAULT_MANIFEST_URL: &str = "http://www.myportablesoftware.com/data/mdwallpaper-data.txt";

/// Category list published alongside the database.
pub const DEFAULT_CATEGORIES_URL: &str =
    "http://www.myportablesoftware.com/data/mdwallpaper-categories.txt";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_SCREEN_WIDTH > 0);
    assert!(DEFAULT_SCREEN_HEIGHT > DEFAULT_TASKBAR_MARGIN);

    assert!(MIN_INTERVAL_MINUTES > 0);
    assert!(MAX_INTERVAL_MINUTES >= MIN_INTERVAL_MINUTES);
    assert!(DEFAULT_INTERVAL_MINUTES >= MIN_INTERVAL_MINUTES);
    assert!(DEFAULT_INTERVAL_MINUTES <= MAX_INTERVAL_MINUTES);

    assert!(THUMBNAIL_CACHE_CAPACITY > 1);
    assert!(FULL_CACHE_CAPACITY > 1);
    assert!(FETCH_TIMEOUT_SECS > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_capacities_match_kinds() {
        assert_eq!(THUMBNAIL_CACHE_CAPACITY, 1000);
        assert_eq!(FULL_CACHE_CAPACITY, 100);
        assert_eq!(FETCH_TIMEOUT_SECS, 3);
    }

    #[test]
    fn interval_defaults_are_valid() {
        assert_eq!(DEFAULT_INTERVAL_MINUTES, 30);
        assert!(DEFAULT_INTERVAL_MINUTES >= MIN_INTERVAL_MINUTES);
        assert!(DEFAULT_INTERVAL_MINUTES <= MAX_INTERVAL_MINUTES);
    }

    #[test]
    fn repository_urls_are_http() {
        assert!(DEFAULT_MANIFEST_URL.starts_with("http://"));
        assert!(DEFAULT_CATEGORIES_URL.starts_with("http://"));
    }
}
