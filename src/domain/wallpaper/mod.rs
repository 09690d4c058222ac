// SPDX-License-Identifier: MPL-2.0
//! Wallpaper domain types.
//!
//! Entries are owned by a catalog; display mode and background color feed the
//! compositor.

pub mod color;
pub mod display_mode;
pub mod entry;

pub use color::BackgroundColor;
pub use display_mode::DisplayMode;
pub use entry::{is_supported_source, Dimensions, WallpaperEntry, SUPPORTED_EXTENSIONS};
