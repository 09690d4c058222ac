// SPDX-License-Identifier: MPL-2.0
//! Domain layer: pure data types with no I/O.
//!
//! - [`media`]: decoded pixel buffers
//! - [`wallpaper`]: catalog entries, display modes and background colors

pub mod media;
pub mod wallpaper;
