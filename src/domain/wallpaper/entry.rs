// SPDX-License-Identifier: MPL-2.0
//! A single wallpaper in a catalog.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Lowercase file extensions accepted as wallpapers.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["bmp", "jpg", "gif", "png"];

/// Returns true when the reference ends in a supported image extension.
///
/// The check is case-insensitive and works for both paths and URLs.
#[must_use]
pub fn is_supported_source(reference: &str) -> bool {
    let without_query = reference
        .split(['?', '#'])
        .next()
        .unwrap_or(reference);
    Path::new(without_query)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// A wallpaper's identity, its preview reference and cached size.
///
/// `source` and `thumbnail_source` never change after creation; only
/// `dimensions` is filled in once the full image has been decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperEntry {
    source: String,
    thumbnail_source: String,
    dimensions: Option<String>,
}

impl WallpaperEntry {
    /// Creates an entry. A missing or unsupported thumbnail falls back to the
    /// source itself, and an empty dimensions string is treated as unknown.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        thumbnail_source: Option<&str>,
        dimensions: Option<&str>,
    ) -> Self {
        let source = source.into();
        let thumbnail_source = match thumbnail_source {
            Some(thumb) if !thumb.is_empty() && is_supported_source(thumb) => thumb.to_string(),
            _ => source.clone(),
        };
        Self {
            source,
            thumbnail_source,
            dimensions: dimensions
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn thumbnail_source(&self) -> &str {
        &self.thumbnail_source
    }

    #[must_use]
    pub fn dimensions(&self) -> Option<&str> {
        self.dimensions.as_deref()
    }

    /// Catalog key: the source, lowercased.
    #[must_use]
    pub fn key(&self) -> String {
        self.source.to_lowercase()
    }

    /// True when the thumbnail is the full image.
    #[must_use]
    pub fn thumbnail_is_source(&self) -> bool {
        self.thumbnail_source == self.source
    }

    pub(crate) fn set_dimensions(&mut self, dimensions: impl Into<String>) {
        self.dimensions = Some(dimensions.into());
    }
}

/// Parsed `"WxH"` size label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Dimensions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
        let width = w.trim().parse().map_err(|_| format!("bad width in {s:?}"))?;
        let height = h.trim().parse().map_err(|_| format!("bad height in {s:?}"))?;
        Ok(Self { width, height })
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_source("C:/walls/Beach.JPG"));
        assert!(is_supported_source("/home/me/a.png"));
        assert!(is_supported_source("http://host/img/sunset.gif?x=1"));
        assert!(!is_supported_source("/home/me/a.jpeg"));
        assert!(!is_supported_source("/home/me/readme"));
    }

    #[test]
    fn unsupported_thumbnail_falls_back_to_source() {
        let entry = WallpaperEntry::new("/w/a.jpg", Some("/w/a.txt"), None);
        assert_eq!(entry.thumbnail_source(), "/w/a.jpg");
        assert!(entry.thumbnail_is_source());

        let entry = WallpaperEntry::new("/w/a.jpg", Some("/w/thumbs/a.png"), None);
        assert_eq!(entry.thumbnail_source(), "/w/thumbs/a.png");
    }

    #[test]
    fn empty_dimensions_are_unknown() {
        let entry = WallpaperEntry::new("/w/a.jpg", None, Some("  "));
        assert_eq!(entry.dimensions(), None);
        let entry = WallpaperEntry::new("/w/a.jpg", None, Some("1024x768"));
        assert_eq!(entry.dimensions(), Some("1024x768"));
    }

    #[test]
    fn key_is_lowercase_source() {
        let entry = WallpaperEntry::new("/W/Beach.JPG", None, None);
        assert_eq!(entry.key(), "/w/beach.jpg");
        assert_eq!(entry.source(), "/W/Beach.JPG");
    }

    #[test]
    fn dimensions_parse_and_display() {
        let dims: Dimensions = "1920x1080".parse().unwrap();
        assert_eq!(dims, Dimensions { width: 1920, height: 1080 });
        assert_eq!(dims.to_string(), "1920x1080");
        assert!("1920".parse::<Dimensions>().is_err());
        assert!("axb".parse::<Dimensions>().is_err());
    }
}
