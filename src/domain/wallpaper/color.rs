// SPDX-License-Identifier: MPL-2.0
//! Background fill color for uncovered canvas pixels.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Named colors recognized in settings, matched case-insensitively.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("darkgray", [169, 169, 169]),
    ("lightgray", [211, 211, 211]),
    ("dimgray", [105, 105, 105]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("purple", [128, 0, 128]),
    ("teal", [0, 128, 128]),
    ("navy", [0, 0, 128]),
    ("orange", [255, 165, 0]),
    ("brown", [165, 42, 42]),
    ("pink", [255, 192, 203]),
    ("gold", [255, 215, 0]),
    ("indigo", [75, 0, 130]),
    ("violet", [238, 130, 238]),
    ("beige", [245, 245, 220]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("coral", [255, 127, 80]),
    ("salmon", [250, 128, 114]),
    ("tomato", [255, 99, 71]),
    ("crimson", [220, 20, 60]),
    ("chocolate", [210, 105, 30]),
    ("tan", [210, 180, 140]),
    ("skyblue", [135, 206, 235]),
    ("steelblue", [70, 130, 180]),
    ("slategray", [112, 128, 144]),
    ("midnightblue", [25, 25, 112]),
    ("darkblue", [0, 0, 139]),
    ("darkgreen", [0, 100, 0]),
    ("darkred", [139, 0, 0]),
    ("forestgreen", [34, 139, 34]),
    ("cornflowerblue", [100, 149, 237]),
    ("whitesmoke", [245, 245, 245]),
    ("transparent", [255, 255, 255]),
];

/// Opaque-by-default RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BackgroundColor {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses a color name or `#RRGGBB` / `#AARRGGBB`. Returns `None` for
    /// anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        let lower = value.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(name, [r, g, b])| {
                if *name == "transparent" {
                    Self { r: *r, g: *g, b: *b, a: 0 }
                } else {
                    Self::rgb(*r, *g, *b)
                }
            })
    }

    /// Like [`BackgroundColor::parse`] but falls back to white.
    #[must_use]
    pub fn parse_or_white(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::WHITE)
    }

    #[must_use]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::BLACK
    }
}

fn parse_hex(hex: &str) -> Option<BackgroundColor> {
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(BackgroundColor::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(BackgroundColor {
            a: byte(0)?,
            r: byte(2)?,
            g: byte(4)?,
            b: byte(6)?,
        }),
        _ => None,
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            if let Some((name, _)) = NAMED_COLORS
                .iter()
                .find(|(_, rgb)| *rgb == [self.r, self.g, self.b])
            {
                return f.write_str(name);
            }
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }
}

impl Serialize for BackgroundColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BackgroundColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse_or_white(&raw))
    }
}
