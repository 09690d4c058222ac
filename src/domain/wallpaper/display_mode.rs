// SPDX-License-Identifier: MPL-2.0
//! How a source image is laid out on the canvas.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Largest aspect-preserving fit inside the target area, centered.
    Stretch,
    /// Scaled to exactly cover the target area, ignoring aspect ratio.
    Fill,
    /// Native size, shrunk only when too large, centered.
    #[default]
    Center,
    /// Native size repeated over the target area.
    Tile,
}

impl DisplayMode {
    pub const ALL: [DisplayMode; 4] = [
        DisplayMode::Stretch,
        DisplayMode::Fill,
        DisplayMode::Center,
        DisplayMode::Tile,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Stretch => "stretch",
            DisplayMode::Fill => "fill",
            DisplayMode::Center => "center",
            DisplayMode::Tile => "tile",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        DisplayMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == lower)
            .ok_or_else(|| format!("unknown display mode: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Tile".parse::<DisplayMode>(), Ok(DisplayMode::Tile));
        assert_eq!(" fill ".parse::<DisplayMode>(), Ok(DisplayMode::Fill));
        assert!("zoom".parse::<DisplayMode>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for mode in DisplayMode::ALL {
            assert_eq!(mode.to_string().parse::<DisplayMode>(), Ok(mode));
        }
    }
}
