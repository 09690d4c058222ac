// SPDX-License-Identifier: MPL-2.0
//! Pure placement geometry for each display mode.

use crate::domain::wallpaper::DisplayMode;
use crate::error::{Error, Result};

/// Output canvas: full screen size plus the strip reserved at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub taskbar_margin: u32,
}

impl CanvasSpec {
    #[must_use]
    pub fn new(width: u32, height: u32, taskbar_margin: u32) -> Self {
        Self {
            width,
            height,
            taskbar_margin,
        }
    }

    /// Size of the target area (canvas minus the bottom margin).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Geometry`] for an empty canvas or a margin that
    /// leaves no target area.
    pub fn target(&self) -> Result<(u32, u32)> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Geometry(format!(
                "canvas {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.taskbar_margin >= self.height {
            return Err(Error::Geometry(format!(
                "taskbar margin {} leaves no room on a {}px tall canvas",
                self.taskbar_margin, self.height
            )));
        }
        Ok((self.width, self.height - self.taskbar_margin))
    }
}

/// Where the (possibly rescaled) source lands on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One copy of size `width`x`height` at `(x, y)`.
    Single {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Copies of `tile_width`x`tile_height` repeated from the origin over
    /// `area_width`x`area_height`, clipped at the area edge.
    Tiled {
        tile_width: u32,
        tile_height: u32,
        area_width: u32,
        area_height: u32,
    },
}

impl Layout {
    /// Size the source must be resampled to.
    #[must_use]
    pub fn scaled_size(&self) -> (u32, u32) {
        match *self {
            Layout::Single { width, height, .. } => (width, height),
            Layout::Tiled {
                tile_width,
                tile_height,
                ..
            } => (tile_width, tile_height),
        }
    }
}

/// Largest aspect-preserving size of `src` that fits in `bound`. The axis
/// with the larger `src / bound` ratio is matched exactly.
fn fit(src: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (u64::from(src.0), u64::from(src.1));
    let (bw, bh) = (u64::from(bound.0), u64::from(bound.1));
    if sw * bh >= sh * bw {
        let h = ((sh * bw + sw / 2) / sw).clamp(1, bh);
        (bound.0, h as u32)
    } else {
        let w = ((sw * bh + sh / 2) / sh).clamp(1, bw);
        (w as u32, bound.1)
    }
}

/// Like [`fit`] but never enlarges.
fn shrink_to_fit(src: (u32, u32), bound: (u32, u32)) -> (u32, u32) {
    if src.0 <= bound.0 && src.1 <= bound.1 {
        src
    } else {
        fit(src, bound)
    }
}

fn centered(size: (u32, u32), target: (u32, u32)) -> Layout {
    Layout::Single {
        x: (target.0 - size.0) / 2,
        y: (target.1 - size.1) / 2,
        width: size.0,
        height: size.1,
    }
}

/// Computes the placement of a `source_width`x`source_height` image.
///
/// - Fill: exactly the target area, aspect ratio ignored.
/// - Center: native size, shrunk to fit only when larger than the target.
/// - Stretch: largest aspect-preserving fit, enlarging or shrinking.
/// - Tile: native size (shrunk to fit the full canvas if larger) repeated.
///
/// # Errors
///
/// Returns [`Error::Geometry`] for a zero-sized source or degenerate canvas.
pub fn compute_layout(
    source_width: u32,
    source_height: u32,
    canvas: CanvasSpec,
    mode: DisplayMode,
) -> Result<Layout> {
    if source_width == 0 || source_height == 0 {
        return Err(Error::Geometry(format!(
            "source image {source_width}x{source_height} is empty"
        )));
    }
    let target = canvas.target()?;
    let source = (source_width, source_height);

    Ok(match mode {
        DisplayMode::Fill => Layout::Single {
            x: 0,
            y: 0,
            width: target.0,
            height: target.1,
        },
        DisplayMode::Center => centered(shrink_to_fit(source, target), target),
        DisplayMode::Stretch => centered(fit(source, target), target),
        DisplayMode::Tile => {
            let (tile_width, tile_height) =
                shrink_to_fit(source, (canvas.width, canvas.height));
            Layout::Tiled {
                tile_width,
                tile_height,
                area_width: target.0,
                area_height: target.1,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: CanvasSpec = CanvasSpec {
        width: 1920,
        height: 1080,
        taskbar_margin: 40,
    };

    fn single(layout: Layout) -> (u32, u32, u32, u32) {
        match layout {
            Layout::Single {
                x,
                y,
                width,
                height,
            } => (x, y, width, height),
            Layout::Tiled { .. } => panic!("expected a single placement"),
        }
    }

    #[test]
    fn fill_always_covers_target() {
        for (w, h) in [(10, 10), (4000, 100), (100, 4000), (1920, 1040)] {
            let layout = compute_layout(w, h, SCREEN, DisplayMode::Fill).unwrap();
            assert_eq!(single(layout), (0, 0, 1920, 1040));
        }
    }

    #[test]
    fn center_keeps_small_images_native() {
        let layout = compute_layout(800, 600, SCREEN, DisplayMode::Center).unwrap();
        assert_eq!(single(layout), (560, 220, 800, 600));
    }

    #[test]
    fn center_shrinks_on_binding_axis() {
        // Too tall only: height binds.
        let (_, y, w, h) = single(compute_layout(1000, 2080, SCREEN, DisplayMode::Center).unwrap());
        assert_eq!((y, h), (0, 1040));
        assert_eq!(w, 500);

        // Larger on both axes, width ratio dominates.
        let (x, _, w, h) = single(compute_layout(7680, 2160, SCREEN, DisplayMode::Center).unwrap());
        assert_eq!((x, w), (0, 1920));
        assert_eq!(h, 540);
    }

    #[test]
    fn stretch_enlarges_small_images_to_binding_axis() {
        let (x, y, w, h) = single(compute_layout(480, 260, SCREEN, DisplayMode::Stretch).unwrap());
        assert_eq!((w, h), (1920, 1040));
        assert_eq!((x, y), (0, 0));

        let (x, _, w, h) = single(compute_layout(100, 100, SCREEN, DisplayMode::Stretch).unwrap());
        assert_eq!((w, h), (1040, 1040));
        assert_eq!(x, 440);
    }

    #[test]
    fn stretch_with_one_axis_too_large_fits_that_axis() {
        let (_, _, w, h) = single(compute_layout(1000, 2080, SCREEN, DisplayMode::Stretch).unwrap());
        assert_eq!((w, h), (500, 1040));
    }

    #[test]
    fn stretch_exact_axis_match_keeps_native_size() {
        let (_, _, w, h) = single(compute_layout(1920, 500, SCREEN, DisplayMode::Stretch).unwrap());
        assert_eq!((w, h), (1920, 500));
    }

    #[test]
    fn center_and_stretch_never_exceed_target() {
        for (sw, sh) in [(1, 5000), (5000, 1), (3000, 3000), (1921, 1041), (7, 3)] {
            for mode in [DisplayMode::Center, DisplayMode::Stretch] {
                let (x, y, w, h) = single(compute_layout(sw, sh, SCREEN, mode).unwrap());
                assert!(w >= 1 && h >= 1);
                assert!(x + w <= 1920 && y + h <= 1040, "{mode} {sw}x{sh}");
            }
        }
    }

    #[test]
    fn tile_shrinks_against_full_canvas() {
        let layout = compute_layout(200, 100, SCREEN, DisplayMode::Tile).unwrap();
        assert_eq!(
            layout,
            Layout::Tiled {
                tile_width: 200,
                tile_height: 100,
                area_width: 1920,
                area_height: 1040
            }
        );
        let layout = compute_layout(3840, 1080, SCREEN, DisplayMode::Tile).unwrap();
        assert_eq!(layout.scaled_size(), (1920, 540));
    }

    #[test]
    fn degenerate_inputs_are_geometry_errors() {
        assert!(matches!(
            compute_layout(0, 10, SCREEN, DisplayMode::Center),
            Err(Error::Geometry(_))
        ));
        let no_room = CanvasSpec::new(100, 40, 40);
        assert!(matches!(
            compute_layout(10, 10, no_room, DisplayMode::Fill),
            Err(Error::Geometry(_))
        ));
        assert!(CanvasSpec::new(0, 10, 0).target().is_err());
    }
}
