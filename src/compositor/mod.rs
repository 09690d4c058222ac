// SPDX-License-Identifier: MPL-2.0
//! Renders a decoded wallpaper onto a screen-sized canvas.
//!
//! The canvas is the full screen. The image is laid out in the target area,
//! which is the canvas minus a strip at the bottom reserved for the taskbar.
//! Every pixel not covered by the image keeps the background color, and
//! transparent source pixels are blended over it.

pub mod layout;

pub use layout::{compute_layout, CanvasSpec, Layout};

use crate::domain::media::RawImage;
use crate::domain::wallpaper::{BackgroundColor, DisplayMode};
use crate::error::{Error, Result};
use image_rs::imageops::{self, FilterType};
use image_rs::{Rgba, RgbaImage};

fn to_buffer(image: &RawImage) -> Result<RgbaImage> {
    RgbaImage::from_raw(image.width(), image.height(), image.rgba_bytes().to_vec()).ok_or_else(
        || {
            Error::Geometry(format!(
                "pixel buffer does not match {}",
                image.dimensions_label()
            ))
        },
    )
}

fn scaled(source: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if source.dimensions() == (width, height) {
        source
    } else {
        imageops::resize(&source, width, height, FilterType::Lanczos3)
    }
}

/// Composes `source` onto a `canvas`-sized image filled with `background`.
///
/// # Errors
///
/// Returns [`Error::Geometry`] for an empty source, a degenerate canvas or a
/// pixel buffer that does not match the source dimensions.
pub fn compose(
    source: &RawImage,
    canvas: CanvasSpec,
    mode: DisplayMode,
    background: BackgroundColor,
) -> Result<RawImage> {
    let layout = compute_layout(source.width(), source.height(), canvas, mode)?;
    let (scaled_width, scaled_height) = layout.scaled_size();
    let image = scaled(to_buffer(source)?, scaled_width, scaled_height);

    let fill = Rgba(background.to_rgba());
    let mut output = RgbaImage::from_pixel(canvas.width, canvas.height, fill);

    match layout {
        Layout::Single { x, y, .. } => {
            imageops::overlay(&mut output, &image, i64::from(x), i64::from(y));
        }
        Layout::Tiled {
            tile_width,
            tile_height,
            area_width,
            area_height,
        } => {
            // Tiles are drawn into the target area only, so the last row and
            // column are clipped there and never spill into the margin.
            let mut area = RgbaImage::from_pixel(area_width, area_height, fill);
            for y in (0..area_height).step_by(tile_height as usize) {
                for x in (0..area_width).step_by(tile_width as usize) {
                    imageops::overlay(&mut area, &image, i64::from(x), i64::from(y));
                }
            }
            imageops::replace(&mut output, &area, 0, 0);
        }
    }

    tracing::debug!(
        mode = %mode,
        source = %source.dimensions_label(),
        placed = %format!("{scaled_width}x{scaled_height}"),
        "composed wallpaper"
    );

    Ok(RawImage::from_rgba(canvas.width, canvas.height, output.into_raw()))
}
