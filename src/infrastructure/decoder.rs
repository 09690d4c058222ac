// SPDX-License-Identifier: MPL-2.0
//! [`ImageDecoder`] backed by the `image` crate.

use crate::application::port::ImageDecoder;
use crate::domain::media::RawImage;
use crate::error::{Error, Result};
use image_rs::GenericImageView;
use std::fs;
use std::path::Path;

/// Decodes BMP, JPEG, GIF and PNG files (format sniffed from content).
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageRsDecoder;

impl ImageDecoder for ImageRsDecoder {
    fn decode(&self, path: &Path) -> Result<RawImage> {
        let bytes = fs::read(path)
            .map_err(|e| Error::Resolve(format!("{}: {e}", path.display())))?;
        let img = image_rs::load_from_memory(&bytes)
            .map_err(|e| Error::Resolve(format!("{}: {e}", path.display())))?;

        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::Resolve(format!(
                "{}: image has no pixels",
                path.display()
            )));
        }
        Ok(RawImage::from_rgba(width, height, img.to_rgba8().into_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::{ImageFormat, Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn decodes_png_to_rgba() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("red.png");
        RgbaImage::from_pixel(3, 2, Rgba([255, 0, 0, 255]))
            .save_with_format(&path, ImageFormat::Png)
            .expect("write png");

        let image = ImageRsDecoder.decode(&path).expect("decode");
        assert_eq!((image.width(), image.height()), (3, 2));
        assert_eq!(image.pixel(2, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn garbage_is_a_resolve_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"definitely not a jpeg").expect("write");

        let err = ImageRsDecoder.decode(&path).expect_err("should fail");
        assert!(matches!(err, Error::Resolve(_)));
    }

    #[test]
    fn missing_file_is_a_resolve_error() {
        let dir = tempdir().expect("temp dir");
        let err = ImageRsDecoder
            .decode(&dir.path().join("nope.png"))
            .expect_err("should fail");
        assert!(matches!(err, Error::Resolve(_)));
    }
}
