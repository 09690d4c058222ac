// SPDX-License-Identifier: MPL-2.0
//! [`BackgroundApplier`] that writes the canvas as a BMP file and optionally
//! runs a user command to hand it to the desktop.

use crate::application::port::BackgroundApplier;
use crate::domain::media::RawImage;
use crate::error::{Error, Result};
use image_rs::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Placeholder in `apply_command` replaced by the bitmap path.
pub const PATH_PLACEHOLDER: &str = "{path}";

#[derive(Debug, Clone)]
pub struct BitmapApplier {
    bitmap_path: PathBuf,
    command: Option<String>,
}

impl BitmapApplier {
    #[must_use]
    pub fn new(bitmap_path: impl Into<PathBuf>, command: Option<String>) -> Self {
        Self {
            bitmap_path: bitmap_path.into(),
            command: command.filter(|c| !c.trim().is_empty()),
        }
    }

    #[must_use]
    pub fn bitmap_path(&self) -> &Path {
        &self.bitmap_path
    }

    fn write_bitmap(&self, canvas: &RawImage) -> Result<()> {
        if let Some(parent) = self.bitmap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let buffer: ImageBuffer<Rgba<u8>, _> = ImageBuffer::from_raw(
            canvas.width(),
            canvas.height(),
            canvas.rgba_bytes().to_vec(),
        )
        .ok_or_else(|| Error::Geometry("canvas buffer does not match its size".to_string()))?;

        DynamicImage::ImageRgba8(buffer)
            .to_rgb8()
            .save_with_format(&self.bitmap_path, ImageFormat::Bmp)
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to write {}: {e}",
                    self.bitmap_path.display()
                )))
            })
    }

    fn run_command(&self, template: &str) -> Result<()> {
        let path = self.bitmap_path.to_string_lossy();
        let command_line = template.replace(PATH_PLACEHOLDER, &path);
        tracing::debug!(command = %command_line, "running apply command");

        let status = shell(&command_line).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::Io(std::io::Error::other(format!(
                "apply command exited with {status}"
            ))))
        }
    }
}

#[cfg(windows)]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", command_line]);
    cmd
}

#[cfg(not(windows))]
fn shell(command_line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command_line]);
    cmd
}

impl BackgroundApplier for BitmapApplier {
    fn apply(&self, canvas: &RawImage) -> Result<()> {
        self.write_bitmap(canvas)?;
        if let Some(template) = &self.command {
            self.run_command(template)?;
        }
        tracing::info!(path = %self.bitmap_path.display(), "wallpaper applied");
        Ok(())
    }
}
