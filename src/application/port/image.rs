// SPDX-License-Identifier: MPL-2.0
//! Image decoding port.

use crate::domain::media::RawImage;
use crate::error::Result;
use std::path::Path;

/// Turns an image file into an RGBA pixel buffer with its native size.
///
/// Decoding runs on a blocking thread, hence the `'static` bound.
pub trait ImageDecoder: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns [`crate::error::Error::Resolve`] if the file cannot be read or
    /// decoded.
    fn decode(&self, path: &Path) -> Result<RawImage>;
}
