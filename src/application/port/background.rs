// SPDX-License-Identifier: MPL-2.0
//! Desktop background port.

use crate::domain::media::RawImage;
use crate::error::Result;

/// Hands a composed, canvas-sized image to the desktop.
pub trait BackgroundApplier: Send + Sync + 'static {
    /// # Errors
    ///
    /// Returns an error if the image could not be written or applied.
    fn apply(&self, canvas: &RawImage) -> Result<()>;
}
