// SPDX-License-Identifier: MPL-2.0
//! HTTP GET capability used by the asset cache and repository sync.

use crate::error::FetchError;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

/// Minimal HTTP client: fetch a small text document, or stream a body to a
/// file.
///
/// Implementations report non-success status codes as
/// [`crate::error::FetchErrorKind::Status`] and must not leave a complete
/// looking file behind when `download` fails.
pub trait HttpClient: Send + Sync {
    /// Fetches `url` and returns its body as text.
    fn fetch_text(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Streams `url` into `dest`, returning the number of bytes written.
    ///
    /// `timeout` bounds the whole request when set.
    fn download(
        &self,
        url: &str,
        dest: &Path,
        timeout: Option<Duration>,
    ) -> impl Future<Output = Result<u64, FetchError>> + Send;
}
