// SPDX-License-Identifier: MPL-2.0
//! `reqwest`-backed [`HttpClient`].

use crate::application::port::HttpClient;
use crate::error::{Error, FetchError, FetchErrorKind};
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const USER_AGENT: &str = concat!("wallswap/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP client with a bounded redirect policy.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the TLS backend cannot be initialized.
    pub fn new() -> crate::error::Result<Self> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

fn classify(url: &str, err: &reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::new(url, FetchErrorKind::Timeout)
    } else if let Some(status) = err.status() {
        FetchError::status(url, status.as_u16())
    } else {
        FetchError::transport(url, err)
    }
}

/// Where a download is streamed before it is moved to `dest`.
pub(crate) fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

fn io_failure(url: &str, err: &std::io::Error) -> FetchError {
    FetchError::new(url, FetchErrorKind::Io(err.to_string()))
}

impl ReqwestHttpClient {
    async fn get(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, FetchError> {
        let mut request = self.client.get(url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await.map_err(|e| classify(url, &e))?;
        if !response.status().is_success() {
            return Err(FetchError::status(url, response.status().as_u16()));
        }
        Ok(response)
    }

    async fn stream_to(
        &self,
        url: &str,
        response: reqwest::Response,
        dest: &Path,
    ) -> Result<u64, FetchError> {
        let mut file = tokio::fs::File::create(dest)
            .await
            .map_err(|e| io_failure(url, &e))?;
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| classify(url, &e))?;
            file.write_all(&chunk).await.map_err(|e| io_failure(url, &e))?;
            written += chunk.len() as u64;
        }
        file.flush().await.map_err(|e| io_failure(url, &e))?;
        Ok(written)
    }
}

impl HttpClient for ReqwestHttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url, None).await?;
        response.text().await.map_err(|e| classify(url, &e))
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        timeout: Option<Duration>,
    ) -> Result<u64, FetchError> {
        let response = self.get(url, timeout).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure(url, &e))?;
        }

        // `dest` only ever appears complete, even if the process dies
        // mid-body.
        let partial = partial_path(dest);
        let result = match self.stream_to(url, response, &partial).await {
            Ok(written) => tokio::fs::rename(&partial, dest)
                .await
                .map(|()| written)
                .map_err(|e| io_failure(url, &e)),
            Err(err) => Err(err),
        };
        if result.is_err() {
            let _ = tokio::fs::remove_file(&partial).await;
        }
        result
    }
}
