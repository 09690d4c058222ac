// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.
//!
//! Variants follow how a failure is handled upstream: parse failures are
//! recoverable (discard and recreate), fetch and resolve failures drive the
//! navigation retry loop, geometry failures abort a single composition.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed catalog, manifest or settings content.
    #[error("Parse Error: {0}")]
    Parse(String),

    /// A single remote request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A reference could not be turned into a usable local image.
    #[error("Resolve Error: {0}")]
    Resolve(String),

    /// Every mirror of the bulk archive failed.
    #[error(transparent)]
    AggregateFetch(#[from] AggregateFetchError),

    /// Degenerate compositor input.
    #[error("Geometry Error: {0}")]
    Geometry(String),

    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config Error: {0}")]
    Config(String),
}

/// Why a remote request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The server answered with a non-success status code.
    Status(u16),
    /// The request did not complete within the allotted time.
    Timeout,
    /// Connection, TLS or protocol failure.
    Transport(String),
    /// Writing the body to disk failed.
    Io(String),
}

impl fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchErrorKind::Status(code) => write!(f, "HTTP status {code}"),
            FetchErrorKind::Timeout => write!(f, "timed out"),
            FetchErrorKind::Transport(msg) => write!(f, "transport failure: {msg}"),
            FetchErrorKind::Io(msg) => write!(f, "write failure: {msg}"),
        }
    }
}

/// Failure of a single remote request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Fetch Error: {url}: {kind}")]
pub struct FetchError {
    pub url: String,
    pub kind: FetchErrorKind,
}

impl FetchError {
    #[must_use]
    pub fn new(url: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    #[must_use]
    pub fn status(url: impl Into<String>, code: u16) -> Self {
        Self::new(url, FetchErrorKind::Status(code))
    }

    #[must_use]
    pub fn transport(url: impl Into<String>, msg: impl fmt::Display) -> Self {
        Self::new(url, FetchErrorKind::Transport(msg.to_string()))
    }
}

/// One failed mirror attempt.
#[derive(Debug)]
pub struct MirrorFailure {
    pub url: String,
    pub cause: Error,
}

/// All mirrors failed; carries one cause per mirror in attempt order.
#[derive(Debug, Default)]
pub struct AggregateFetchError {
    pub failures: Vec<MirrorFailure>,
}

impl AggregateFetchError {
    pub fn push(&mut self, url: impl Into<String>, cause: Error) {
        self.failures.push(MirrorFailure {
            url: url.into(),
            cause,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for AggregateFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Database download failed on {} mirror(s)", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            write!(f, "; [{}] {}: {}", i + 1, failure.url, failure.cause)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFetchError {}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Parse(format!("archive: {err}"))
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Io(err.into())
    }
}

impl Error {
    /// Returns true for failures the navigation loop absorbs by purging the
    /// candidate and trying another one. Geometry failures come from the
    /// canvas settings rather than the candidate and are not absorbed.
    #[must_use]
    pub fn is_candidate_failure(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Resolve(_) | Error::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
