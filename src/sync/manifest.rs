// SPDX-License-Identifier: MPL-2.0
//! Repository manifest: `#key: value#key: value` segments over any number of
//! lines.
//!
//! Recognized keys are `last-upd`, `categories.last-upd` and `mirror.url`
//! (repeatable). Keys are matched case-insensitively, unknown keys are
//! ignored and values are kept as written.

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::str::FromStr;

const KEY_DATABASE_UPDATE: &str = "last-upd";
const KEY_CATEGORIES_UPDATE: &str = "categories.last-upd";
const KEY_MIRROR: &str = "mirror.url";

/// Format used when writing timestamps (the local marker file).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATE_TIME_FORMATS: &[&str] = &[
    TIMESTAMP_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a manifest or marker timestamp. Offsets, when present, are
/// dropped; timestamps compare as naive local values.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[must_use]
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub last_database_update: NaiveDateTime,
    pub last_categories_update: NaiveDateTime,
    /// Archive mirrors in the order they should be tried.
    pub mirrors: Vec<String>,
}

impl Manifest {
    /// Parses a manifest body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if either timestamp is missing or invalid,
    /// or if no mirror is listed.
    pub fn parse(body: &str) -> Result<Self> {
        let mut database = None;
        let mut categories = None;
        let mut mirrors = Vec::new();

        for segment in body.lines().flat_map(|line| line.split('#')) {
            let Some((key, value)) = segment.trim().split_once(':') else {
                continue;
            };
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            match key.trim().to_ascii_lowercase().as_str() {
                KEY_DATABASE_UPDATE => {
                    if let Some(ts) = parse_timestamp(value) {
                        database = Some(ts);
                    }
                }
                KEY_CATEGORIES_UPDATE => {
                    if let Some(ts) = parse_timestamp(value) {
                        categories = Some(ts);
                    }
                }
                KEY_MIRROR => mirrors.push(value.to_string()),
                _ => {}
            }
        }

        let last_database_update = database
            .ok_or_else(|| Error::Parse(format!("manifest: missing or invalid {KEY_DATABASE_UPDATE}")))?;
        let last_categories_update = categories.ok_or_else(|| {
            Error::Parse(format!("manifest: missing or invalid {KEY_CATEGORIES_UPDATE}"))
        })?;
        if mirrors.is_empty() {
            return Err(Error::Parse(format!("manifest: no {KEY_MIRROR} entries")));
        }

        Ok(Self {
            last_database_update,
            last_categories_update,
            mirrors,
        })
    }
}

impl FromStr for Manifest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
