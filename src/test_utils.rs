// SPDX-License-Identifier: MPL-2.0
//! In-memory fakes for the port traits, shared by unit tests.

use crate::application::port::{BackgroundApplier, HttpClient, ImageDecoder};
use crate::domain::media::RawImage;
use crate::error::{Error, FetchError, Result};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// HTTP fake serving canned bodies keyed by URL (query string ignored).
#[derive(Debug, Default)]
pub struct FakeHttp {
    texts: HashMap<String, String>,
    files: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, url: &str, body: &str) -> Self {
        self.texts.insert(url.to_string(), body.to_string());
        self
    }

    pub fn with_file(mut self, url: &str, body: Vec<u8>) -> Self {
        self.files.insert(url.to_string(), body);
        self
    }

    /// Every URL requested so far, query string included.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn record(&self, url: &str) {
        self.requests.lock().unwrap().push(url.to_string());
    }
}

impl HttpClient for FakeHttp {
    async fn fetch_text(&self, url: &str) -> std::result::Result<String, FetchError> {
        self.record(url);
        self.texts
            .get(strip_query(url))
            .cloned()
            .ok_or_else(|| FetchError::status(url, 404))
    }

    async fn download(
        &self,
        url: &str,
        dest: &Path,
        _timeout: Option<Duration>,
    ) -> std::result::Result<u64, FetchError> {
        self.record(url);
        let body = self
            .files
            .get(strip_query(url))
            .ok_or_else(|| FetchError::status(url, 404))?;
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FetchError::transport(url, e))?;
        }
        std::fs::write(dest, body).map_err(|e| FetchError::transport(url, e))?;
        Ok(body.len() as u64)
    }
}

/// Decoder fake: any existing file decodes to a solid image, except files
/// whose name is listed as broken.
#[derive(Debug)]
pub struct FakeDecoder {
    broken: HashSet<String>,
    size: (u32, u32),
    decodes: AtomicUsize,
}

impl FakeDecoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            broken: HashSet::new(),
            size: (width, height),
            decodes: AtomicUsize::new(0),
        }
    }

    pub fn with_broken(mut self, file_name: &str) -> Self {
        self.broken.insert(file_name.to_string());
        self
    }

    pub fn decode_count(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }
}

impl ImageDecoder for FakeDecoder {
    fn decode(&self, path: &Path) -> Result<RawImage> {
        self.decodes.fetch_add(1, Ordering::SeqCst);
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if self.broken.contains(name) || !path.exists() {
            return Err(Error::Resolve(format!("cannot decode {}", path.display())));
        }
        Ok(RawImage::filled(self.size.0, self.size.1, [200, 100, 50, 255]))
    }
}

/// Applier fake recording the size of every canvas it receives.
#[derive(Debug, Default)]
pub struct RecordingApplier {
    applied: Mutex<Vec<(u32, u32)>>,
}

impl RecordingApplier {
    pub fn applied(&self) -> Vec<(u32, u32)> {
        self.applied.lock().unwrap().clone()
    }
}

impl BackgroundApplier for RecordingApplier {
    fn apply(&self, canvas: &RawImage) -> Result<()> {
        self.applied
            .lock()
            .unwrap()
            .push((canvas.width(), canvas.height()));
        Ok(())
    }
}

/// Builds a zip archive in memory from `(name, contents)` pairs.
pub fn zip_bytes(files: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, contents) in files {
        writer
            .start_file(*name, zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Writes a placeholder image file and returns its path as a string.
pub fn touch_image(dir: &Path, name: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, b"img").unwrap();
    path.to_string_lossy().into_owned()
}
