// SPDX-License-Identifier: MPL-2.0
//! XML persistence for catalogs.
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <List>
//!   <FilePath>/walls/a.jpg</FilePath>
//!   <ThumbnailPath>/walls/a.jpg</ThumbnailPath>
//!   <Dimensions>1920x1080</Dimensions>
//! </List>
//! ```
//!
//! Records are flat triples in document order.

use crate::error::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use std::fs;
use std::path::Path;

const ROOT: &str = "List";
const FILE_PATH: &str = "FilePath";
const THUMBNAIL_PATH: &str = "ThumbnailPath";
const DIMENSIONS: &str = "Dimensions";

/// One persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredEntry {
    pub source: String,
    pub thumbnail_source: String,
    pub dimensions: String,
}

fn parse_err(err: impl Display) -> Error {
    Error::Parse(format!("catalog: {err}"))
}

fn write_err(err: impl Display) -> Error {
    Error::Io(std::io::Error::other(err.to_string()))
}

/// Reads records from `path`. A missing file yields no records.
pub fn read_entries(path: &Path) -> Result<Vec<StoredEntry>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    parse_entries(&content)
}

/// Parses catalog XML.
///
/// Field values are taken verbatim. Whitespace-only text is skipped.
pub fn parse_entries(content: &str) -> Result<Vec<StoredEntry>> {
    let mut reader = Reader::from_str(content);

    let mut entries = Vec::new();
    let mut saw_root = false;
    let mut closed_root = false;
    let mut current: Option<StoredEntry> = None;
    let mut field: Option<String> = None;

    loop {
        match reader.read_event().map_err(parse_err)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if !saw_root {
                    if name != ROOT {
                        return Err(parse_err(format!("invalid root element <{name}>")));
                    }
                    saw_root = true;
                    continue;
                }
                if name == FILE_PATH {
                    if let Some(done) = current.take() {
                        push_record(&mut entries, done);
                    }
                    current = Some(StoredEntry::default());
                }
                field = Some(name);
            }
            Event::Empty(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if !saw_root {
                    if name != ROOT {
                        return Err(parse_err(format!("invalid root element <{name}>")));
                    }
                    saw_root = true;
                    closed_root = true;
                } else if name == FILE_PATH {
                    if let Some(done) = current.take() {
                        push_record(&mut entries, done);
                    }
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(parse_err)?;
                if text.trim().is_empty() {
                    continue;
                }
                if let (Some(record), Some(name)) = (current.as_mut(), field.as_deref()) {
                    match name {
                        FILE_PATH => record.source.push_str(&text),
                        THUMBNAIL_PATH => record.thumbnail_source.push_str(&text),
                        DIMENSIONS => record.dimensions.push_str(&text),
                        _ => {}
                    }
                } else if !saw_root {
                    return Err(parse_err("text before root element"));
                }
            }
            Event::End(e) => {
                if e.name().as_ref() == ROOT.as_bytes() {
                    closed_root = true;
                }
                field = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(parse_err("missing <List> root element"));
    }
    if !closed_root {
        return Err(parse_err("unterminated <List> element"));
    }
    if let Some(done) = current.take() {
        push_record(&mut entries, done);
    }
    Ok(entries)
}

fn push_record(entries: &mut Vec<StoredEntry>, mut record: StoredEntry) {
    if record.source.is_empty() {
        return;
    }
    if record.thumbnail_source.is_empty() {
        record.thumbnail_source.clone_from(&record.source);
    }
    entries.push(record);
}

/// Serializes records to catalog XML.
pub fn render_entries<'a>(entries: impl IntoIterator<Item = &'a StoredEntry>) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_err)?;
    writer
        .write_event(Event::Start(BytesStart::new(ROOT)))
        .map_err(write_err)?;
    for entry in entries {
        for (name, value) in [
            (FILE_PATH, entry.source.as_str()),
            (THUMBNAIL_PATH, entry.thumbnail_source.as_str()),
            (DIMENSIONS, entry.dimensions.as_str()),
        ] {
            if value.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(name)))
                    .map_err(write_err)?;
                continue;
            }
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(write_err)?;
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(write_err)?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(write_err)?;
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(write_err)?;

    String::from_utf8(writer.into_inner()).map_err(write_err)
}

/// Writes records to `path`, creating parent directories.
pub fn write_entries<'a>(
    path: &Path,
    entries: impl IntoIterator<Item = &'a StoredEntry>,
) -> Result<()> {
    let content = render_entries(entries)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(source: &str, thumb: &str, dims: &str) -> StoredEntry {
        StoredEntry {
            source: source.to_string(),
            thumbnail_source: thumb.to_string(),
            dimensions: dims.to_string(),
        }
    }

    #[test]
    fn missing_file_yields_no_records() {
        let dir = tempdir().expect("failed to create temp dir");
        let entries = read_entries(&dir.path().join("absent.xml")).expect("read should succeed");
        assert!(entries.is_empty());
    }

    #[test]
    fn write_then_read_preserves_order_and_fields() {
        let dir = tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested").join("list.xml");
        let records = vec![
            record("/w/b & c.jpg", "/w/b & c.jpg", "800x600"),
            record("http://host/a.png", "http://host/t/a.png", ""),
        ];

        write_entries(&path, &records).expect("write should succeed");
        let loaded = read_entries(&path).expect("read should succeed");

        assert_eq!(loaded, records);
    }

    #[test]
    fn surrounding_spaces_in_paths_survive_a_round_trip() {
        let records = vec![
            record(" /w/a b.jpg ", "\t/w/thumb a.jpg", ""),
            record("/w/c.jpg", "/w/c.jpg", "640x480"),
        ];

        let xml = render_entries(&records).expect("render should succeed");
        let loaded = parse_entries(&xml).expect("parse should succeed");

        assert_eq!(loaded, records);
    }

    #[test]
    fn indented_documents_parse_without_stray_whitespace() {
        let xml = "<?xml version=\"1.0\"?>\n<List>\n  <FilePath>/w/a.jpg</FilePath>\n  \
                   <ThumbnailPath>\n  </ThumbnailPath>\n  <Dimensions>10x10</Dimensions>\n</List>\n";
        let loaded = parse_entries(xml).expect("parse should succeed");
        assert_eq!(loaded, vec![record("/w/a.jpg", "/w/a.jpg", "10x10")]);
    }

    #[test]
    fn empty_list_round_trips() {
        let none: Vec<StoredEntry> = Vec::new();
        let xml = render_entries(&none).expect("render should succeed");
        assert!(parse_entries(&xml).expect("parse should succeed").is_empty());
        assert!(parse_entries("<List/>").expect("parse should succeed").is_empty());
    }

    #[test]
    fn empty_thumbnail_defaults_to_source() {
        let xml = "<List><FilePath>/w/a.jpg</FilePath><ThumbnailPath/><Dimensions/></List>";
        let loaded = parse_entries(xml).expect("parse should succeed");
        assert_eq!(loaded, vec![record("/w/a.jpg", "/w/a.jpg", "")]);
    }

    #[test]
    fn wrong_root_is_a_parse_error() {
        let err = parse_entries("<Catalog></Catalog>").expect_err("should fail");
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let err = parse_entries("<List><FilePath>/w/a.jpg</FilePath>").expect_err("should fail");
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(parse_entries("not xml at all").is_err());
        assert!(parse_entries("").is_err());
    }
}
