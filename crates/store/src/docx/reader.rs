//! ZIP archive reading and XML parsing utilities

use crate::docx::error::{DocxError, DocxResult};
use quick_xml::events::BytesStart;
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Declaration written at the top of every generated part
pub(crate) const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Upper bound on the buffer reserved from an entry's declared size
const MAX_PREALLOCATION: u64 = 1 << 20;

/// Parts without which a package cannot be opened
const REQUIRED_PARTS: [&str; 2] = ["[Content_Types].xml", "_rels/.rels"];

/// A ZIP archive opened as a Word package
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    pub fn new(reader: R) -> DocxResult<Self> {
        Ok(Self {
            archive: ZipArchive::new(reader)?,
        })
    }

    pub fn has_entry(&self, name: &str) -> bool {
        self.archive.file_names().any(|entry| entry == name)
    }

    /// Fail with `MissingPart` unless the package parts are all present
    pub fn ensure_package(&self) -> DocxResult<()> {
        match REQUIRED_PARTS.iter().find(|part| !self.has_entry(part)) {
            Some(missing) => Err(DocxError::MissingPart(missing.to_string())),
            None => Ok(()),
        }
    }

    /// Every file entry with its bytes, in archive order. Directories are skipped.
    pub fn read_entries(&mut self) -> DocxResult<Vec<(String, Vec<u8>)>> {
        let mut entries = Vec::with_capacity(self.archive.len());
        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(capacity_hint(file.size()));
            file.read_to_end(&mut data)?;
            entries.push((file.name().to_string(), data));
        }
        Ok(entries)
    }
}

/// The declared uncompressed size comes from the archive and is untrusted
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_PREALLOCATION)).unwrap_or(0)
}

/// Helpers for the event-based parsers of package-level parts
pub struct XmlParser;

impl XmlParser {
    /// An event reader over `content`.
    ///
    /// Text is not trimmed.
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(false);
        reader
    }

    /// Unescaped value of the attribute named `name`
    pub fn get_attribute(event: &BytesStart, name: &[u8]) -> Option<String> {
        let attribute = event
            .attributes()
            .filter_map(Result::ok)
            .find(|a| a.key.as_ref() == name)?;
        match attribute.unescape_value() {
            Ok(value) => Some(value.into_owned()),
            Err(_) => Some(String::from_utf8_lossy(&attribute.value).into_owned()),
        }
    }

    /// True if `name` is `expected`, with or without a namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let local = match name.iter().rposition(|b| *b == b':') {
            Some(colon) => &name[colon + 1..],
            None => name,
        };
        local == expected.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn archive(names: &[&str]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(name.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn test_matches_element() {
        assert!(XmlParser::matches_element(b"Override", "Override"));
        assert!(XmlParser::matches_element(b"ct:Override", "Override"));
        assert!(!XmlParser::matches_element(b"Default", "Override"));
        assert!(!XmlParser::matches_element(b"xOverride", "Override"));
    }

    #[test]
    fn test_read_entries_keeps_order() {
        let bytes = archive(&["[Content_Types].xml", "_rels/.rels", "word/document.xml"]);
        let mut reader = DocxReader::new(Cursor::new(bytes)).unwrap();
        assert!(reader.ensure_package().is_ok());

        let entries = reader.read_entries().unwrap();
        let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]);
        assert_eq!(entries[2].1, b"word/document.xml".to_vec());
    }

    #[test]
    fn test_capacity_hint_is_capped() {
        assert_eq!(capacity_hint(512), 512);
        assert_eq!(capacity_hint(u64::MAX), MAX_PREALLOCATION as usize);
    }

    #[test]
    fn test_missing_part() {
        let bytes = archive(&["[Content_Types].xml"]);
        let reader = DocxReader::new(Cursor::new(bytes)).unwrap();
        assert!(matches!(
            reader.ensure_package(),
            Err(DocxError::MissingPart(part)) if part == "_rels/.rels"
        ));
    }
}
