//! Main DOCX parsing logic
//!
//! Reads every entry of the archive, then parses the parts the review engine
//! works with into a `WordDocument`.

use crate::docx::comments_io::CommentsPart;
use crate::docx::content_types::ContentTypes;
use crate::docx::document::{
    PackageEntry, WordDocument, CONTENT_TYPES_PART, DEFAULT_MAIN_PART, ROOT_RELS_PART,
};
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::reader::DocxReader;
use crate::docx::relationships::{rels_path_for, resolve_target, Relationships};
use crate::docx::{content_type_values, relationship_types};
use crate::docx::xml_tree::parse_xml;
use std::io::{Read, Seek};

/// Main parser for DOCX files
pub struct DocxParser;

impl DocxParser {
    /// Parse a DOCX package. The reader is consumed and dropped before
    /// returning, all entries are held in memory.
    pub fn parse<R: Read + Seek>(reader: R) -> DocxResult<WordDocument> {
        let entries = {
            let mut docx = DocxReader::new(reader)?;
            docx.ensure_package()?;
            docx.read_entries()?
        };

        let entries: Vec<PackageEntry> = entries
            .into_iter()
            .map(|(name, data)| PackageEntry { name, data })
            .collect();
        Self::build(entries)
    }

    fn build(entries: Vec<PackageEntry>) -> DocxResult<WordDocument> {
        // Parse [Content_Types].xml
        let content_types = ContentTypes::parse(&entry_string(&entries, CONTENT_TYPES_PART)?)?;

        // Parse _rels/.rels and find the main document relationship
        let root_rels = Relationships::parse(&entry_string(&entries, ROOT_RELS_PART)?)?;
        let main_part = match root_rels.get_by_type(relationship_types::DOCUMENT) {
            Some(rel) => resolve_target("", &rel.target),
            None => {
                tracing::warn!("No officeDocument relationship, assuming {}", DEFAULT_MAIN_PART);
                DEFAULT_MAIN_PART.to_string()
            }
        };

        match content_types.get_content_type(&main_part) {
            Some(content_type_values::DOCUMENT) => {}
            other => tracing::warn!(
                part = %main_part,
                content_type = other.unwrap_or("none"),
                "Main part is not a plain WordprocessingML document"
            ),
        }
        let document = parse_xml(&entry_string(&entries, &main_part)?)?;

        let doc_rels_path = rels_path_for(&main_part);
        let relationships = if has_entry(&entries, &doc_rels_path) {
            Relationships::parse(&entry_string(&entries, &doc_rels_path)?)?
        } else {
            Relationships::new()
        };

        let comments = match relationships.get_by_type(relationship_types::COMMENTS) {
            Some(rel) => {
                let name = resolve_target(&main_part, &rel.target);
                if has_entry(&entries, &name) {
                    let part = CommentsPart::from_document(parse_xml(&entry_string(&entries, &name)?)?);
                    Some((name, part))
                } else {
                    tracing::warn!(part = %name, "Comments relationship points at a missing part");
                    None
                }
            }
            None => None,
        };

        tracing::debug!(
            main_part = %main_part,
            entries = entries.len(),
            relationships = relationships.len(),
            "Parsed DOCX package"
        );

        WordDocument::from_parts(entries, content_types, main_part, document, relationships, comments)
    }
}

fn has_entry(entries: &[PackageEntry], name: &str) -> bool {
    entries.iter().any(|entry| entry.name == name)
}

fn entry_string(entries: &[PackageEntry], name: &str) -> DocxResult<String> {
    let entry = entries
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| DocxError::MissingPart(name.to_string()))?;
    let text = String::from_utf8(entry.data.clone())?;
    // Strip a UTF-8 byte order mark
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}
