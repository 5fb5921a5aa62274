//! Footnotes and Endnotes parsing for DOCX
//!
//! Reads word/footnotes.xml and word/endnotes.xml so their text can be listed
//! next to the `w:footnoteReference` / `w:endnoteReference` runs that cite them.

use crate::docx::error::DocxResult;
use crate::docx::xml_tree::parse_xml;
use doc_model::{tags, XmlElement};
use serde::Serialize;

/// Values of `w:type` that mark layout-only notes
const SEPARATOR_TYPES: [&str; 3] = ["separator", "continuationSeparator", "continuationNotice"];

/// Type of note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Footnote,
    Endnote,
}

impl NoteType {
    fn tag(&self) -> &'static str {
        match self {
            NoteType::Footnote => "w:footnote",
            NoteType::Endnote => "w:endnote",
        }
    }
}

/// Parser for footnotes and endnotes in DOCX
pub struct NotesParser;

impl NotesParser {
    /// Parse footnotes.xml file
    pub fn parse_footnotes_xml(content: &str) -> DocxResult<Vec<ParsedNote>> {
        Self::parse_notes_xml(content, NoteType::Footnote)
    }

    /// Parse endnotes.xml file
    pub fn parse_endnotes_xml(content: &str) -> DocxResult<Vec<ParsedNote>> {
        Self::parse_notes_xml(content, NoteType::Endnote)
    }

    /// Separator notes are skipped; paragraphs within a note are joined
    /// with newlines.
    fn parse_notes_xml(content: &str, note_type: NoteType) -> DocxResult<Vec<ParsedNote>> {
        let document = parse_xml(content)?;
        let notes = document
            .root
            .find_all(note_type.tag())
            .filter(|note| !is_separator(note))
            .map(|note| ParsedNote {
                id: note.first_attribute(&[tags::ID, "id"]).unwrap_or_default().to_string(),
                note_type,
                content: note_text(note),
            })
            .collect();
        Ok(notes)
    }
}

fn is_separator(note: &XmlElement) -> bool {
    note.first_attribute(&["w:type", "type"])
        .map(|kind| SEPARATOR_TYPES.contains(&kind))
        .unwrap_or(false)
}

fn note_text(note: &XmlElement) -> String {
    note.find_all(tags::PARAGRAPH)
        .map(|para| para.descendant_text(tags::TEXT))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parsed note data from DOCX
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedNote {
    /// DOCX note ID as written in `w:id`
    pub id: String,
    pub note_type: NoteType,
    /// Note text, paragraphs joined with newlines
    pub content: String,
}
