//! Relationships (.rels) file parsing and generation
//!
//! DOCX uses relationships to connect parts of the document together: the main
//! document part to its hyperlink targets, media, notes and comments.

use crate::docx::error::{DocxError, DocxResult};
use crate::docx::namespaces;
use crate::docx::reader::{XmlParser, XML_DECLARATION};
use quick_xml::events::{BytesStart, Event};

/// A single relationship in a .rels file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Unique ID within the rels file (e.g., "rId1")
    pub id: String,
    /// Relationship type URI
    pub rel_type: String,
    /// Target path (relative to the source part) or external URL
    pub target: String,
    /// Target mode (Internal or External)
    pub target_mode: TargetMode,
}

/// Target mode for relationships
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TargetMode {
    /// Internal target within the package
    #[default]
    Internal,
    /// External target (URL)
    External,
}

/// Collection of relationships from a .rels file, in file order
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    relationships: Vec<Relationship>,
    /// Counter for generating new IDs
    next_id: u32,
}

impl Relationships {
    /// Create a new empty relationships collection
    pub fn new() -> Self {
        Self {
            relationships: Vec::new(),
            next_id: 1,
        }
    }

    /// Parse a .rels file from its XML content
    pub fn parse(content: &str) -> DocxResult<Self> {
        let mut relationships = Vec::new();
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e)
                    if XmlParser::matches_element(e.name().as_ref(), "Relationship") =>
                {
                    relationships.push(Relationship::from_element(e)?);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        // New IDs continue after the highest numeric `rIdN`
        let next_id = relationships
            .iter()
            .filter_map(|r| r.id.strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        Ok(Self { relationships, next_id })
    }

    /// Add a relationship and return its ID
    pub fn add(&mut self, rel_type: &str, target: &str, target_mode: TargetMode) -> String {
        let mut id = format!("rId{}", self.next_id);
        while self.contains(&id) {
            self.next_id += 1;
            id = format!("rId{}", self.next_id);
        }
        self.next_id += 1;

        self.relationships.push(Relationship {
            id: id.clone(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode,
        });

        id
    }

    /// Get a relationship by ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    /// Get the first relationship of a given type
    pub fn get_by_type(&self, rel_type: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.rel_type == rel_type)
    }

    /// Check if a relationship exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Relationships in file order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    /// Serialize as a .rels part
    pub fn to_xml(&self) -> String {
        let mut xml = format!(
            "{}\n<Relationships xmlns=\"{}\">",
            XML_DECLARATION,
            namespaces::PKG_REL
        );
        for rel in &self.relationships {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_attr(&rel.id),
                escape_attr(&rel.rel_type),
                escape_attr(&rel.target)
            ));
            if rel.target_mode == TargetMode::External {
                xml.push_str(r#" TargetMode="External""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</Relationships>");
        xml
    }
}

impl Relationship {
    fn from_element(e: &BytesStart<'_>) -> DocxResult<Self> {
        let required = |key: &[u8], name: &str| {
            XmlParser::get_attribute(e, key)
                .ok_or_else(|| DocxError::RelationshipError(format!("Relationship missing {}", name)))
        };
        Ok(Self {
            id: required(b"Id", "Id")?,
            rel_type: required(b"Type", "Type")?,
            target: required(b"Target", "Target")?,
            target_mode: match XmlParser::get_attribute(e, b"TargetMode").as_deref() {
                Some("External") => TargetMode::External,
                _ => TargetMode::Internal,
            },
        })
    }
}

/// Path of the .rels part that belongs to `part` (e.g. `word/document.xml`)
pub fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve an internal relationship target against the source part's folder
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

fn escape_attr(value: &str) -> String {
    quick_xml::escape::escape(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::relationship_types;

    const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/?a=1&amp;b=2" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_relationships_parsing() {
        let rels = Relationships::parse(DOCUMENT_RELS).unwrap();
        assert_eq!(rels.len(), 2);

        let r1 = rels.get("rId1").unwrap();
        assert_eq!(r1.target, "styles.xml");
        assert_eq!(r1.target_mode, TargetMode::Internal);

        let r2 = rels.get("rId2").unwrap();
        assert_eq!(r2.target, "https://example.com/?a=1&b=2");
        assert_eq!(r2.target_mode, TargetMode::External);
    }

    #[test]
    fn test_add_continues_numbering() {
        let mut rels = Relationships::parse(DOCUMENT_RELS).unwrap();
        let id = rels.add(relationship_types::COMMENTS, "comments.xml", TargetMode::Internal);
        assert_eq!(id, "rId3");
        assert_eq!(rels.get("rId3").map(|r| r.target.as_str()), Some("comments.xml"));
    }

    #[test]
    fn test_add_skips_taken_ids() {
        let mut rels = Relationships::new();
        rels.relationships.push(Relationship {
            id: "rId1".to_string(),
            rel_type: relationship_types::IMAGE.to_string(),
            target: "media/image1.png".to_string(),
            target_mode: TargetMode::Internal,
        });
        let id = rels.add(relationship_types::COMMENTS, "comments.xml", TargetMode::Internal);
        assert_eq!(id, "rId2");
    }

    #[test]
    fn test_to_xml_roundtrip_keeps_order() {
        let original = Relationships::parse(DOCUMENT_RELS).unwrap();
        let parsed = Relationships::parse(&original.to_xml()).unwrap();
        let ids: Vec<&str> = parsed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rId1", "rId2"]);
        assert_eq!(parsed.get("rId2"), original.get("rId2"));
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_path_for("document.xml"), "_rels/document.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("word/document.xml", "media/image1.png"), "word/media/image1.png");
        assert_eq!(resolve_target("word/document.xml", "../customXml/item1.xml"), "customXml/item1.xml");
        assert_eq!(resolve_target("word/document.xml", "/word/footnotes.xml"), "word/footnotes.xml");
        assert_eq!(resolve_target("", "word/document.xml"), "word/document.xml");
    }
}
