//! Comments part (word/comments.xml) and body comment markers
//!
//! The comments part is held as an element tree so new comments can be
//! appended while existing ones are kept as they were written. The body side
//! of a comment is three markers: `w:commentRangeStart`, `w:commentRangeEnd`
//! and a reference run carrying `w:commentReference`.

use doc_model::{tags, text_element, XmlDocument, XmlElement};
use serde::Serialize;
use std::collections::BTreeMap;

const COMMENT_TEXT_STYLE: &str = "CommentText";
const COMMENT_REFERENCE_STYLE: &str = "CommentReference";

// =============================================================================
// Comments Part
// =============================================================================

/// The parsed comments part of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentsPart {
    document: XmlDocument,
}

impl Default for CommentsPart {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentsPart {
    /// An empty `w:comments` part
    pub fn new() -> Self {
        let root = XmlElement::new(tags::COMMENTS)
            .with_attribute("xmlns:w", crate::docx::namespaces::W)
            .with_attribute("xmlns:r", crate::docx::namespaces::R);
        Self {
            document: XmlDocument::new(root),
        }
    }

    /// Wrap an already parsed comments part
    pub fn from_document(document: XmlDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// All comments in part order
    pub fn comments(&self) -> Vec<ParsedComment> {
        self.document
            .root
            .find_all(tags::COMMENT)
            .filter_map(ParsedComment::from_element)
            .collect()
    }

    /// The ID the next comment will receive: one past the largest in use
    pub fn next_id(&self) -> i64 {
        self.document
            .root
            .find_all(tags::COMMENT)
            .filter_map(comment_id)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    /// Append a comment and return its ID
    pub fn add(&mut self, comment: &NewComment) -> i64 {
        let id = self.next_id();
        let mut element = XmlElement::new(tags::COMMENT)
            .with_attribute(tags::ID, id.to_string())
            .with_attribute("w:author", comment.author.as_str())
            .with_attribute("w:date", comment.date.as_str())
            .with_attribute("w:initials", comment.initials.as_str());

        let lines: Vec<&str> = comment.text.split('\n').map(|l| l.trim_end_matches('\r')).collect();
        for (index, line) in lines.iter().enumerate() {
            let mut para = XmlElement::new(tags::PARAGRAPH).with_child(
                XmlElement::new(tags::PARAGRAPH_PROPERTIES).with_child(
                    XmlElement::new(tags::PARAGRAPH_STYLE).with_attribute(tags::VAL, COMMENT_TEXT_STYLE),
                ),
            );
            if index == 0 {
                para = para.with_child(
                    styled_reference_run().with_child(XmlElement::new(tags::ANNOTATION_REF)),
                );
            }
            para = para.with_child(XmlElement::new(tags::RUN).with_child(text_element(line)));
            element = element.with_child(para);
        }

        self.document.root.children.push(element.into());
        id
    }

    /// Number of comments per author
    pub fn count_by_author(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for comment in self.comments() {
            *counts.entry(comment.author).or_insert(0) += 1;
        }
        counts
    }
}

/// Comment ID, accepting both the prefixed and the bare attribute name
fn comment_id(element: &XmlElement) -> Option<i64> {
    element
        .first_attribute(&[tags::ID, "id"])
        .and_then(|value| value.trim().parse().ok())
}

fn styled_reference_run() -> XmlElement {
    XmlElement::new(tags::RUN).with_child(
        XmlElement::new(tags::RUN_PROPERTIES).with_child(
            XmlElement::new(tags::RUN_STYLE).with_attribute(tags::VAL, COMMENT_REFERENCE_STYLE),
        ),
    )
}

// =============================================================================
// Body Markers
// =============================================================================

/// `w:commentRangeStart` placed before the first commented run
pub fn comment_range_start(id: i64) -> XmlElement {
    XmlElement::new(tags::COMMENT_RANGE_START).with_attribute(tags::ID, id.to_string())
}

/// `w:commentRangeEnd` placed after the last commented run
pub fn comment_range_end(id: i64) -> XmlElement {
    XmlElement::new(tags::COMMENT_RANGE_END).with_attribute(tags::ID, id.to_string())
}

/// Reference run placed right after `w:commentRangeEnd`
pub fn comment_reference_run(id: i64) -> XmlElement {
    styled_reference_run().with_child(
        XmlElement::new(tags::COMMENT_REFERENCE).with_attribute(tags::ID, id.to_string()),
    )
}

/// ID carried by a body comment marker, if `element` is one
pub fn marker_comment_id(element: &XmlElement) -> Option<i64> {
    if element.is(tags::COMMENT_RANGE_START) || element.is(tags::COMMENT_REFERENCE) {
        comment_id(element)
    } else {
        None
    }
}

// =============================================================================
// Comment Structures
// =============================================================================

/// A comment to be written
#[derive(Debug, Clone)]
pub struct NewComment {
    pub author: String,
    pub initials: String,
    /// Timestamp, RFC 3339
    pub date: String,
    /// Comment body; one paragraph per line
    pub text: String,
}

/// Comment read from the comments part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedComment {
    /// DOCX comment ID (integer)
    pub id: i64,
    /// Comment author
    pub author: String,
    /// Author initials
    pub initials: Option<String>,
    /// Comment date (ISO 8601 string)
    pub date: Option<String>,
    /// Comment text, paragraphs joined with newlines
    pub content: String,
}

impl ParsedComment {
    fn from_element(element: &XmlElement) -> Option<Self> {
        let id = comment_id(element)?;
        let content = element
            .find_all(tags::PARAGRAPH)
            .map(|para| para.descendant_text(tags::TEXT))
            .collect::<Vec<_>>()
            .join("\n");

        Some(Self {
            id,
            author: element
                .first_attribute(&["w:author", "author"])
                .unwrap_or_default()
                .to_string(),
            initials: element.first_attribute(&["w:initials", "initials"]).map(str::to_string),
            date: element.first_attribute(&["w:date", "date"]).map(str::to_string),
            content,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
