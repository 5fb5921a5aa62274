//! Reader output - the numbered run listing of a document
//!
//! The listing is what a reviewer reads before writing comment requests:
//! every run with its global ID, plus images, notes, equations and the
//! comments already present, keyed back to paragraphs and runs.

use crate::error::Result;
use crate::runs::{enumerate_runs, RunRef};
use crate::walker::paragraphs;
use doc_model::{tags, TableContext, XmlElement};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use store::docx::marker_comment_id;
use store::{ParsedNote, WordDocument};

/// One numbered run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInfo {
    pub id: usize,
    pub paragraph: usize,
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub is_hyperlink: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hyperlink_url: Option<String>,
    /// Inside a tracked insertion
    pub inserted: bool,
    /// Media file name of an embedded image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footnote_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endnote_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableContext>,
}

/// An image, listed once per media file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub filename: String,
    pub paragraph: usize,
    pub run: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquationInfo {
    pub paragraph: usize,
    pub text: String,
}

/// A comment present before this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExistingComment {
    pub id: i64,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub text: String,
    /// First paragraph holding one of its body markers
    pub paragraph: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentListing {
    pub runs: Vec<RunInfo>,
    pub images: Vec<ImageInfo>,
    pub footnotes: Vec<ParsedNote>,
    pub endnotes: Vec<ParsedNote>,
    pub equations: Vec<EquationInfo>,
    pub comments: Vec<ExistingComment>,
    pub total_runs: usize,
    pub total_chars: usize,
}

/// Build the listing of an opened document
pub fn read_listing(doc: &WordDocument) -> Result<DocumentListing> {
    let body = doc.body()?;
    let links = doc.relationships();

    let mut runs = Vec::new();
    let mut images = Vec::new();
    let mut seen_images = HashSet::new();
    for run in enumerate_runs(body, links) {
        let info = run_info(doc, &run);
        if let Some(filename) = &info.image {
            if seen_images.insert(filename.clone()) {
                images.push(ImageInfo {
                    filename: filename.clone(),
                    paragraph: info.paragraph,
                    run: info.id,
                });
            }
        }
        runs.push(info);
    }

    let total_chars = runs.iter().map(|r| r.text.chars().count()).sum();
    let listing = DocumentListing {
        total_runs: runs.len(),
        total_chars,
        runs,
        images,
        footnotes: doc.footnotes()?,
        endnotes: doc.endnotes()?,
        equations: equations(body),
        comments: existing_comments(doc, body),
    };
    tracing::debug!(
        runs = listing.total_runs,
        images = listing.images.len(),
        comments = listing.comments.len(),
        "Document listing built"
    );
    Ok(listing)
}

fn run_info(doc: &WordDocument, run: &RunRef<'_>) -> RunInfo {
    let formatting = run.formatting();
    RunInfo {
        id: run.id,
        paragraph: run.paragraph,
        text: run.text(),
        bold: formatting.bold,
        italic: formatting.italic,
        is_hyperlink: run.is_hyperlink,
        hyperlink_url: run.hyperlink_url.clone(),
        inserted: run.in_insertion,
        image: image_rel_id(run.element).and_then(|rel| doc.media_file_name(rel)),
        footnote_ref: note_reference(run.element, tags::FOOTNOTE_REFERENCE),
        endnote_ref: note_reference(run.element, tags::ENDNOTE_REFERENCE),
        table: run.table,
    }
}

/// Relationship ID of the first picture inside a run
fn image_rel_id(run: &XmlElement) -> Option<&str> {
    run.descendants().find_map(|element| {
        if element.is(tags::BLIP) {
            element.first_attribute(&[tags::RELATIONSHIP_EMBED, tags::RELATIONSHIP_LINK])
        } else if element.is(tags::VML_IMAGE_DATA) {
            element.attribute(tags::RELATIONSHIP_ID)
        } else {
            None
        }
    })
}

fn note_reference(run: &XmlElement, tag: &str) -> Option<String> {
    run.find(tag)
        .and_then(|reference| reference.attribute(tags::ID))
        .map(str::to_string)
}

/// Text of every `m:oMath` in walk order, with its paragraph
fn equations(body: &XmlElement) -> Vec<EquationInfo> {
    let mut found = Vec::new();
    for visit in paragraphs(body) {
        for math in visit.element.descendants().filter(|e| e.is(tags::MATH)) {
            let text = math.descendant_text(tags::MATH_TEXT);
            if !text.trim().is_empty() {
                found.push(EquationInfo {
                    paragraph: visit.index,
                    text,
                });
            }
        }
    }
    found
}

fn existing_comments(doc: &WordDocument, body: &XmlElement) -> Vec<ExistingComment> {
    let parsed = doc.comments();
    if parsed.is_empty() {
        return Vec::new();
    }

    let mut anchors: BTreeMap<i64, usize> = BTreeMap::new();
    for visit in paragraphs(body) {
        for id in visit.element.descendants().filter_map(marker_comment_id) {
            anchors.entry(id).or_insert(visit.index);
        }
    }

    parsed
        .into_iter()
        .map(|comment| ExistingComment {
            paragraph: anchors.get(&comment.id).copied(),
            id: comment.id,
            author: comment.author,
            initials: comment.initials,
            date: comment.date,
            text: comment.content,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::XmlDocument;

    fn run(text: &str) -> XmlElement {
        XmlElement::new("w:r").with_child(XmlElement::new("w:t").with_text(text))
    }

    fn document(body: XmlElement) -> WordDocument {
        WordDocument::new(XmlDocument::new(XmlElement::new("w:document").with_child(body))).unwrap()
    }

    #[test]
    fn test_listing_runs_and_stats() {
        let body = XmlElement::new("w:body")
            .with_child(
                XmlElement::new("w:p")
                    .with_child(
                        XmlElement::new("w:r")
                            .with_child(XmlElement::new("w:rPr").with_child(XmlElement::new("w:i")))
                            .with_child(XmlElement::new("w:t").with_text("Über")),
                    )
                    .with_child(run("")),
            )
            .with_child(XmlElement::new("w:p").with_child(
                XmlElement::new("w:r").with_child(
                    XmlElement::new("w:footnoteReference").with_attribute("w:id", "2"),
                ),
            ));
        let listing = read_listing(&document(body)).unwrap();

        assert_eq!(listing.total_runs, 3);
        assert_eq!(listing.total_chars, 4);
        assert!(listing.runs[0].italic && !listing.runs[0].bold);
        assert_eq!(listing.runs[1].text, "");
        assert_eq!(listing.runs[2].paragraph, 1);
        assert_eq!(listing.runs[2].footnote_ref.as_deref(), Some("2"));
        assert!(listing.footnotes.is_empty());
    }

    #[test]
    fn test_equations_keyed_by_paragraph() {
        let math = XmlElement::new("m:oMath")
            .with_child(XmlElement::new("m:r").with_child(XmlElement::new("m:t").with_text("x+1")));
        let body = XmlElement::new("w:body")
            .with_child(XmlElement::new("w:p").with_child(run("Intro")))
            .with_child(XmlElement::new("w:p").with_child(XmlElement::new("m:oMathPara").with_child(math)));
        let listing = read_listing(&document(body)).unwrap();

        assert_eq!(
            listing.equations,
            vec![EquationInfo {
                paragraph: 1,
                text: "x+1".to_string()
            }]
        );
        assert_eq!(listing.total_runs, 1);
    }

    #[test]
    fn test_listing_serializes_without_empty_fields() {
        let body = XmlElement::new("w:body").with_child(XmlElement::new("w:p").with_child(run("a")));
        let listing = read_listing(&document(body)).unwrap();
        let json = serde_json::to_value(&listing).unwrap();
        let run = &json["runs"][0];
        assert_eq!(run["text"], "a");
        assert!(run.get("table").is_none());
        assert!(run.get("hyperlink_url").is_none());
    }
}
