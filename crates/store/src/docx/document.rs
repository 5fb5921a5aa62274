//! An opened Word package
//!
//! `WordDocument` keeps every package entry in archive order and parses only
//! what the review engine needs: the main document part, its relationships,
//! the content types and the comments part. Everything else is written back
//! byte-for-byte on save.

use crate::docx::comments_io::{
    comment_range_end, comment_range_start, comment_reference_run, CommentsPart, NewComment,
    ParsedComment,
};
use crate::docx::content_types::ContentTypes;
use crate::docx::error::{DocxError, DocxResult};
use crate::docx::footnotes_io::{NotesParser, ParsedNote};
use crate::docx::relationships::{rels_path_for, resolve_target, Relationships, TargetMode};
use crate::docx::xml_tree::write_xml;
use crate::docx::{content_type_values, relationship_types};
use doc_model::{tags, DocModelError, LinkResolver, NodePath, XmlDocument, XmlElement};
use std::collections::BTreeMap;

pub(crate) const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
pub(crate) const ROOT_RELS_PART: &str = "_rels/.rels";
pub(crate) const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// A single file inside the package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub name: String,
    pub data: Vec<u8>,
}

/// Which parsed parts differ from the bytes they were loaded from
#[derive(Debug, Clone, Copy, Default)]
struct Modified {
    document: bool,
    relationships: bool,
    content_types: bool,
    comments: bool,
}

/// An opened `.docx` package
#[derive(Debug, Clone)]
pub struct WordDocument {
    entries: Vec<PackageEntry>,
    content_types: ContentTypes,
    main_part: String,
    document: XmlDocument,
    relationships: Relationships,
    comments: Option<CommentsPart>,
    comments_part: String,
    modified: Modified,
}

impl WordDocument {
    pub(crate) fn from_parts(
        entries: Vec<PackageEntry>,
        content_types: ContentTypes,
        main_part: String,
        document: XmlDocument,
        relationships: Relationships,
        comments: Option<(String, CommentsPart)>,
    ) -> DocxResult<Self> {
        if document.root.find(tags::BODY).is_none() {
            return Err(DocxError::InvalidStructure(format!(
                "{} has no w:body",
                main_part
            )));
        }

        let (comments_part, comments) = match comments {
            Some((name, part)) => (name, Some(part)),
            None => (resolve_target(&main_part, "comments.xml"), None),
        };

        Ok(Self {
            entries,
            content_types,
            main_part,
            document,
            relationships,
            comments,
            comments_part,
            modified: Modified::default(),
        })
    }

    /// A fresh package holding only `document` as its main part
    pub fn new(document: XmlDocument) -> DocxResult<Self> {
        let mut content_types = ContentTypes::default();
        content_types.add_default("rels", content_type_values::RELATIONSHIPS);
        content_types.add_default("xml", "application/xml");
        content_types.add_override(DEFAULT_MAIN_PART, content_type_values::DOCUMENT);

        let mut root_rels = Relationships::new();
        root_rels.add(relationship_types::DOCUMENT, DEFAULT_MAIN_PART, TargetMode::Internal);
        let entries = vec![PackageEntry {
            name: ROOT_RELS_PART.to_string(),
            data: root_rels.to_xml().into_bytes(),
        }];

        let mut doc = Self::from_parts(
            entries,
            content_types,
            DEFAULT_MAIN_PART.to_string(),
            document,
            Relationships::new(),
            None,
        )?;
        doc.modified = Modified {
            document: true,
            relationships: true,
            content_types: true,
            comments: false,
        };
        Ok(doc)
    }

    /// Name of the main document part, usually `word/document.xml`
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// Raw bytes of a package entry as loaded
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.data.as_slice())
    }

    /// The parsed main document part
    pub fn document(&self) -> &XmlDocument {
        &self.document
    }

    /// The `w:body` element; body paths are relative to it
    pub fn body(&self) -> DocxResult<&XmlElement> {
        self.document
            .root
            .find(tags::BODY)
            .ok_or_else(|| DocxError::InvalidStructure("Document has no w:body".to_string()))
    }

    /// Mutable `w:body`; marks the main part as changed
    pub fn body_mut(&mut self) -> DocxResult<&mut XmlElement> {
        self.modified.document = true;
        self.document
            .root
            .find_mut(tags::BODY)
            .ok_or_else(|| DocxError::InvalidStructure("Document has no w:body".to_string()))
    }

    /// Relationships of the main document part
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// File name of the packaged image a relationship points to
    pub fn media_file_name(&self, rel_id: &str) -> Option<String> {
        let rel = self.relationships.get(rel_id)?;
        if rel.target_mode == TargetMode::External || rel.rel_type != relationship_types::IMAGE {
            return None;
        }
        let target = resolve_target(&self.main_part, &rel.target);
        target.rsplit('/').next().map(str::to_string)
    }

    /// Footnotes, separators excluded
    pub fn footnotes(&self) -> DocxResult<Vec<ParsedNote>> {
        match self.related_part_text(relationship_types::FOOTNOTES)? {
            Some(xml) => NotesParser::parse_footnotes_xml(&xml),
            None => Ok(Vec::new()),
        }
    }

    /// Endnotes, separators excluded
    pub fn endnotes(&self) -> DocxResult<Vec<ParsedNote>> {
        match self.related_part_text(relationship_types::ENDNOTES)? {
            Some(xml) => NotesParser::parse_endnotes_xml(&xml),
            None => Ok(Vec::new()),
        }
    }

    fn related_part_text(&self, rel_type: &str) -> DocxResult<Option<String>> {
        let Some(rel) = self.relationships.get_by_type(rel_type) else {
            return Ok(None);
        };
        let name = resolve_target(&self.main_part, &rel.target);
        match self.part(&name) {
            Some(bytes) => Ok(Some(String::from_utf8(bytes.to_vec())?)),
            None => {
                tracing::warn!(part = %name, "Related part listed in relationships is missing");
                Ok(None)
            }
        }
    }

    /// Comments already stored in the package
    pub fn comments(&self) -> Vec<ParsedComment> {
        self.comments
            .as_ref()
            .map(CommentsPart::comments)
            .unwrap_or_default()
    }

    /// Number of comments per author
    pub fn comment_counts(&self) -> BTreeMap<String, usize> {
        self.comments
            .as_ref()
            .map(CommentsPart::count_by_author)
            .unwrap_or_default()
    }

    /// Attach a comment spanning the runs from `first` to `last` (inclusive).
    ///
    /// Both paths are relative to `w:body` and `first` must not come after
    /// `last` in document order. Inserts `w:commentRangeStart` before `first`,
    /// `w:commentRangeEnd` and a reference run after `last`, and appends the
    /// comment to the comments part, creating that part when missing.
    pub fn add_comment(
        &mut self,
        first: &NodePath,
        last: &NodePath,
        comment: &NewComment,
    ) -> DocxResult<i64> {
        if first > last {
            return Err(DocModelError::InvalidOperation(format!(
                "comment range starts at {} after it ends at {}",
                first, last
            ))
            .into());
        }
        let (first_parent, first_index) = split_path(first)?;
        let (last_parent, last_index) = split_path(last)?;
        {
            let body = self.body()?;
            for path in [first, last] {
                if body.get(path).is_none() {
                    return Err(DocModelError::PathNotFound(path.clone()).into());
                }
            }
        }

        let id = self.comments_part_mut().add(comment);

        let body = self.body_mut()?;
        let parent = body.require_mut(&last_parent)?;
        parent.insert_child(last_index + 1, comment_range_end(id))?;
        parent.insert_child(last_index + 2, comment_reference_run(id))?;
        body.require_mut(&first_parent)?
            .insert_child(first_index, comment_range_start(id))?;

        tracing::debug!(comment_id = id, first = %first, last = %last, "Comment markers inserted");
        Ok(id)
    }

    fn comments_part_mut(&mut self) -> &mut CommentsPart {
        if self.comments.is_none() {
            let target = relative_target(&self.main_part, &self.comments_part);
            self.relationships
                .add(relationship_types::COMMENTS, &target, TargetMode::Internal);
            self.content_types
                .add_override(&self.comments_part, content_type_values::COMMENTS);
            self.modified.relationships = true;
            self.modified.content_types = true;
            tracing::debug!(part = %self.comments_part, "Created comments part");
        }
        self.modified.comments = true;
        self.comments.get_or_insert_with(CommentsPart::new)
    }

    /// Entries to write, in order: original entries with changed parts
    /// replaced, followed by parts that did not exist before.
    pub(crate) fn output_entries(&self) -> DocxResult<Vec<PackageEntry>> {
        let mut replacements: Vec<(String, Vec<u8>)> = Vec::new();
        if self.modified.document {
            replacements.push((self.main_part.clone(), write_xml(&self.document)?.into_bytes()));
        }
        if self.modified.relationships {
            replacements.push((
                rels_path_for(&self.main_part),
                self.relationships.to_xml().into_bytes(),
            ));
        }
        if self.modified.content_types {
            replacements.push((CONTENT_TYPES_PART.to_string(), self.content_types.to_xml().into_bytes()));
        }
        if self.modified.comments {
            if let Some(comments) = &self.comments {
                replacements.push((
                    self.comments_part.clone(),
                    write_xml(comments.document())?.into_bytes(),
                ));
            }
        }

        let mut output = Vec::with_capacity(self.entries.len() + replacements.len());
        for entry in &self.entries {
            match replacements.iter().position(|(name, _)| *name == entry.name) {
                Some(index) => {
                    let (name, data) = replacements.swap_remove(index);
                    output.push(PackageEntry { name, data });
                }
                None => output.push(entry.clone()),
            }
        }
        // Parts created by this session
        output.extend(
            replacements
                .into_iter()
                .map(|(name, data)| PackageEntry { name, data }),
        );
        Ok(output)
    }
}

impl LinkResolver for Relationships {
    fn resolve(&self, rel_id: &str) -> Option<String> {
        self.get(rel_id)
            .filter(|rel| rel.rel_type == relationship_types::HYPERLINK)
            .map(|rel| rel.target.clone())
    }
}

fn split_path(path: &NodePath) -> DocxResult<(NodePath, usize)> {
    match (path.parent(), path.last_index()) {
        (Some(parent), Some(index)) => Ok((parent, index)),
        _ => Err(DocModelError::InvalidOperation("the body itself cannot be commented".to_string()).into()),
    }
}

/// Target of `part` as written in the relationships of `source`
fn relative_target(source: &str, part: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, _)) => part
            .strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
            .unwrap_or_else(|| format!("/{}", part)),
        None => part.to_string(),
    }
}
