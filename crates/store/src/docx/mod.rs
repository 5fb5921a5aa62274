//! Word package access.
//!
//! A .docx file is a ZIP archive of XML parts tied together by relationship
//! files and typed by `[Content_Types].xml`. The main document part, its
//! relationships, the content types and the comments part are parsed for
//! editing; footnotes and endnotes are parsed on demand for listing. Every
//! other entry passes through to the saved archive byte for byte.

mod error;
mod reader;
mod content_types;
mod relationships;
mod xml_tree;
mod parser;
mod document;
mod writer;
mod api;
mod comments_io;
mod footnotes_io;

pub use error::{DocxError, DocxResult};
pub use api::{open_docx, open_docx_bytes, output_path_for, save_docx, save_docx_bytes};
pub use document::{PackageEntry, WordDocument};
pub use content_types::ContentTypes;
pub use relationships::{resolve_target, rels_path_for, Relationship, Relationships, TargetMode};
pub use xml_tree::{parse_xml, write_xml};
pub use comments_io::{
    comment_range_end, comment_range_start, comment_reference_run, marker_comment_id,
    CommentsPart, NewComment, ParsedComment,
};
pub use footnotes_io::{NoteType, NotesParser, ParsedNote};

/// Namespace URIs written into generated parts
pub mod namespaces {
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
}

/// Relationship type URIs the package code looks up or creates
pub mod relationship_types {
    pub const DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
    pub const FOOTNOTES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footnotes";
    pub const ENDNOTES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/endnotes";
    pub const COMMENTS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
}

/// Content types of generated or checked parts
pub mod content_type_values {
    pub const DOCUMENT: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const COMMENTS: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
}
