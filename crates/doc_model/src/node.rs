//! WordprocessingML node classification

use crate::XmlElement;
use serde::{Deserialize, Serialize};

/// Qualified names of the elements the engine reads or writes
pub mod tags {
    pub const DOCUMENT: &str = "w:document";
    pub const BODY: &str = "w:body";
    pub const PARAGRAPH: &str = "w:p";
    pub const TABLE: &str = "w:tbl";
    pub const TABLE_GRID: &str = "w:tblGrid";
    pub const GRID_COL: &str = "w:gridCol";
    pub const TABLE_ROW: &str = "w:tr";
    pub const TABLE_ROW_PROPERTIES: &str = "w:trPr";
    pub const GRID_BEFORE: &str = "w:gridBefore";
    pub const TABLE_CELL: &str = "w:tc";
    pub const TABLE_CELL_PROPERTIES: &str = "w:tcPr";
    pub const GRID_SPAN: &str = "w:gridSpan";
    pub const VERTICAL_MERGE: &str = "w:vMerge";
    pub const SDT: &str = "w:sdt";
    pub const SDT_PROPERTIES: &str = "w:sdtPr";
    pub const SDT_CONTENT: &str = "w:sdtContent";
    pub const DOC_PART_OBJ: &str = "w:docPartObj";
    pub const DOC_PART_GALLERY: &str = "w:docPartGallery";
    pub const RUN: &str = "w:r";
    pub const RUN_PROPERTIES: &str = "w:rPr";
    pub const RUN_STYLE: &str = "w:rStyle";
    pub const TEXT: &str = "w:t";
    pub const BOLD: &str = "w:b";
    pub const ITALIC: &str = "w:i";
    pub const HYPERLINK: &str = "w:hyperlink";
    pub const INSERTION: &str = "w:ins";
    pub const DELETION: &str = "w:del";
    pub const MOVE_TO: &str = "w:moveTo";
    pub const MOVE_FROM: &str = "w:moveFrom";
    pub const FOOTNOTE_REFERENCE: &str = "w:footnoteReference";
    pub const ENDNOTE_REFERENCE: &str = "w:endnoteReference";
    pub const COMMENT: &str = "w:comment";
    pub const COMMENTS: &str = "w:comments";
    pub const COMMENT_RANGE_START: &str = "w:commentRangeStart";
    pub const COMMENT_RANGE_END: &str = "w:commentRangeEnd";
    pub const COMMENT_REFERENCE: &str = "w:commentReference";
    pub const ANNOTATION_REF: &str = "w:annotationRef";
    pub const PARAGRAPH_PROPERTIES: &str = "w:pPr";
    pub const PARAGRAPH_STYLE: &str = "w:pStyle";
    pub const BLIP: &str = "a:blip";
    pub const VML_IMAGE_DATA: &str = "v:imagedata";
    pub const MATH: &str = "m:oMath";
    pub const MATH_TEXT: &str = "m:t";

    pub const VAL: &str = "w:val";
    pub const ID: &str = "w:id";
    pub const RELATIONSHIP_ID: &str = "r:id";
    pub const RELATIONSHIP_EMBED: &str = "r:embed";
    pub const RELATIONSHIP_LINK: &str = "r:link";
    pub const XML_SPACE: &str = "xml:space";
}

/// The closed set of elements that shape run numbering.
///
/// Everything else in a paragraph or body is either ignored (bookmarks,
/// properties, range markers) or opaque to the walker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Paragraph,
    Table,
    /// `w:sdt` at block or inline level
    StructuredContent,
    Run,
    Hyperlink,
    /// `w:ins`, and `w:moveTo` which reads the same in the accepted view
    Insertion,
    /// `w:del`, and `w:moveFrom`
    Deletion,
}

impl NodeKind {
    /// Classify an element by qualified name
    pub fn classify(element: &XmlElement) -> Option<Self> {
        match element.name.as_str() {
            tags::PARAGRAPH => Some(NodeKind::Paragraph),
            tags::TABLE => Some(NodeKind::Table),
            tags::SDT => Some(NodeKind::StructuredContent),
            tags::RUN => Some(NodeKind::Run),
            tags::HYPERLINK => Some(NodeKind::Hyperlink),
            tags::INSERTION | tags::MOVE_TO => Some(NodeKind::Insertion),
            tags::DELETION | tags::MOVE_FROM => Some(NodeKind::Deletion),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(NodeKind::classify(&XmlElement::new("w:p")), Some(NodeKind::Paragraph));
        assert_eq!(NodeKind::classify(&XmlElement::new("w:moveTo")), Some(NodeKind::Insertion));
        assert_eq!(NodeKind::classify(&XmlElement::new("w:moveFrom")), Some(NodeKind::Deletion));
        assert_eq!(NodeKind::classify(&XmlElement::new("w:bookmarkStart")), None);
        assert_eq!(NodeKind::classify(&XmlElement::new("m:r")), None);
    }
}
