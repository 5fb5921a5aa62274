//! Package-level errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a readable ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    XmlParse(String),

    /// The archive opened but its parts do not form a Word document
    #[error("invalid package: {0}")]
    InvalidStructure(String),

    #[error("package has no part named {0}")]
    MissingPart(String),

    #[error("bad relationship: {0}")]
    RelationshipError(String),

    #[error(transparent)]
    DocModel(#[from] doc_model::DocModelError),

    #[error("part is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl From<quick_xml::Error> for DocxError {
    fn from(err: quick_xml::Error) -> Self {
        DocxError::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocxError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DocxError::XmlParse(format!("attribute: {}", err))
    }
}

pub type DocxResult<T> = std::result::Result<T, DocxError>;
