//! Error types for review operations

use store::DocxError;
use thiserror::Error;

/// Why a comment request, or a whole read/write invocation, failed.
///
/// The first four variants are per-request outcomes: the batch records them
/// and moves on. `Document` is only returned for failures that affect the
/// whole invocation, such as an unreadable package.
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("All target runs are empty")]
    EmptyTarget,

    #[error("Failed to attach comment: {0}")]
    AttachmentFailure(String),

    #[error("Document error: {0}")]
    Document(#[from] DocxError),
}

impl ReviewError {
    /// Short stable name of the error kind, for reports
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::NotFound(_) => "not_found",
            ReviewError::InvalidRequest(_) => "invalid_request",
            ReviewError::EmptyTarget => "empty_target",
            ReviewError::AttachmentFailure(_) => "attachment_failure",
            ReviewError::Document(_) => "document",
        }
    }
}

pub type Result<T> = std::result::Result<T, ReviewError>;
