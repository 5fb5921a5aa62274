//! Error types for document model operations

use crate::NodePath;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found at path {0}")]
    PathNotFound(NodePath),

    #[error("Node at path {0} is not an element")]
    NotAnElement(NodePath),

    #[error("Child index {index} out of bounds for element with {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type Result<T> = std::result::Result<T, DocModelError>;
