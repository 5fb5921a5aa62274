//! Store - Word package I/O and reviewer settings
//!
//! This crate opens `.docx` packages into an editable `WordDocument`, writes
//! them back preserving every untouched entry, and loads the reviewer
//! settings used when comments are written.

mod error;
pub mod settings;
pub mod docx;

pub use error::*;
pub use settings::{ReviewSettings, SettingsManager};

// Re-export DOCX functionality
pub use docx::{
    open_docx, open_docx_bytes, output_path_for, save_docx, save_docx_bytes,
    DocxError, DocxResult, NewComment, ParsedComment, ParsedNote, WordDocument,
};
