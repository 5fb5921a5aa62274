//! Review Engine - numbered runs and batch commenting for Word documents
//!
//! Reading walks the body paragraph by paragraph and numbers every run in
//! the accepted-revision view. Commenting resolves those numbers back to
//! runs, optionally splits a run to isolate a phrase, and anchors comments
//! through the package's comments part.
//!
//! Run IDs are only meaningful for the exact bytes they were read from: a
//! batch must be applied to a fresh load of the same, unmodified package.

mod error;
mod walker;
mod runs;
mod locator;
mod splitter;
mod attach;
mod request;
mod scheduler;
mod listing;

pub use error::*;
pub use walker::*;
pub use runs::*;
pub use locator::*;
pub use splitter::*;
pub use attach::*;
pub use request::*;
pub use scheduler::*;
pub use listing::*;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use store::{open_docx, save_docx};

/// Open `path` and build its run listing
pub fn read_document(path: &Path) -> Result<DocumentListing> {
    let doc = open_docx(path)?;
    read_listing(&doc)
}

/// Apply `requests` to a fresh load of `input` and write the result to `output`.
///
/// The source package is never modified. The output is written even when
/// some requests fail, so the successful comments are kept.
pub fn comment_document(
    input: &Path,
    output: &Path,
    requests: &[CommentRequest],
    options: &CommentOptions,
) -> Result<BatchReport> {
    let mut doc = open_docx(input)?;
    let report = apply_batch(&mut doc, requests, options);
    save_docx(&doc, output)?;
    tracing::info!(
        output = %output.display(),
        successes = report.successes(),
        failures = report.failures(),
        "Commented document saved"
    );
    Ok(report)
}

/// Comment counts of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentStats {
    pub total: usize,
    pub by_author: BTreeMap<String, usize>,
}

impl CommentStats {
    pub fn from_author(&self, author: &str) -> usize {
        self.by_author.get(author).copied().unwrap_or(0)
    }
}

/// Count the comments stored in the package at `path`
pub fn verify_comments(path: &Path) -> Result<CommentStats> {
    let doc = open_docx(path)?;
    let by_author = doc.comment_counts();
    Ok(CommentStats {
        total: by_author.values().sum(),
        by_author,
    })
}
