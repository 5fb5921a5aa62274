//! Run locator - global run ID back to the run element
//!
//! Lookups replay [`enumerate_runs`] from the start of the body, so a located
//! run is exactly the run the reader listed under the same ID.

use crate::error::{Result, ReviewError};
use crate::runs::{enumerate_runs, RunRef};
use doc_model::{LinkResolver, NodePath, XmlElement};

/// Owned location of a run, valid until the body is next mutated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedRun {
    pub id: usize,
    /// Path from `w:body`
    pub path: NodePath,
    pub paragraph_path: NodePath,
    pub is_hyperlink: bool,
}

impl From<RunRef<'_>> for LocatedRun {
    fn from(run: RunRef<'_>) -> Self {
        Self {
            id: run.id,
            path: run.path,
            paragraph_path: run.paragraph_path,
            is_hyperlink: run.is_hyperlink,
        }
    }
}

/// Find the run with global ID `id`
pub fn locate_run(body: &XmlElement, links: &dyn LinkResolver, id: i64) -> Result<LocatedRun> {
    let index = usize::try_from(id)
        .map_err(|_| ReviewError::NotFound(format!("Run {} not found in document", id)))?;
    enumerate_runs(body, links)
        .nth(index)
        .map(LocatedRun::from)
        .ok_or_else(|| ReviewError::NotFound(format!("Run {} not found in document", id)))
}

/// Find `count` consecutive runs starting at global ID `first`
pub fn locate_range(
    body: &XmlElement,
    links: &dyn LinkResolver,
    first: i64,
    count: usize,
) -> Result<Vec<LocatedRun>> {
    let start = usize::try_from(first)
        .map_err(|_| ReviewError::NotFound(format!("Run {} not found in document", first)))?;
    let located: Vec<LocatedRun> = enumerate_runs(body, links)
        .skip(start)
        .take(count)
        .map(LocatedRun::from)
        .collect();
    if located.len() < count {
        return Err(ReviewError::NotFound(format!(
            "Run {} not found in document",
            start + located.len()
        )));
    }
    tracing::debug!(first = start, count, "Located run range");
    Ok(located)
}
