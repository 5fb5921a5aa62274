//! Comment requests as submitted by a reviewer

use crate::error::{Result, ReviewError};
use serde::{Deserialize, Serialize};

/// One run ID or a list of them; JSON accepts `7` as well as `[7, 8, 9]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RunIds {
    One(i64),
    Many(Vec<i64>),
}

impl RunIds {
    pub fn as_slice(&self) -> &[i64] {
        match self {
            RunIds::One(id) => std::slice::from_ref(id),
            RunIds::Many(ids) => ids,
        }
    }

    /// Largest referenced ID, the scheduler's primary sort key
    pub fn max(&self) -> Option<i64> {
        self.as_slice().iter().copied().max()
    }
}

impl From<i64> for RunIds {
    fn from(id: i64) -> Self {
        RunIds::One(id)
    }
}

impl From<Vec<i64>> for RunIds {
    fn from(ids: Vec<i64>) -> Self {
        RunIds::Many(ids)
    }
}

/// A comment to attach to one run or a contiguous range of runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRequest {
    pub run_ids: RunIds,
    /// Comment body
    pub text: String,
    /// Phrase to isolate inside a single run before commenting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subset_text: Option<String>,
}

/// A request that passed shape validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest<'a> {
    /// First run ID of the range
    pub first: i64,
    /// Number of runs, at least 1
    pub count: usize,
    pub subset_text: Option<&'a str>,
}

impl CommentRequest {
    /// Comment on a single run
    pub fn single(id: i64, text: impl Into<String>) -> Self {
        Self {
            run_ids: RunIds::One(id),
            text: text.into(),
            subset_text: None,
        }
    }

    /// Comment on a range of runs
    pub fn range(ids: Vec<i64>, text: impl Into<String>) -> Self {
        Self {
            run_ids: RunIds::Many(ids),
            text: text.into(),
            subset_text: None,
        }
    }

    pub fn with_subset(mut self, subset_text: impl Into<String>) -> Self {
        self.subset_text = Some(subset_text.into());
        self
    }

    /// The sub-string to isolate; an empty string counts as none
    pub fn subset(&self) -> Option<&str> {
        self.subset_text.as_deref().filter(|s| !s.is_empty())
    }

    /// True if this request splits a run
    pub fn splits(&self) -> bool {
        self.subset().is_some()
    }

    /// Check the request's shape before touching the document
    pub fn validate(&self) -> Result<ValidRequest<'_>> {
        let ids = self.run_ids.as_slice();
        let Some(&first) = ids.first() else {
            return Err(ReviewError::InvalidRequest("No run IDs provided".to_string()));
        };
        if let Some(negative) = ids.iter().find(|id| **id < 0) {
            return Err(ReviewError::NotFound(format!("Run {} not found in document", negative)));
        }
        if ids.windows(2).any(|pair| pair[0].checked_add(1) != Some(pair[1])) {
            return Err(ReviewError::InvalidRequest(format!(
                "Run IDs must be a contiguous ascending range, got {:?}",
                ids
            )));
        }
        let subset_text = self.subset();
        if subset_text.is_some() && ids.len() > 1 {
            return Err(ReviewError::InvalidRequest(
                "subset_text can only be used with a single run ID".to_string(),
            ));
        }
        Ok(ValidRequest {
            first,
            count: ids.len(),
            subset_text,
        })
    }

    /// Human readable target, e.g. `run 4` or `runs 4-6`
    pub fn describe(&self) -> String {
        let ids = self.run_ids.as_slice();
        let target = match ids {
            [] => "no runs".to_string(),
            [id] => format!("run {}", id),
            [first, .., last] => format!("runs {}-{}", first, last),
        };
        match self.subset() {
            Some(subset) => format!("{} (on '{}')", target, subset),
            None => target,
        }
    }
}

/// Parse a batch of requests from JSON: an array of request objects
pub fn parse_batch(json: &str) -> serde_json::Result<Vec<CommentRequest>> {
    serde_json::from_str(json)
}
