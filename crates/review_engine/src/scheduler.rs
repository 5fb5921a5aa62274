//! Comment batch scheduler
//!
//! Requests are applied from the highest referenced run ID down. A split or
//! a comment reference run only adds elements after its target, so every
//! run with a lower ID still resolves to the run the caller saw in the
//! listing. Among requests sharing the same highest ID, splits go first.

use crate::attach::attach_comment;
use crate::error::{Result, ReviewError};
use crate::locator::{locate_range, LocatedRun};
use crate::request::{CommentRequest, RunIds, ValidRequest};
use crate::splitter::{apply_split, SplitPlan};
use chrono::{DateTime, SecondsFormat, Utc};
use doc_model::{NodePath, XmlElement};
use serde::Serialize;
use store::{NewComment, WordDocument};

/// Author details and timestamp shared by every comment of a batch
#[derive(Debug, Clone)]
pub struct CommentOptions {
    pub author: String,
    pub initials: String,
    pub timestamp: DateTime<Utc>,
}

impl CommentOptions {
    pub fn new(author: impl Into<String>, initials: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            initials: initials.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    fn comment(&self, text: &str) -> NewComment {
        NewComment {
            author: self.author.clone(),
            initials: self.initials.clone(),
            date: self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            text: text.to_string(),
        }
    }
}

/// Outcome of one request
#[derive(Debug)]
pub struct RequestOutcome {
    /// Position of the request in the submitted batch
    pub index: usize,
    pub run_ids: RunIds,
    /// The new comment ID
    pub result: Result<i64>,
}

impl RequestOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of applying a whole batch, outcomes in application order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<RequestOutcome>,
}

impl BatchReport {
    pub fn successes(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes.len() - self.successes()
    }

    pub fn failed(&self) -> impl Iterator<Item = &RequestOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Serializable summary
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            successes: self.successes(),
            failures: self.failures(),
            outcomes: self
                .outcomes
                .iter()
                .map(|outcome| OutcomeSummary {
                    index: outcome.index,
                    run_ids: outcome.run_ids.clone(),
                    comment_id: outcome.result.as_ref().ok().copied(),
                    error: outcome.result.as_ref().err().map(|e| e.kind()),
                    message: outcome.result.as_ref().err().map(|e| e.to_string()),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub successes: usize,
    pub failures: usize,
    pub outcomes: Vec<OutcomeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutcomeSummary {
    pub index: usize,
    pub run_ids: RunIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Application order of `requests`, as indices into the slice.
///
/// Sorted by descending maximum run ID, split requests before non-split
/// ones on ties. The sort is stable, so equal requests keep batch order.
/// Requests without IDs sort last; they fail validation anyway.
pub fn schedule(requests: &[CommentRequest]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..requests.len()).collect();
    order.sort_by_key(|&i| {
        let request = &requests[i];
        (
            std::cmp::Reverse(request.run_ids.max().unwrap_or(i64::MIN)),
            !request.splits(),
        )
    });
    order
}

/// Apply every request to `doc` in scheduled order.
///
/// A failing request is recorded and never stops the batch. The document
/// is left untouched by a request that fails before attaching.
pub fn apply_batch(doc: &mut WordDocument, requests: &[CommentRequest], options: &CommentOptions) -> BatchReport {
    warn_overlaps(requests);

    let mut report = BatchReport::default();
    for index in schedule(requests) {
        let request = &requests[index];
        let result = apply_request(doc, request, options);
        match &result {
            Ok(comment_id) => tracing::info!(
                request = index,
                comment_id,
                target = %request.describe(),
                "Comment added"
            ),
            Err(e) => tracing::warn!(
                request = index,
                target = %request.describe(),
                error = %e,
                "Comment request failed"
            ),
        }
        report.outcomes.push(RequestOutcome {
            index,
            run_ids: request.run_ids.clone(),
            result,
        });
    }

    tracing::info!(
        successes = report.successes(),
        failures = report.failures(),
        "Comment batch applied"
    );
    report
}

/// Resolve, optionally split, then attach a single request
pub fn apply_request(doc: &mut WordDocument, request: &CommentRequest, options: &CommentOptions) -> Result<i64> {
    let valid = request.validate()?;
    let targets = resolve_targets(doc, &valid)?;
    attach_comment(doc, &targets, &options.comment(&request.text))
}

/// Paths of the runs to comment on, after splitting when asked to
fn resolve_targets(doc: &mut WordDocument, request: &ValidRequest<'_>) -> Result<Vec<NodePath>> {
    let located: Vec<LocatedRun> = {
        let body = doc.body()?;
        locate_range(body, doc.relationships(), request.first, request.count)?
    };

    let Some(needle) = request.subset_text else {
        return Ok(located.into_iter().map(|run| run.path).collect());
    };

    // A single run is guaranteed by validation
    let run = located
        .into_iter()
        .next()
        .ok_or_else(|| ReviewError::NotFound(format!("Run {} not found in document", request.first)))?;
    let plan = {
        let body = doc.body()?;
        let element = body
            .get(&run.path)
            .ok_or_else(|| ReviewError::NotFound(format!("Run {} not found in document", run.id)))?;
        SplitPlan::for_run(element, needle)?
    };
    // A blank target would leave split fragments with nothing to anchor on
    if plan.target.trim().is_empty() {
        return Err(ReviewError::EmptyTarget);
    }

    let body: &mut XmlElement = doc.body_mut()?;
    let target = apply_split(body, &run.path, &plan)?;
    Ok(vec![target])
}

/// Warn about multi-run requests whose ranges overlap another request.
///
/// Such batches still apply in scheduled order, but the later request may
/// see runs shifted by the earlier one's markers.
fn warn_overlaps(requests: &[CommentRequest]) {
    let ranges: Vec<(usize, i64, i64)> = requests
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let ids = r.run_ids.as_slice();
            Some((i, *ids.iter().min()?, *ids.iter().max()?))
        })
        .collect();

    for (a, &(i, lo_a, hi_a)) in ranges.iter().enumerate() {
        for &(j, lo_b, hi_b) in &ranges[a + 1..] {
            let multi = hi_a > lo_a || hi_b > lo_b;
            if multi && lo_a <= hi_b && lo_b <= hi_a {
                tracing::warn!(
                    first = i,
                    second = j,
                    "Overlapping run ranges in one batch, applying in scheduled order"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use doc_model::{run_text, XmlDocument};

    fn run(text: &str) -> XmlElement {
        XmlElement::new("w:r").with_child(XmlElement::new("w:t").with_text(text))
    }

    fn document(paragraphs: &[&[&str]]) -> WordDocument {
        let mut body = XmlElement::new("w:body");
        for texts in paragraphs {
            let mut para = XmlElement::new("w:p");
            for text in texts.iter() {
                para = para.with_child(run(text));
            }
            body = body.with_child(para);
        }
        let root = XmlElement::new("w:document").with_child(body);
        WordDocument::new(XmlDocument::new(root)).unwrap()
    }

    fn options() -> CommentOptions {
        CommentOptions::new("Claude", "CS")
            .with_timestamp(Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap())
    }

    fn commented_texts(doc: &WordDocument) -> Vec<String> {
        // Text of the run right after each commentRangeStart
        let mut texts = Vec::new();
        for element in doc.body().unwrap().descendants() {
            let mut starts = false;
            for child in element.elements() {
                if starts && child.is("w:r") {
                    texts.push(run_text(child));
                }
                starts = child.is("w:commentRangeStart");
            }
        }
        texts
    }

    #[test]
    fn test_schedule_order() {
        let requests = vec![
            CommentRequest::single(5, "plain five"),
            CommentRequest::single(5, "split five").with_subset("x"),
            CommentRequest::single(12, "twelve"),
            CommentRequest::single(3, "three"),
        ];
        assert_eq!(schedule(&requests), vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_schedule_uses_range_max() {
        let requests = vec![
            CommentRequest::single(6, "six"),
            CommentRequest::range(vec![4, 5, 6, 7], "range"),
            CommentRequest::range(Vec::new(), "empty"),
        ];
        assert_eq!(schedule(&requests), vec![1, 0, 2]);
    }

    #[test]
    fn test_comment_date_format() {
        let comment = options().comment("text");
        assert_eq!(comment.date, "2026-03-04T05:06:07Z");
        assert_eq!(comment.author, "Claude");
    }

    #[test]
    fn test_batch_with_failures_continues() {
        let mut doc = document(&[&["alpha", "beta"], &["   "], &["gamma"]]);
        let requests = vec![
            CommentRequest::single(0, "on alpha"),
            CommentRequest::single(9, "out of range"),
            CommentRequest::single(2, "blank run"),
            CommentRequest::single(3, "on gamma").with_subset("AMM"),
            CommentRequest::range(vec![0, 1], "missing").with_subset("a"),
        ];
        let report = apply_batch(&mut doc, &requests, &options());

        assert_eq!(report.successes(), 2);
        assert_eq!(report.failures(), 3);
        let kinds: Vec<(usize, &str)> = report
            .failed()
            .map(|o| (o.index, o.result.as_ref().unwrap_err().kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![(1, "not_found"), (2, "empty_target"), (4, "invalid_request")]
        );
        assert_eq!(doc.comments().len(), 2);

        let mut texts = commented_texts(&doc);
        texts.sort();
        assert_eq!(texts, vec!["alpha", "amm"]);
    }

    #[test]
    fn test_split_then_lower_ids_still_resolve() {
        let mut doc = document(&[&["one two three"], &["four"]]);
        let requests = vec![
            CommentRequest::single(0, "whole first"),
            CommentRequest::single(0, "middle").with_subset("two"),
            CommentRequest::single(1, "fourth"),
        ];
        let report = apply_batch(&mut doc, &requests, &options());
        assert_eq!(report.failures(), 0);

        let order: Vec<usize> = report.outcomes.iter().map(|o| o.index).collect();
        assert_eq!(order, vec![2, 1, 0]);

        let first = doc.body().unwrap().find("w:p").unwrap();
        let texts: Vec<String> = first
            .find_all("w:r")
            .map(run_text)
            .filter(|text| !text.is_empty())
            .collect();
        assert_eq!(texts, vec!["one ", "two", " three"]);

        let mut commented = commented_texts(&doc);
        commented.sort();
        assert_eq!(commented, vec!["four", "one ", "two"]);
    }

    #[test]
    fn test_whitespace_split_target_leaves_tree_untouched() {
        let mut doc = document(&[&["a  b"]]);
        let before = doc.body().unwrap().clone();
        let request = CommentRequest::single(0, "gap").with_subset("  ");
        let result = apply_request(&mut doc, &request, &options());
        assert!(matches!(result, Err(ReviewError::EmptyTarget)));
        assert_eq!(doc.body().unwrap(), &before);
    }

    #[test]
    fn test_missing_subset_is_not_found() {
        let mut doc = document(&[&["Hello"]]);
        let request = CommentRequest::single(0, "x").with_subset("absent");
        assert!(matches!(
            apply_request(&mut doc, &request, &options()),
            Err(ReviewError::NotFound(_))
        ));
        assert!(doc.comments().is_empty());
    }

    #[test]
    fn test_summary_serializes() {
        let mut doc = document(&[&["text"]]);
        let requests = vec![CommentRequest::single(0, "ok"), CommentRequest::single(7, "bad")];
        let summary = apply_batch(&mut doc, &requests, &options()).summary();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["successes"], 1);
        assert_eq!(json["outcomes"][0]["comment_id"], 0);
        assert_eq!(json["outcomes"][1]["error"], "not_found");
    }
}
