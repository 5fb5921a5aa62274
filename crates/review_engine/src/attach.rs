//! Comment attachment - anchor one comment on resolved runs

use crate::error::{Result, ReviewError};
use doc_model::{run_has_text, NodePath};
use store::{NewComment, WordDocument};

/// Attach `comment` to the runs at `runs` (paths from `w:body`, in document order).
///
/// Runs without a non-whitespace character are left out of the anchor; if
/// none remain the request fails with `EmptyTarget`. Any failure of the
/// comments part or marker insertion is reported as `AttachmentFailure`.
pub fn attach_comment(doc: &mut WordDocument, runs: &[NodePath], comment: &NewComment) -> Result<i64> {
    let anchored: Vec<&NodePath> = {
        let body = doc
            .body()
            .map_err(|e| ReviewError::AttachmentFailure(e.to_string()))?;
        runs.iter()
            .filter(|path| body.get(path).map(run_has_text).unwrap_or(false))
            .collect()
    };

    let (Some(first), Some(last)) = (anchored.first(), anchored.last()) else {
        return Err(ReviewError::EmptyTarget);
    };
    if anchored.len() < runs.len() {
        tracing::debug!(
            skipped = runs.len() - anchored.len(),
            "Empty runs left out of comment anchor"
        );
    }

    doc.add_comment(first, last, comment).map_err(|e| {
        tracing::warn!(error = %e, "Comment storage rejected the comment");
        ReviewError::AttachmentFailure(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{tags, XmlDocument, XmlElement};

    fn document(body: XmlElement) -> WordDocument {
        let root = XmlElement::new("w:document")
            .with_attribute("xmlns:w", "http://schemas.openxmlformats.org/wordprocessingml/2006/main")
            .with_child(body);
        WordDocument::new(XmlDocument::new(root)).unwrap()
    }

    fn run(text: &str) -> XmlElement {
        XmlElement::new("w:r").with_child(XmlElement::new("w:t").with_text(text))
    }

    fn comment() -> NewComment {
        NewComment {
            author: "Reviewer".to_string(),
            initials: "RV".to_string(),
            date: "2026-01-01T00:00:00Z".to_string(),
            text: "Note".to_string(),
        }
    }

    fn paragraph_tags(doc: &WordDocument) -> Vec<String> {
        let body = doc.body().unwrap();
        body.find(tags::PARAGRAPH)
            .unwrap()
            .elements()
            .map(|e| e.name.clone())
            .collect()
    }

    #[test]
    fn test_empty_runs_trimmed_from_anchor() {
        let body = XmlElement::new("w:body").with_child(
            XmlElement::new("w:p")
                .with_child(run("  "))
                .with_child(run("text"))
                .with_child(run("")),
        );
        let mut doc = document(body);
        let paths: Vec<NodePath> = (0..3).map(|i| NodePath::from_indices(vec![0, i])).collect();

        let id = attach_comment(&mut doc, &paths, &comment()).unwrap();
        assert_eq!(id, 0);
        assert_eq!(
            paragraph_tags(&doc),
            vec!["w:r", "w:commentRangeStart", "w:r", "w:commentRangeEnd", "w:r", "w:r"]
        );
        assert_eq!(doc.comments().len(), 1);
    }

    #[test]
    fn test_all_empty_is_empty_target() {
        let body = XmlElement::new("w:body")
            .with_child(XmlElement::new("w:p").with_child(run(" \t")).with_child(run("")));
        let mut doc = document(body);
        let paths = vec![NodePath::from_indices(vec![0, 0]), NodePath::from_indices(vec![0, 1])];

        let result = attach_comment(&mut doc, &paths, &comment());
        assert!(matches!(result, Err(ReviewError::EmptyTarget)));
        assert!(doc.comments().is_empty());
        assert_eq!(paragraph_tags(&doc), vec!["w:r", "w:r"]);
    }

    #[test]
    fn test_missing_path_is_empty_target() {
        let body = XmlElement::new("w:body").with_child(XmlElement::new("w:p").with_child(run("x")));
        let mut doc = document(body);
        let result = attach_comment(&mut doc, &[NodePath::from_indices(vec![3, 0])], &comment());
        assert!(matches!(result, Err(ReviewError::EmptyTarget)));
    }
}
