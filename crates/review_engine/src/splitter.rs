//! Run splitter - isolate a sub-string of a run as its own run
//!
//! A run "Hello world" split at "world" becomes three sibling runs:
//! "Hello ", "world" and "". The original element keeps its position and
//! receives the first part; the other two are inserted right after it in the
//! same parent, which may be a paragraph, a hyperlink or an insertion.
//! Empty fragments are kept. Tabs, breaks and other non-text run content
//! travel with the text that follows them.

use crate::error::{Result, ReviewError};
use doc_model::{partition_run, run_like, run_text, set_run_content, tags, NodePath, XmlElement, XmlNode};
use std::ops::Range;

/// Byte range of the first case-insensitive occurrence of `needle`.
///
/// Characters are compared through their Unicode lowercase mapping one at a
/// time, so the range always falls on character boundaries of `haystack`.
pub fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        let mut matched = true;
        for wanted in needle.chars() {
            match rest.next() {
                Some((offset, found)) if chars_match(found, wanted) => {
                    end = start + offset + found.len_utf8();
                }
                _ => {
                    matched = false;
                    break;
                }
            }
        }
        if matched {
            return Some(start..end);
        }
    }
    None
}

fn chars_match(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// The three texts a run is split into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub before: String,
    pub target: String,
    pub after: String,
}

impl SplitPlan {
    /// Partition `text` around the first occurrence of `needle`
    pub fn new(text: &str, needle: &str) -> Option<Self> {
        let range = find_case_insensitive(text, needle)?;
        Some(Self {
            before: text[..range.start].to_string(),
            target: text[range.clone()].to_string(),
            after: text[range.end..].to_string(),
        })
    }

    /// Byte offsets in the run text where the target starts and ends
    pub fn cuts(&self) -> [usize; 2] {
        let start = self.before.len();
        [start, start + self.target.len()]
    }

    /// Plan the split of a run element; NotFound if `needle` is absent
    pub fn for_run(run: &XmlElement, needle: &str) -> Result<Self> {
        let text = run_text(run);
        Self::new(&text, needle).ok_or_else(|| {
            ReviewError::NotFound(format!("Text '{}' not found in run '{}'", needle, text))
        })
    }
}

/// Split the run at `run_path` (relative to `body`) according to `plan`.
///
/// Returns the path of the new target run. Nothing is modified when the
/// path does not lead to a run.
pub fn apply_split(body: &mut XmlElement, run_path: &NodePath, plan: &SplitPlan) -> Result<NodePath> {
    let not_a_run = || ReviewError::NotFound(format!("No run at {}", run_path));
    let (parent_path, index) = match (run_path.parent(), run_path.last_index()) {
        (Some(parent), Some(index)) => (parent, index),
        _ => return Err(not_a_run()),
    };
    let parent = body.get_mut(&parent_path).ok_or_else(not_a_run)?;

    let (before, target, after) = {
        let run = parent
            .children
            .get(index)
            .and_then(XmlNode::as_element)
            .filter(|element| element.is(tags::RUN))
            .ok_or_else(not_a_run)?;
        let [before, target, after] = partition_run(run, plan.cuts());
        (before, run_like(run, target), run_like(run, after))
    };

    if let Some(run) = parent.children.get_mut(index).and_then(XmlNode::as_element_mut) {
        set_run_content(run, before);
    }
    parent.children.insert(index + 1, XmlNode::Element(target));
    parent.children.insert(index + 2, XmlNode::Element(after));

    tracing::debug!(
        path = %run_path,
        before = %plan.before,
        target = %plan.target,
        after = %plan.after,
        "Split run"
    );
    Ok(parent_path.child(index + 1))
}

/// Plan and apply a split in one step
pub fn split_run(body: &mut XmlElement, run_path: &NodePath, needle: &str) -> Result<NodePath> {
    let plan = {
        let run = body
            .get(run_path)
            .ok_or_else(|| ReviewError::NotFound(format!("No run at {}", run_path)))?;
        SplitPlan::for_run(run, needle)?
    };
    apply_split(body, run_path, &plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::RunFormatting;
    use proptest::prelude::*;

    fn formatted_run(text: &str) -> XmlElement {
        XmlElement::new("w:r")
            .with_attribute("w:rsidR", "00A1")
            .with_child(
                XmlElement::new("w:rPr")
                    .with_child(XmlElement::new("w:b"))
                    .with_child(XmlElement::new("w:sz").with_attribute("w:val", "28")),
            )
            .with_child(XmlElement::new("w:t").with_text(text))
    }

    fn body_with(run: XmlElement) -> XmlElement {
        XmlElement::new("w:body").with_child(XmlElement::new("w:p").with_child(run))
    }

    fn para_texts(body: &XmlElement) -> Vec<String> {
        body.find("w:p").unwrap().find_all("w:r").map(run_text).collect()
    }

    #[test]
    fn test_find_case_insensitive() {
        assert_eq!(find_case_insensitive("Hello World", "world"), Some(6..11));
        assert_eq!(find_case_insensitive("Hello", "HELLO"), Some(0..5));
        assert_eq!(find_case_insensitive("Hello", "xyz"), None);
        assert_eq!(find_case_insensitive("Hello", ""), None);
        // Non-ASCII characters keep their byte boundaries
        assert_eq!(find_case_insensitive("Straße ÄRGER", "ärger"), Some(8..14));
    }

    #[test]
    fn test_split_middle() {
        let mut body = body_with(formatted_run("Hello world, again"));
        let path = NodePath::from_indices(vec![0, 0]);
        let target = split_run(&mut body, &path, "WORLD").unwrap();

        assert_eq!(target, NodePath::from_indices(vec![0, 1]));
        assert_eq!(para_texts(&body), vec!["Hello ", "world", ", again"]);
        let runs: Vec<&XmlElement> = body.find("w:p").unwrap().find_all("w:r").collect();
        for run in &runs {
            assert_eq!(run.find("w:rPr"), runs[0].find("w:rPr"));
            assert!(RunFormatting::of(run).bold);
        }
        // The original element keeps its attributes
        assert_eq!(runs[0].attribute("w:rsidR"), Some("00A1"));
        let t = runs[1].find("w:t").unwrap();
        assert_eq!(t.attribute("xml:space"), Some("preserve"));
    }

    #[test]
    fn test_split_keeps_empty_fragments() {
        let mut body = body_with(formatted_run("Hello world"));
        split_run(&mut body, &NodePath::from_indices(vec![0, 0]), "world").unwrap();
        assert_eq!(para_texts(&body), vec!["Hello ", "world", ""]);

        let mut body = body_with(formatted_run("Hello world"));
        split_run(&mut body, &NodePath::from_indices(vec![0, 0]), "hello").unwrap();
        assert_eq!(para_texts(&body), vec!["", "Hello", " world"]);
    }

    #[test]
    fn test_split_inside_hyperlink() {
        let link = XmlElement::new("w:hyperlink").with_child(formatted_run("Click here"));
        let mut body = XmlElement::new("w:body").with_child(XmlElement::new("w:p").with_child(link));
        let target = split_run(&mut body, &NodePath::from_indices(vec![0, 0, 0]), "here").unwrap();

        let link = body.get(&NodePath::from_indices(vec![0, 0])).unwrap();
        let texts: Vec<String> = link.find_all("w:r").map(run_text).collect();
        assert_eq!(texts, vec!["Click ", "here", ""]);
        assert_eq!(run_text(body.get(&target).unwrap()), "here");
    }

    #[test]
    fn test_failed_split_leaves_tree_untouched() {
        let mut body = body_with(formatted_run("Hello world"));
        let before = body.clone();
        let result = split_run(&mut body, &NodePath::from_indices(vec![0, 0]), "absent");
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
        assert_eq!(body, before);

        let result = split_run(&mut body, &NodePath::from_indices(vec![0, 5]), "Hello");
        assert!(matches!(result, Err(ReviewError::NotFound(_))));
        assert_eq!(body, before);
    }

    #[test]
    fn test_split_keeps_tab_between_its_texts() {
        let run = XmlElement::new("w:r")
            .with_child(XmlElement::new("w:rPr").with_child(XmlElement::new("w:b")))
            .with_child(XmlElement::new("w:t").with_text("Item"))
            .with_child(XmlElement::new("w:tab"))
            .with_child(XmlElement::new("w:t").with_text("Description"));
        let mut body = body_with(run);
        split_run(&mut body, &NodePath::from_indices(vec![0, 0]), "tem").unwrap();

        assert_eq!(para_texts(&body), vec!["I", "tem", "Description"]);
        let sequence: Vec<String> = body
            .find("w:p")
            .unwrap()
            .find_all("w:r")
            .flat_map(|r| r.elements().filter(|e| !e.is("w:rPr")))
            .map(|e| match e.name.as_str() {
                "w:t" => format!("t:{}", e.text()),
                other => other.to_string(),
            })
            .collect();
        assert_eq!(sequence, vec!["t:I", "t:tem", "w:tab", "t:Description"]);
    }

    proptest! {
        #[test]
        fn prop_split_concatenates_to_original(
            before in "[a-zA-Z ]{0,12}",
            target in "[a-zA-Z]{1,8}",
            after in "[a-zA-Z ]{0,12}",
        ) {
            let text = format!("{}{}{}", before, target, after);
            let mut body = body_with(formatted_run(&text));
            let needle = target.to_uppercase();
            let target_path = split_run(&mut body, &NodePath::from_indices(vec![0, 0]), &needle).unwrap();

            let texts = para_texts(&body);
            prop_assert_eq!(texts.len(), 3);
            prop_assert_eq!(texts.concat(), text);
            prop_assert!(texts[1].eq_ignore_ascii_case(&target));
            prop_assert_eq!(run_text(body.get(&target_path).unwrap()), texts[1].clone());

            let para = body.find("w:p").unwrap();
            let props: Vec<Option<&XmlElement>> = para.find_all("w:r").map(|r| r.find("w:rPr")).collect();
            prop_assert!(props.iter().all(|p| *p == props[0]));
        }
    }
}
