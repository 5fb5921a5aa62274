//! Text runs - reading and constructing `w:r` elements

use crate::{tags, XmlElement, XmlNode};
use serde::{Deserialize, Serialize};

/// Formatting snapshot of a run as far as the reader reports it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunFormatting {
    pub bold: bool,
    pub italic: bool,
}

impl RunFormatting {
    /// Read direct bold/italic toggles from a run's `w:rPr`
    pub fn of(run: &XmlElement) -> Self {
        match run_properties(run) {
            Some(props) => Self {
                bold: props.find(tags::BOLD).map(is_toggle_on).unwrap_or(false),
                italic: props.find(tags::ITALIC).map(is_toggle_on).unwrap_or(false),
            },
            None => Self::default(),
        }
    }
}

/// Evaluate an OOXML on/off property such as `<w:b/>` or `<w:b w:val="0"/>`
pub fn is_toggle_on(toggle: &XmlElement) -> bool {
    match toggle.attribute(tags::VAL) {
        Some(value) => !matches!(value.to_lowercase().as_str(), "0" | "false" | "off"),
        None => true,
    }
}

/// The run's `w:rPr`, if any
pub fn run_properties(run: &XmlElement) -> Option<&XmlElement> {
    run.find(tags::RUN_PROPERTIES)
}

/// Text of a run: its direct `w:t` children concatenated
pub fn run_text(run: &XmlElement) -> String {
    run.find_all(tags::TEXT).map(XmlElement::text).collect()
}

/// True if the run has at least one non-whitespace character
pub fn run_has_text(run: &XmlElement) -> bool {
    !run_text(run).trim().is_empty()
}

/// A `w:t` element that keeps leading and trailing spaces
pub fn text_element(text: &str) -> XmlElement {
    let mut element = XmlElement::new(tags::TEXT).with_attribute(tags::XML_SPACE, "preserve");
    element.set_text(text);
    element
}

/// Cut a run's content into three fragments at byte offsets `cuts` of its text.
///
/// `w:t` elements are split at the offsets, keeping their attributes. Other
/// content (tabs, breaks, drawings, note references) goes with the text that
/// follows it, so reading the fragments in order gives the original content.
/// `w:rPr` is left out; a fragment without any `w:t` gets an empty one.
pub fn partition_run(run: &XmlElement, cuts: [usize; 2]) -> [Vec<XmlNode>; 3] {
    let bounds = [0, cuts[0], cuts[1], usize::MAX];
    let mut parts: [Vec<XmlNode>; 3] = Default::default();
    let mut offset = 0;
    for child in &run.children {
        match child {
            XmlNode::Element(props) if props.is(tags::RUN_PROPERTIES) => {}
            XmlNode::Element(t) if t.is(tags::TEXT) => {
                let text = t.text();
                let end = offset + text.len();
                for (fragment, part) in parts.iter_mut().enumerate() {
                    let lo = bounds[fragment].max(offset);
                    let hi = bounds[fragment + 1].min(end);
                    if lo < hi {
                        let mut piece = t.clone();
                        piece.set_attribute(tags::XML_SPACE, "preserve");
                        piece.set_text(&text[lo - offset..hi - offset]);
                        part.push(XmlNode::Element(piece));
                    }
                }
                offset = end;
            }
            other => {
                let fragment = cuts.iter().filter(|cut| **cut <= offset).count();
                parts[fragment].push(other.clone());
            }
        }
    }

    for part in parts.iter_mut() {
        if !part.iter().any(|node| matches!(node, XmlNode::Element(e) if e.is(tags::TEXT))) {
            part.push(XmlNode::Element(text_element("")));
        }
    }
    parts
}

/// Replace everything but the `w:rPr` of a run in place
pub fn set_run_content(run: &mut XmlElement, content: Vec<XmlNode>) {
    run.children
        .retain(|child| matches!(child, XmlNode::Element(e) if e.is(tags::RUN_PROPERTIES)));
    run.children.extend(content);
}

/// A new run carrying a deep copy of `template`'s `w:rPr` followed by `content`
pub fn run_like(template: &XmlElement, content: Vec<XmlNode>) -> XmlElement {
    let mut run = XmlElement::new(tags::RUN);
    if let Some(props) = run_properties(template) {
        run.children.push(XmlNode::Element(props.clone()));
    }
    run.children.extend(content);
    run
}
