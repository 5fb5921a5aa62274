//! Run enumeration - global run numbering over the paragraph walk
//!
//! Within a paragraph, runs come from its direct children in storage order:
//! - `w:r` yields itself
//! - `w:hyperlink` yields its direct `w:r` children, flagged as hyperlink
//! - `w:ins` / `w:moveTo` and inline `w:sdt` content are unwrapped with the
//!   same rules
//! - `w:del` / `w:moveFrom` are skipped with everything inside them
//!
//! This is the document with every tracked change accepted. The global ID
//! is a counter carried by [`RunEnumerator`] across paragraphs.

use crate::walker::{paragraphs, ParagraphWalker};
use doc_model::{
    hyperlink_target, run_text, tags, LinkResolver, NodeKind, NodePath, RunFormatting,
    TableContext, XmlElement,
};

/// A run found inside one paragraph
#[derive(Debug, Clone)]
pub struct InlineRun<'a> {
    pub element: &'a XmlElement,
    pub path: NodePath,
    pub is_hyperlink: bool,
    /// Target of the enclosing hyperlink, when its relationship resolves
    pub hyperlink_url: Option<String>,
    pub in_insertion: bool,
}

/// Runs of a single paragraph in document order.
///
/// Paths are built on `base`, which is normally the paragraph's own path.
pub fn paragraph_runs<'a>(
    paragraph: &'a XmlElement,
    base: &NodePath,
    links: &dyn LinkResolver,
) -> Vec<InlineRun<'a>> {
    let mut runs = Vec::new();
    collect_runs(paragraph, base, false, links, &mut runs);
    runs
}

fn collect_runs<'a>(
    container: &'a XmlElement,
    base: &NodePath,
    in_insertion: bool,
    links: &dyn LinkResolver,
    out: &mut Vec<InlineRun<'a>>,
) {
    for (index, child) in container.indexed_elements() {
        let path = base.child(index);
        match NodeKind::classify(child) {
            Some(NodeKind::Run) => out.push(InlineRun {
                element: child,
                path,
                is_hyperlink: false,
                hyperlink_url: None,
                in_insertion,
            }),
            Some(NodeKind::Hyperlink) => {
                let url = hyperlink_target(child, links);
                for (run_index, run) in child.indexed_elements() {
                    if run.is(tags::RUN) {
                        out.push(InlineRun {
                            element: run,
                            path: path.child(run_index),
                            is_hyperlink: true,
                            hyperlink_url: url.clone(),
                            in_insertion,
                        });
                    }
                }
            }
            Some(NodeKind::Insertion) => collect_runs(child, &path, true, links, out),
            Some(NodeKind::StructuredContent) => {
                if let Some((content_index, content)) =
                    child.indexed_elements().find(|(_, e)| e.is(tags::SDT_CONTENT))
                {
                    collect_runs(content, &path.child(content_index), in_insertion, links, out);
                }
            }
            Some(NodeKind::Deletion) => {}
            // Block kinds cannot hold runs inside a paragraph
            Some(NodeKind::Paragraph) | Some(NodeKind::Table) | None => {}
        }
    }
}

/// A numbered run of the whole document
#[derive(Debug, Clone)]
pub struct RunRef<'a> {
    /// Global run ID
    pub id: usize,
    pub element: &'a XmlElement,
    /// Path from `w:body`
    pub path: NodePath,
    /// Index of the owning paragraph in walk order
    pub paragraph: usize,
    pub paragraph_path: NodePath,
    pub table: Option<TableContext>,
    pub is_hyperlink: bool,
    pub hyperlink_url: Option<String>,
    pub in_insertion: bool,
}

impl RunRef<'_> {
    pub fn text(&self) -> String {
        run_text(self.element)
    }

    pub fn formatting(&self) -> RunFormatting {
        RunFormatting::of(self.element)
    }
}

/// Iterator over every run of a body with its global ID
pub struct RunEnumerator<'a> {
    paragraphs: ParagraphWalker<'a>,
    links: &'a dyn LinkResolver,
    current: Option<(usize, NodePath, Option<TableContext>)>,
    pending: std::vec::IntoIter<InlineRun<'a>>,
    next_id: usize,
}

/// Enumerate all runs of `body` in global ID order
pub fn enumerate_runs<'a>(body: &'a XmlElement, links: &'a dyn LinkResolver) -> RunEnumerator<'a> {
    RunEnumerator {
        paragraphs: paragraphs(body),
        links,
        current: None,
        pending: Vec::new().into_iter(),
        next_id: 0,
    }
}

impl<'a> Iterator for RunEnumerator<'a> {
    type Item = RunRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(run) = self.pending.next() {
                let (paragraph, paragraph_path, table) = self.current.clone()?;
                let id = self.next_id;
                self.next_id += 1;
                return Some(RunRef {
                    id,
                    element: run.element,
                    path: run.path,
                    paragraph,
                    paragraph_path,
                    table,
                    is_hyperlink: run.is_hyperlink,
                    hyperlink_url: run.hyperlink_url,
                    in_insertion: run.in_insertion,
                });
            }

            let visit = self.paragraphs.next()?;
            self.pending = paragraph_runs(visit.element, &visit.path, self.links).into_iter();
            self.current = Some((visit.index, visit.path, visit.table));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::NoLinks;
    use std::collections::HashMap;

    fn run(text: &str) -> XmlElement {
        XmlElement::new("w:r").with_child(XmlElement::new("w:t").with_text(text))
    }

    fn texts(runs: &[InlineRun]) -> Vec<String> {
        runs.iter().map(|r| run_text(r.element)).collect()
    }

    #[test]
    fn test_plain_and_hyperlink_runs() {
        let para = XmlElement::new("w:p")
            .with_child(XmlElement::new("w:pPr"))
            .with_child(run("See "))
            .with_child(
                XmlElement::new("w:hyperlink")
                    .with_attribute("r:id", "rId5")
                    .with_child(run("the "))
                    .with_child(run("site")),
            )
            .with_child(XmlElement::new("w:bookmarkStart"))
            .with_child(run("."));
        let mut links = HashMap::new();
        links.insert("rId5".to_string(), "https://example.com".to_string());

        let runs = paragraph_runs(&para, &NodePath::root(), &links);
        assert_eq!(texts(&runs), vec!["See ", "the ", "site", "."]);
        assert!(runs[1].is_hyperlink && runs[2].is_hyperlink);
        assert_eq!(runs[2].hyperlink_url.as_deref(), Some("https://example.com"));
        assert!(!runs[3].is_hyperlink);
        assert_eq!(runs[2].path, NodePath::from_indices(vec![2, 1]));
    }

    #[test]
    fn test_unresolved_hyperlink_has_no_url() {
        let para = XmlElement::new("w:p").with_child(
            XmlElement::new("w:hyperlink").with_attribute("w:anchor", "_Toc1").with_child(run("x")),
        );
        let runs = paragraph_runs(&para, &NodePath::root(), &NoLinks);
        assert!(runs[0].is_hyperlink);
        assert_eq!(runs[0].hyperlink_url, None);
    }

    #[test]
    fn test_tracked_changes_accepted_view() {
        let para = XmlElement::new("w:p")
            .with_child(run("kept "))
            .with_child(XmlElement::new("w:del").with_child(
                XmlElement::new("w:r").with_child(XmlElement::new("w:delText").with_text("gone")),
            ))
            .with_child(
                XmlElement::new("w:ins")
                    .with_child(run("new "))
                    .with_child(XmlElement::new("w:ins").with_child(run("nested ")))
                    .with_child(XmlElement::new("w:hyperlink").with_child(run("link"))),
            )
            .with_child(XmlElement::new("w:moveFrom").with_child(run("moved away")))
            .with_child(XmlElement::new("w:moveTo").with_child(run("moved here")));

        let runs = paragraph_runs(&para, &NodePath::root(), &NoLinks);
        assert_eq!(texts(&runs), vec!["kept ", "new ", "nested ", "link", "moved here"]);
        assert!(!runs[0].in_insertion);
        assert!(runs[1..].iter().all(|r| r.in_insertion));
        assert!(runs[3].is_hyperlink);
    }

    #[test]
    fn test_inline_structured_content() {
        let para = XmlElement::new("w:p")
            .with_child(run("a"))
            .with_child(
                XmlElement::new("w:sdt")
                    .with_child(XmlElement::new("w:sdtPr"))
                    .with_child(XmlElement::new("w:sdtContent").with_child(run("b"))),
            );
        let runs = paragraph_runs(&para, &NodePath::from_indices(vec![4]), &NoLinks);
        assert_eq!(texts(&runs), vec!["a", "b"]);
        assert_eq!(runs[1].path, NodePath::from_indices(vec![4, 1, 1, 0]));
    }

    #[test]
    fn test_global_ids_span_paragraphs() {
        let body = XmlElement::new("w:body")
            .with_child(XmlElement::new("w:p").with_child(run("a")).with_child(run("b")))
            .with_child(XmlElement::new("w:p"))
            .with_child(XmlElement::new("w:p").with_child(run("c")));

        let runs: Vec<RunRef> = enumerate_runs(&body, &NoLinks).collect();
        let ids: Vec<usize> = runs.iter().map(|r| r.id).collect();
        let paras: Vec<usize> = runs.iter().map(|r| r.paragraph).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(paras, vec![0, 0, 2]);
        assert_eq!(runs[2].text(), "c");
        assert_eq!(runs[2].path, NodePath::from_indices(vec![2, 0]));
    }
}
