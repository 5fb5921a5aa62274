//! Tree walker - the ordered paragraph sequence of a document body
//!
//! Paragraphs are produced in storage order. Tables are expanded row by row
//! and cell by cell in grid order; a cell covered by a vertical merge resolves
//! to the cell it continues and every cell is visited once per table.
//! Structured-content blocks are spliced in place, except table-of-contents
//! blocks which are skipped.
//!
//! The walker borrows the body immutably and is single pass. Two traversals
//! agree on ordering only if they run over identical trees: reading a
//! document and commenting it later must use two loads of the same bytes.

use doc_model::table::{column_count, grid_before, grid_span, vertical_merge, VerticalMerge};
use doc_model::{tags, NodeKind, NodePath, TableContext, XmlElement};
use std::collections::{HashMap, HashSet};

/// Value of `w:docPartGallery` that marks a table of contents
const TOC_GALLERY_PREFIX: &str = "Table of Contents";

/// One paragraph in walk order
#[derive(Debug, Clone)]
pub struct ParagraphVisit<'a> {
    /// Position in the walk, counting from 0
    pub index: usize,
    pub element: &'a XmlElement,
    /// Path from `w:body`
    pub path: NodePath,
    /// Innermost enclosing table, absent for body paragraphs
    pub table: Option<TableContext>,
}

/// A table cell selected for visiting
#[derive(Debug, Clone)]
struct CellVisit<'a> {
    cell: &'a XmlElement,
    path: NodePath,
    context: TableContext,
}

enum Frame<'a> {
    /// Block-level children of the body, a cell or an `w:sdtContent`
    Blocks {
        container: &'a XmlElement,
        path: NodePath,
        next: usize,
        table: Option<TableContext>,
    },
    /// Resolved cells of one table
    Cells(std::vec::IntoIter<CellVisit<'a>>),
}

/// Lazy paragraph iterator over a body, see [`paragraphs`]
pub struct ParagraphWalker<'a> {
    stack: Vec<Frame<'a>>,
    index: usize,
}

/// Walk every paragraph of `body` (the `w:body` element) in document order
pub fn paragraphs(body: &XmlElement) -> ParagraphWalker<'_> {
    ParagraphWalker {
        stack: vec![Frame::Blocks {
            container: body,
            path: NodePath::root(),
            next: 0,
            table: None,
        }],
        index: 0,
    }
}

impl<'a> Iterator for ParagraphWalker<'a> {
    type Item = ParagraphVisit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pushed = match self.stack.last_mut()? {
                Frame::Cells(cells) => match cells.next() {
                    Some(visit) => Frame::Blocks {
                        container: visit.cell,
                        path: visit.path,
                        next: 0,
                        table: Some(visit.context),
                    },
                    None => {
                        self.stack.pop();
                        continue;
                    }
                },
                Frame::Blocks {
                    container,
                    path,
                    next,
                    table,
                } => {
                    let parent: &'a XmlElement = *container;
                    let Some(child) = parent.children.get(*next) else {
                        self.stack.pop();
                        continue;
                    };
                    let child_index = *next;
                    *next += 1;
                    let Some(element) = child.as_element() else {
                        continue;
                    };
                    let child_path = path.child(child_index);

                    match NodeKind::classify(element) {
                        Some(NodeKind::Paragraph) => {
                            let visit = ParagraphVisit {
                                index: self.index,
                                element,
                                path: child_path,
                                table: *table,
                            };
                            self.index += 1;
                            return Some(visit);
                        }
                        Some(NodeKind::Table) => Frame::Cells(table_cells(element, &child_path).into_iter()),
                        Some(NodeKind::StructuredContent) => {
                            if is_table_of_contents(element) {
                                tracing::debug!(path = %child_path, "Skipping table of contents block");
                                continue;
                            }
                            match element.indexed_elements().find(|(_, e)| e.is(tags::SDT_CONTENT)) {
                                Some((content_index, content)) => Frame::Blocks {
                                    container: content,
                                    path: child_path.child(content_index),
                                    next: 0,
                                    table: *table,
                                },
                                None => continue,
                            }
                        }
                        // Inline kinds and unknown elements at block level
                        _ => continue,
                    }
                }
            };
            self.stack.push(pushed);
        }
    }
}

/// True if an `w:sdt` block is a table of contents
pub fn is_table_of_contents(sdt: &XmlElement) -> bool {
    sdt.find_path(&[tags::SDT_PROPERTIES, tags::DOC_PART_OBJ, tags::DOC_PART_GALLERY])
        .and_then(|gallery| gallery.attribute(tags::VAL))
        .map(|value| value.starts_with(TOC_GALLERY_PREFIX))
        .unwrap_or(false)
}

/// Cells of a table in visiting order, each once.
///
/// The column index is the grid column where a cell starts. A `w:vMerge`
/// continuation resolves to the origin cell in the same grid column of the
/// row above; origins are deduplicated by path.
fn table_cells<'a>(table: &'a XmlElement, table_path: &NodePath) -> Vec<CellVisit<'a>> {
    let num_rows = table.find_all(tags::TABLE_ROW).count();
    let num_cols = column_count(table);

    let mut visits = Vec::new();
    let mut seen: HashSet<NodePath> = HashSet::new();
    // Grid column -> origin cell occupying it in the previous row
    let mut above: HashMap<usize, NodePath> = HashMap::new();

    let rows = table
        .indexed_elements()
        .filter(|(_, element)| element.is(tags::TABLE_ROW));
    for (row, (row_index, row_element)) in rows.enumerate() {
        let row_path = table_path.child(row_index);
        let mut col = grid_before(row_element);
        let mut current: HashMap<usize, NodePath> = HashMap::new();

        let cells = row_element
            .indexed_elements()
            .filter(|(_, element)| element.is(tags::TABLE_CELL));
        for (cell_index, cell) in cells {
            let span = grid_span(cell);
            let cell_path = row_path.child(cell_index);

            let origin = match vertical_merge(cell) {
                Some(VerticalMerge::Continue) => above.get(&col).cloned(),
                _ => None,
            };
            let origin = match origin {
                Some(origin) => origin,
                None => {
                    if seen.insert(cell_path.clone()) {
                        visits.push(CellVisit {
                            cell,
                            path: cell_path.clone(),
                            context: TableContext {
                                row,
                                col,
                                num_rows,
                                num_cols,
                            },
                        });
                    }
                    cell_path
                }
            };

            for grid_col in col..col + span {
                current.insert(grid_col, origin.clone());
            }
            col += span;
        }
        above = current;
    }

    visits
}
