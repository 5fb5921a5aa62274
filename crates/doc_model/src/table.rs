//! Table structure - grid geometry of `w:tbl`, `w:tr` and `w:tc`

use crate::{tags, XmlElement};
use serde::{Deserialize, Serialize};

/// Position of a cell paragraph inside its enclosing table, all 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableContext {
    pub row: usize,
    pub col: usize,
    pub num_rows: usize,
    pub num_cols: usize,
}

/// Vertical merge state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalMerge {
    /// First cell of a vertically merged range
    Restart,
    /// Covered by the cell above
    Continue,
}

/// Number of grid columns a cell spans (`w:gridSpan`, default 1)
pub fn grid_span(cell: &XmlElement) -> usize {
    cell.find_path(&[tags::TABLE_CELL_PROPERTIES, tags::GRID_SPAN])
        .and_then(|span| span.attribute(tags::VAL))
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|span| *span > 0)
        .unwrap_or(1)
}

/// Vertical merge state; a bare `<w:vMerge/>` means continue
pub fn vertical_merge(cell: &XmlElement) -> Option<VerticalMerge> {
    let merge = cell.find_path(&[tags::TABLE_CELL_PROPERTIES, tags::VERTICAL_MERGE])?;
    match merge.attribute(tags::VAL) {
        Some("restart") => Some(VerticalMerge::Restart),
        _ => Some(VerticalMerge::Continue),
    }
}

/// Grid columns skipped before the first cell of a row (`w:gridBefore`)
pub fn grid_before(row: &XmlElement) -> usize {
    row.find_path(&[tags::TABLE_ROW_PROPERTIES, tags::GRID_BEFORE])
        .and_then(|before| before.attribute(tags::VAL))
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0)
}

/// Column count of a table: its `w:tblGrid`, or the widest row in grid units
pub fn column_count(table: &XmlElement) -> usize {
    let declared = table
        .find(tags::TABLE_GRID)
        .map(|grid| grid.find_all(tags::GRID_COL).count())
        .unwrap_or(0);
    if declared > 0 {
        return declared;
    }
    table
        .find_all(tags::TABLE_ROW)
        .map(|row| grid_before(row) + row.find_all(tags::TABLE_CELL).map(grid_span).sum::<usize>())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(props: Option<XmlElement>) -> XmlElement {
        let mut tc = XmlElement::new("w:tc");
        if let Some(props) = props {
            tc = tc.with_child(props);
        }
        tc.with_child(XmlElement::new("w:p"))
    }

    #[test]
    fn test_grid_span() {
        let spanned = cell(Some(
            XmlElement::new("w:tcPr")
                .with_child(XmlElement::new("w:gridSpan").with_attribute("w:val", "3")),
        ));
        assert_eq!(grid_span(&spanned), 3);
        assert_eq!(grid_span(&cell(None)), 1);
    }

    #[test]
    fn test_vertical_merge() {
        let restart = cell(Some(
            XmlElement::new("w:tcPr")
                .with_child(XmlElement::new("w:vMerge").with_attribute("w:val", "restart")),
        ));
        let cont = cell(Some(XmlElement::new("w:tcPr").with_child(XmlElement::new("w:vMerge"))));
        assert_eq!(vertical_merge(&restart), Some(VerticalMerge::Restart));
        assert_eq!(vertical_merge(&cont), Some(VerticalMerge::Continue));
        assert_eq!(vertical_merge(&cell(None)), None);
    }

    #[test]
    fn test_column_count_prefers_grid() {
        let table = XmlElement::new("w:tbl")
            .with_child(
                XmlElement::new("w:tblGrid")
                    .with_child(XmlElement::new("w:gridCol"))
                    .with_child(XmlElement::new("w:gridCol")),
            )
            .with_child(XmlElement::new("w:tr").with_child(cell(None)));
        assert_eq!(column_count(&table), 2);
    }

    #[test]
    fn test_column_count_from_rows() {
        let table = XmlElement::new("w:tbl")
            .with_child(XmlElement::new("w:tr").with_child(cell(None)))
            .with_child(
                XmlElement::new("w:tr")
                    .with_child(
                        XmlElement::new("w:trPr")
                            .with_child(XmlElement::new("w:gridBefore").with_attribute("w:val", "1")),
                    )
                    .with_child(cell(None))
                    .with_child(cell(None)),
            );
        assert_eq!(column_count(&table), 3);
    }
}
