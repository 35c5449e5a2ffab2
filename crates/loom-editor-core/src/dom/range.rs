//! Ranges over the node tree and the range collaborators selection
//! conversion depends on.

use super::{Dom, NodeId};
use crate::selection::TableSelection;

/// A live range: two (container, offset) boundary points.
///
/// Offsets count characters inside text nodes and children inside
/// containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomRange {
    pub start_container: NodeId,
    pub start_offset: usize,
    pub end_container: NodeId,
    pub end_offset: usize,
}

impl DomRange {
    pub fn new(
        start_container: NodeId,
        start_offset: usize,
        end_container: NodeId,
        end_offset: usize,
    ) -> Self {
        Self {
            start_container,
            start_offset,
            end_container,
            end_offset,
        }
    }

    /// A collapsed range (caret).
    pub fn caret(container: NodeId, offset: usize) -> Self {
        Self::new(container, offset, container, offset)
    }

    pub fn is_collapsed(&self) -> bool {
        self.start_container == self.end_container && self.start_offset == self.end_offset
    }
}

/// DOM collaborators used when converting between selection shapes.
///
/// `Dom` is the production implementation. The trait exists so callers can
/// substitute (or instrument) the range helpers.
pub trait DomServices {
    /// A range selecting exactly `node`.
    fn range_around_node(&self, node: NodeId) -> DomRange;

    /// One range per selected cell of a table selection, row by row.
    fn table_cell_ranges(&self, selection: &TableSelection) -> Vec<DomRange>;

    /// A new empty, detached document fragment.
    fn create_fragment(&mut self) -> NodeId;
}

impl DomServices for Dom {
    fn range_around_node(&self, node: NodeId) -> DomRange {
        match (self.parent(node), self.index_in_parent(node)) {
            (Some(parent), Some(index)) => DomRange::new(parent, index, parent, index + 1),
            _ => DomRange::new(node, 0, node, self.node_length(node)),
        }
    }

    fn table_cell_ranges(&self, selection: &TableSelection) -> Vec<DomRange> {
        let table = selection.table;
        let rows: Vec<NodeId> = self
            .descendants(table)
            .into_iter()
            .filter(|&n| {
                self.tag(n) == Some("tr")
                    && self.closest(n, table, |d, a| d.tag(a) == Some("table")).is_none()
            })
            .collect();

        let (row_start, row_end) = ordered(selection.first_row, selection.last_row);
        let (col_start, col_end) = ordered(selection.first_column, selection.last_column);

        let mut ranges = Vec::new();
        for &row in rows.iter().skip(row_start).take(row_end - row_start + 1) {
            let cells: Vec<NodeId> = self
                .children(row)
                .iter()
                .copied()
                .filter(|&c| matches!(self.tag(c), Some("td") | Some("th")))
                .collect();
            for &cell in cells.iter().skip(col_start).take(col_end - col_start + 1) {
                ranges.push(self.range_around_node(cell));
            }
        }
        ranges
    }

    fn create_fragment(&mut self) -> NodeId {
        Dom::create_fragment(self)
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_around_node() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("<p>a<img>b</p>");
        let p = dom.first_child(fragment).unwrap();
        let img = dom.child(p, 1).unwrap();
        assert_eq!(dom.range_around_node(img), DomRange::new(p, 1, p, 2));

        let detached = dom.create_text("abc");
        assert_eq!(
            dom.range_around_node(detached),
            DomRange::new(detached, 0, detached, 3)
        );
    }

    #[test]
    fn test_table_cell_ranges_skip_nested_tables() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment(
            "<table><tr><td>a</td><td>b</td></tr>\
             <tr><td><table><tr><td>n</td></tr></table></td><td>d</td></tr></table>",
        );
        let table = dom.first_child(fragment).unwrap();
        let ranges = dom.table_cell_ranges(&TableSelection {
            table,
            first_column: 1,
            first_row: 1,
            last_column: 0,
            last_row: 0,
        });
        assert_eq!(ranges.len(), 4);
        let rows: Vec<_> = dom
            .descendants(table)
            .into_iter()
            .filter(|&n| dom.tag(n) == Some("tr"))
            .collect();
        assert_eq!(ranges[0].start_container, rows[0]);
        assert_eq!(ranges[2].start_container, rows[1]);
    }
}
