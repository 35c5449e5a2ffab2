//! The editor's selection model.

use crate::dom::{DomRange, NodeId};

/// The currently selected region, in one of three shapes.
///
/// "Nothing selected" is expressed as `Option::<DomSelection>::None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomSelection {
    /// A regular text range.
    Range(DomRange),
    /// A single selected image element.
    Image(NodeId),
    /// A rectangular block of table cells.
    Table(TableSelection),
}

impl DomSelection {
    /// The selection's type tag: `"range"`, `"image"` or `"table"`.
    pub fn type_name(&self) -> &'static str {
        match self {
            DomSelection::Range(_) => "range",
            DomSelection::Image(_) => "image",
            DomSelection::Table(_) => "table",
        }
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self, DomSelection::Range(range) if range.is_collapsed())
    }
}

/// Table selection by cell coordinates (column = x, row = y).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSelection {
    pub table: NodeId,
    pub first_column: usize,
    pub first_row: usize,
    pub last_column: usize,
    pub last_row: usize,
}
