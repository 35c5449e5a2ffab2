//! The legacy selection union.

use loom_editor_core::{DomRange, NodeId};

/// Numeric tag of [`SelectionRangeEx`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SelectionRangeTypes {
    Normal = 0,
    TableSelection = 1,
    ImageSelection = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Coordinates {
    pub x: usize,
    pub y: usize,
}

/// First and last selected cell of a table selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableSelectionCoordinates {
    pub first_cell: Coordinates,
    pub last_cell: Coordinates,
}

/// Selection as seen by legacy plugins: the selected shape plus its
/// projection onto plain ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionRangeEx {
    Normal {
        ranges: Vec<DomRange>,
        are_all_collapsed: bool,
    },
    ImageSelection {
        image: NodeId,
        ranges: Vec<DomRange>,
        are_all_collapsed: bool,
    },
    TableSelection {
        table: NodeId,
        coordinates: Option<TableSelectionCoordinates>,
        ranges: Vec<DomRange>,
        are_all_collapsed: bool,
    },
}

impl SelectionRangeEx {
    /// No selection: `Normal`, no ranges, collapsed.
    pub fn empty() -> Self {
        SelectionRangeEx::Normal {
            ranges: Vec::new(),
            are_all_collapsed: true,
        }
    }

    pub fn range_type(&self) -> SelectionRangeTypes {
        match self {
            SelectionRangeEx::Normal { .. } => SelectionRangeTypes::Normal,
            SelectionRangeEx::ImageSelection { .. } => SelectionRangeTypes::ImageSelection,
            SelectionRangeEx::TableSelection { .. } => SelectionRangeTypes::TableSelection,
        }
    }

    pub fn ranges(&self) -> &[DomRange] {
        match self {
            SelectionRangeEx::Normal { ranges, .. }
            | SelectionRangeEx::ImageSelection { ranges, .. }
            | SelectionRangeEx::TableSelection { ranges, .. } => ranges,
        }
    }

    pub fn are_all_collapsed(&self) -> bool {
        match self {
            SelectionRangeEx::Normal {
                are_all_collapsed, ..
            }
            | SelectionRangeEx::ImageSelection {
                are_all_collapsed, ..
            }
            | SelectionRangeEx::TableSelection {
                are_all_collapsed, ..
            } => *are_all_collapsed,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionRangeEx::Normal { ranges, .. } if ranges.is_empty())
    }
}
