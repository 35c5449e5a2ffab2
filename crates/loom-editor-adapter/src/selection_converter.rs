//! Conversion between the new selection model ([`DomSelection`]) and the
//! legacy one ([`SelectionRangeEx`]).

use loom_editor_core::{DomSelection, DomServices, TableSelection};

use crate::legacy::selection::{Coordinates, SelectionRangeEx, TableSelectionCoordinates};

pub use loom_editor_core::metadata_to_dom_selection;

/// Legacy view of a selection. No selection gives
/// [`SelectionRangeEx::empty`].
///
/// Image and table selections get their ranges from `services`; table
/// cell ranges are computed from the full table selection.
pub fn dom_selection_to_range_ex(
    selection: Option<&DomSelection>,
    services: &dyn DomServices,
) -> SelectionRangeEx {
    match selection {
        None => SelectionRangeEx::empty(),
        Some(DomSelection::Range(range)) => SelectionRangeEx::Normal {
            ranges: vec![*range],
            are_all_collapsed: range.is_collapsed(),
        },
        Some(DomSelection::Image(image)) => SelectionRangeEx::ImageSelection {
            image: *image,
            ranges: vec![services.range_around_node(*image)],
            are_all_collapsed: false,
        },
        Some(DomSelection::Table(table)) => SelectionRangeEx::TableSelection {
            table: table.table,
            coordinates: Some(TableSelectionCoordinates {
                first_cell: Coordinates {
                    x: table.first_column,
                    y: table.first_row,
                },
                last_cell: Coordinates {
                    x: table.last_column,
                    y: table.last_row,
                },
            }),
            ranges: services.table_cell_ranges(table),
            are_all_collapsed: false,
        },
    }
}

/// New view of a legacy selection.
///
/// Only the first range of a `Normal` selection survives; the rest of a
/// multi-range selection is dropped. A `Normal` selection without ranges
/// and a table selection without coordinates give `None`.
pub fn range_ex_to_dom_selection(range_ex: Option<&SelectionRangeEx>) -> Option<DomSelection> {
    match range_ex? {
        SelectionRangeEx::Normal { ranges, .. } => ranges.first().copied().map(DomSelection::Range),
        SelectionRangeEx::ImageSelection { image, .. } => Some(DomSelection::Image(*image)),
        SelectionRangeEx::TableSelection {
            table,
            coordinates,
            ..
        } => coordinates.map(|c| {
            DomSelection::Table(TableSelection {
                table: *table,
                first_column: c.first_cell.x,
                first_row: c.first_cell.y,
                last_column: c.last_cell.x,
                last_row: c.last_cell.y,
            })
        }),
    }
}

#[cfg(test)]
mod tests {
    use loom_editor_core::{Dom, DomRange};

    use super::*;

    #[test]
    fn test_empty_selection_laws() {
        let dom = Dom::new();
        let empty = dom_selection_to_range_ex(None, &dom);
        assert_eq!(
            empty,
            SelectionRangeEx::Normal {
                ranges: vec![],
                are_all_collapsed: true
            }
        );
        assert_eq!(range_ex_to_dom_selection(Some(&empty)), None);
        assert_eq!(range_ex_to_dom_selection(None), None);
    }

    #[test]
    fn test_range_round_trip() {
        let mut dom = Dom::new();
        let text = dom.create_text("hello");
        let selection = DomSelection::Range(DomRange::new(text, 1, text, 4));
        let range_ex = dom_selection_to_range_ex(Some(&selection), &dom);
        assert!(!range_ex.are_all_collapsed());
        assert_eq!(range_ex_to_dom_selection(Some(&range_ex)), Some(selection));

        let caret = DomSelection::Range(DomRange::caret(text, 2));
        assert!(dom_selection_to_range_ex(Some(&caret), &dom).are_all_collapsed());
    }

    #[test]
    fn test_only_first_range_survives() {
        let mut dom = Dom::new();
        let a = dom.create_text("a");
        let b = dom.create_text("b");
        let range_ex = SelectionRangeEx::Normal {
            ranges: vec![DomRange::caret(a, 0), DomRange::caret(b, 0)],
            are_all_collapsed: true,
        };
        assert_eq!(
            range_ex_to_dom_selection(Some(&range_ex)),
            Some(DomSelection::Range(DomRange::caret(a, 0)))
        );
    }

    #[test]
    fn test_image_and_table() {
        let mut dom = Dom::new();
        let fragment = dom.parse_fragment("<img><table><tr><td>1</td><td>2</td></tr></table>");
        let img = dom.child(fragment, 0).unwrap();
        let table = dom.child(fragment, 1).unwrap();

        let image = dom_selection_to_range_ex(Some(&DomSelection::Image(img)), &dom);
        assert_eq!(
            image,
            SelectionRangeEx::ImageSelection {
                image: img,
                ranges: vec![DomRange::new(fragment, 0, fragment, 1)],
                are_all_collapsed: false,
            }
        );
        assert_eq!(
            range_ex_to_dom_selection(Some(&image)),
            Some(DomSelection::Image(img))
        );

        let selection = DomSelection::Table(TableSelection {
            table,
            first_column: 0,
            first_row: 0,
            last_column: 1,
            last_row: 0,
        });
        let range_ex = dom_selection_to_range_ex(Some(&selection), &dom);
        assert_eq!(range_ex.ranges().len(), 2);
        assert_eq!(range_ex_to_dom_selection(Some(&range_ex)), Some(selection));

        let no_coordinates = SelectionRangeEx::TableSelection {
            table,
            coordinates: None,
            ranges: vec![],
            are_all_collapsed: false,
        };
        assert_eq!(range_ex_to_dom_selection(Some(&no_coordinates)), None);
    }
}
