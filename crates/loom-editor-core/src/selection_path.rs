//! Index paths describing a position relative to a root node.
//!
//! A path is the chain of child indices leading from the root to a node,
//! followed by the offset inside that node (characters for text, children
//! for containers). `[1, 0, 3]` means "child 1 of root, its child 0,
//! offset 3". Paths survive serialization and re-parsing as long as the
//! markup does not change shape.

use serde::{Deserialize, Serialize};

use crate::dom::{Dom, DomRange, NodeId};
use crate::error::EditorError;

/// Start and end paths of a range.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SelectionPath {
    pub start: Vec<usize>,
    pub end: Vec<usize>,
}

impl SelectionPath {
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.end.is_empty()
    }
}

/// Path of `range` under `root`, or `None` when either boundary lies
/// outside `root`.
pub fn get_selection_path(dom: &Dom, root: NodeId, range: &DomRange) -> Option<SelectionPath> {
    Some(SelectionPath {
        start: position_path(dom, root, range.start_container, range.start_offset)?,
        end: position_path(dom, root, range.end_container, range.end_offset)?,
    })
}

fn position_path(dom: &Dom, root: NodeId, node: NodeId, offset: usize) -> Option<Vec<usize>> {
    let mut path = vec![offset];
    let mut current = node;
    while current != root {
        path.push(dom.index_in_parent(current)?);
        current = dom.parent(current)?;
    }
    path.reverse();
    Some(path)
}

/// Resolve a stored start/end path pair back into a live range.
///
/// Fails with [`EditorError::InvalidSelectionPath`] when a path is empty,
/// walks off the tree, or ends with an offset past the node's length.
pub fn create_range_from_path(
    dom: &Dom,
    root: NodeId,
    start: &[usize],
    end: &[usize],
) -> Result<DomRange, EditorError> {
    let (start_container, start_offset) = resolve_position(dom, root, start)?;
    let (end_container, end_offset) = resolve_position(dom, root, end)?;
    Ok(DomRange::new(
        start_container,
        start_offset,
        end_container,
        end_offset,
    ))
}

fn resolve_position(
    dom: &Dom,
    root: NodeId,
    path: &[usize],
) -> Result<(NodeId, usize), EditorError> {
    let invalid = || EditorError::InvalidSelectionPath {
        root,
        path: path.to_vec(),
    };

    let (&offset, indices) = path.split_last().ok_or_else(invalid)?;
    let mut node = root;
    for &index in indices {
        node = dom.child(node, index).ok_or_else(invalid)?;
    }
    if offset > dom.node_length(node) {
        return Err(invalid());
    }
    Ok((node, offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let root = dom.create_element("div");
        let fragment = dom.parse_fragment("<p>hello</p><p>wo<b>rld</b></p>");
        dom.append_child(root, fragment);
        (dom, root)
    }

    #[test]
    fn test_path_roundtrip() {
        let (dom, root) = sample();
        let first_text = dom.first_child(dom.child(root, 0).unwrap()).unwrap();
        let bold = dom.child(dom.child(root, 1).unwrap(), 1).unwrap();
        let bold_text = dom.first_child(bold).unwrap();

        let range = DomRange::new(first_text, 2, bold_text, 3);
        let path = get_selection_path(&dom, root, &range).unwrap();
        assert_eq!(path.start, vec![0, 0, 2]);
        assert_eq!(path.end, vec![1, 1, 0, 3]);

        let restored = create_range_from_path(&dom, root, &path.start, &path.end).unwrap();
        assert_eq!(restored, range);
    }

    #[test]
    fn test_path_outside_root() {
        let (mut dom, root) = sample();
        let stray = dom.create_text("x");
        assert_eq!(
            get_selection_path(&dom, root, &DomRange::caret(stray, 0)),
            None
        );
    }

    #[test]
    fn test_invalid_paths() {
        let (dom, root) = sample();
        assert!(matches!(
            create_range_from_path(&dom, root, &[], &[0]),
            Err(EditorError::InvalidSelectionPath { .. })
        ));
        assert!(matches!(
            create_range_from_path(&dom, root, &[5, 0], &[0]),
            Err(EditorError::InvalidSelectionPath { .. })
        ));
        // "hello" has five characters
        assert!(create_range_from_path(&dom, root, &[0, 0, 5], &[0, 0, 5]).is_ok());
        assert!(create_range_from_path(&dom, root, &[0, 0, 6], &[0, 0, 6]).is_err());
    }
}
