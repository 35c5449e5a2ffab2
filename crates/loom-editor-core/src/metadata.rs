//! Persisted selection metadata.
//!
//! `ContentMetadata` describes a selection by element id and index paths
//! instead of live nodes, so it can be stored next to serialized HTML (as a
//! trailing `<!--{json}-->` comment) and matched again after a fresh parse.

use serde::{Deserialize, Serialize};

use crate::dom::{Dom, NodeId, NodeKind};
use crate::error::EditorError;
use crate::selection::{DomSelection, TableSelection};
use crate::selection_path::{create_range_from_path, get_selection_path};

/// Selection persisted alongside content, plus the colour mode the
/// content was serialized in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    #[serde(default)]
    pub is_dark_mode: bool,
    #[serde(flatten)]
    pub selection: SelectionMetadata,
}

/// The three persisted selection shapes, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SelectionMetadata {
    Normal {
        start: Vec<usize>,
        end: Vec<usize>,
    },
    Table {
        table_id: String,
        first_column: usize,
        first_row: usize,
        last_column: usize,
        last_row: usize,
    },
    Image {
        image_id: String,
    },
}

impl ContentMetadata {
    pub fn to_json(&self) -> String {
        // Only plain strings and integers; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Resolve persisted metadata to a live selection under `container`.
///
/// Absent metadata and ids that no longer resolve (or resolve to an element
/// of the wrong kind) give `Ok(None)`. Paths that no longer fit the content
/// are an error.
pub fn metadata_to_dom_selection(
    dom: &Dom,
    container: NodeId,
    metadata: Option<&ContentMetadata>,
) -> Result<Option<DomSelection>, EditorError> {
    let Some(metadata) = metadata else {
        return Ok(None);
    };

    match &metadata.selection {
        SelectionMetadata::Normal { start, end } => {
            let range = create_range_from_path(dom, container, start, end)?;
            Ok(Some(DomSelection::Range(range)))
        }
        SelectionMetadata::Table {
            table_id,
            first_column,
            first_row,
            last_column,
            last_row,
        } => {
            let Some(table) = find_tagged(dom, container, table_id, "table") else {
                tracing::debug!(table_id, "stale table selection metadata");
                return Ok(None);
            };
            Ok(Some(DomSelection::Table(TableSelection {
                table,
                first_column: *first_column,
                first_row: *first_row,
                last_column: *last_column,
                last_row: *last_row,
            })))
        }
        SelectionMetadata::Image { image_id } => {
            let Some(image) = find_tagged(dom, container, image_id, "img") else {
                tracing::debug!(image_id, "stale image selection metadata");
                return Ok(None);
            };
            Ok(Some(DomSelection::Image(image)))
        }
    }
}

fn find_tagged(dom: &Dom, container: NodeId, id: &str, tag: &str) -> Option<NodeId> {
    dom.find_by_id(container, id)
        .filter(|&node| dom.tag(node) == Some(tag))
}

/// Describe `selection` as metadata relative to `container`.
///
/// Tables and images without an `id` get a generated one so the metadata
/// can find them again. Returns `None` when there is no selection or the
/// range lies outside `container`.
pub fn dom_selection_to_metadata(
    dom: &mut Dom,
    container: NodeId,
    selection: Option<&DomSelection>,
    is_dark_mode: bool,
) -> Option<ContentMetadata> {
    let selection = match selection? {
        DomSelection::Range(range) => {
            let path = get_selection_path(dom, container, range)?;
            SelectionMetadata::Normal {
                start: path.start,
                end: path.end,
            }
        }
        DomSelection::Table(table) => SelectionMetadata::Table {
            table_id: ensure_id(dom, container, table.table, "loom_table"),
            first_column: table.first_column,
            first_row: table.first_row,
            last_column: table.last_column,
            last_row: table.last_row,
        },
        DomSelection::Image(image) => SelectionMetadata::Image {
            image_id: ensure_id(dom, container, *image, "loom_image"),
        },
    };

    Some(ContentMetadata {
        is_dark_mode,
        selection,
    })
}

fn ensure_id(dom: &mut Dom, container: NodeId, node: NodeId, prefix: &str) -> String {
    if let Some(id) = dom.element_id(node).filter(|id| !id.is_empty()) {
        return id.to_string();
    }
    let id = (0..)
        .map(|n| format!("{prefix}_{n}"))
        .find(|candidate| dom.find_by_id(container, candidate).is_none())
        .unwrap_or_else(|| prefix.to_string());
    dom.set_attribute(node, "id", id.clone());
    id
}

/// Detach a trailing metadata comment from `root` and parse it.
///
/// Only a last child that is a comment holding valid metadata JSON counts.
/// Anything else is left in place and `None` is returned.
pub fn extract_content_metadata(dom: &mut Dom, root: NodeId) -> Option<ContentMetadata> {
    let last = dom.last_child(root)?;
    let NodeKind::Comment(text) = dom.kind(last) else {
        return None;
    };
    let metadata = ContentMetadata::from_json(text)?;
    dom.detach(last);
    Some(metadata)
}
