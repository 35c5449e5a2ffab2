//! Zero-width delimiters around read-only inline entities.
//!
//! A caret cannot be placed next to an atomic inline element in a
//! contentEditable, so every such entity gets a `<span>` holding a single
//! zero-width space on each side. Once the user types into a delimiter it
//! becomes ordinary text: the marker class is stripped and, one frame
//! later, the zero-width space is removed.

use loom_editor_core::event::KeyboardEvent;
use loom_editor_core::{Dom, DomRange, EditorCore, EditorError, NodeId, get_entity_from_element};

use crate::legacy::{
    LegacyEditor, LegacyEditorPlugin, LegacyPluginEvent, LegacyPluginEventKind, SelectionRangeEx,
};

pub const DELIMITER_BEFORE: &str = "entityDelimiterBefore";
pub const DELIMITER_AFTER: &str = "entityDelimiterAfter";
pub const ZERO_WIDTH_SPACE: &str = "\u{200B}";

/// Block attribute marking a paragraph the editor inserted on its own.
pub const IMPLICIT_PARAGRAPH_ATTR: &str = "data-implicit-paragraph";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Before,
    After,
}

impl Side {
    fn class(self) -> &'static str {
        match self {
            Side::Before => DELIMITER_BEFORE,
            Side::After => DELIMITER_AFTER,
        }
    }
}

fn delimiter_side(dom: &Dom, node: NodeId) -> Option<Side> {
    if dom.has_class(node, DELIMITER_BEFORE) {
        Some(Side::Before)
    } else if dom.has_class(node, DELIMITER_AFTER) {
        Some(Side::After)
    } else {
        None
    }
}

/// Read-only inline entity wrappers are the ones that need delimiters.
fn needs_delimiters(dom: &Dom, node: NodeId) -> bool {
    !dom.is_block_element(node)
        && get_entity_from_element(dom, node).is_some_and(|entity| entity.is_readonly)
}

fn create_delimiter(dom: &mut Dom, side: Side) -> NodeId {
    let span = dom.create_element_with("span", &[("class", side.class())]);
    let marker = dom.create_text(ZERO_WIDTH_SPACE);
    dom.append_child(span, marker);
    span
}

fn demote(dom: &mut Dom, delimiter: NodeId) {
    dom.remove_class(delimiter, DELIMITER_BEFORE);
    dom.remove_class(delimiter, DELIMITER_AFTER);
}

/// Remove every zero-width space from the text below `node`.
fn strip_marker(dom: &mut Dom, node: NodeId) {
    for child in dom.descendants(node) {
        let cleaned = dom
            .text(child)
            .filter(|text| dom.is_text(child) && text.contains(ZERO_WIDTH_SPACE))
            .map(|text| text.replace(ZERO_WIDTH_SPACE, ""));
        if let Some(cleaned) = cleaned {
            dom.set_text(child, cleaned);
        }
    }
}

/// Turn a delimiter holding typed text into a plain span of that text.
fn demote_typed(dom: &mut Dom, delimiter: NodeId) {
    demote(dom, delimiter);
    strip_marker(dom, delimiter);
    let only_text = dom.children(delimiter).iter().all(|&c| dom.is_text(c));
    if only_text && dom.text_content(delimiter).is_empty() {
        dom.detach(delimiter);
    }
}

/// The delimiter the caret sits in, or the one right next to it when the
/// caret is placed between the children of an element.
fn delimiter_at_caret(dom: &Dom, root: NodeId, caret: &DomRange) -> Option<NodeId> {
    let is_delimiter = |dom: &Dom, n: NodeId| delimiter_side(dom, n).is_some();
    if let Some(delimiter) = dom.closest(caret.start_container, root, is_delimiter) {
        return Some(delimiter);
    }
    if !dom.is_element(caret.start_container) {
        return None;
    }
    let offset = caret.start_offset;
    let after = dom.child(caret.start_container, offset);
    let before = offset
        .checked_sub(1)
        .and_then(|index| dom.child(caret.start_container, index));
    [after, before]
        .into_iter()
        .flatten()
        .find(|&n| is_delimiter(dom, n))
}

/// Add missing delimiters around every entity below `root`.
pub fn add_delimiters(dom: &mut Dom, root: NodeId) {
    let entities: Vec<NodeId> = dom
        .descendants(root)
        .into_iter()
        .filter(|&node| needs_delimiters(dom, node))
        .collect();

    for wrapper in entities {
        let Some(parent) = dom.parent(wrapper) else {
            continue;
        };
        let has_before = dom
            .previous_element_sibling(wrapper)
            .is_some_and(|n| delimiter_side(dom, n) == Some(Side::Before));
        if !has_before {
            let delimiter = create_delimiter(dom, Side::Before);
            dom.insert_before(parent, delimiter, Some(wrapper));
        }

        let has_after = dom
            .next_element_sibling(wrapper)
            .is_some_and(|n| delimiter_side(dom, n) == Some(Side::After));
        if !has_after {
            let delimiter = create_delimiter(dom, Side::After);
            dom.insert_after(wrapper, delimiter);
        }
    }
}

/// Bring the delimiters below `root` back in line with the entities.
///
/// Delimiters that hold more than the marker become plain spans of the
/// typed text. Marker
/// delimiters whose entity is gone are removed. Entities missing a
/// delimiter get one.
pub fn normalize_delimiters(dom: &mut Dom, root: NodeId) {
    let delimiters: Vec<(NodeId, Side)> = dom
        .descendants(root)
        .into_iter()
        .filter_map(|node| delimiter_side(dom, node).map(|side| (node, side)))
        .collect();

    for (delimiter, side) in delimiters {
        if dom.text_content(delimiter) != ZERO_WIDTH_SPACE {
            demote_typed(dom, delimiter);
            continue;
        }
        let neighbour = match side {
            Side::Before => dom.next_element_sibling(delimiter),
            Side::After => dom.previous_element_sibling(delimiter),
        };
        if !neighbour.is_some_and(|n| needs_delimiters(dom, n)) {
            tracing::trace!(?delimiter, "removing orphaned entity delimiter");
            dom.detach(delimiter);
        }
    }

    add_delimiters(dom, root);
}

/// Remove delimiters below `root` so none of the marker reaches exported
/// HTML. Marker-only delimiters go away; typed ones keep their text.
/// Used on cloned content only.
pub fn remove_delimiters(dom: &mut Dom, root: NodeId) {
    let delimiters: Vec<NodeId> = dom
        .descendants(root)
        .into_iter()
        .filter(|&node| delimiter_side(dom, node).is_some())
        .collect();
    for delimiter in delimiters {
        if dom.text_content(delimiter) == ZERO_WIDTH_SPACE {
            dom.detach(delimiter);
        } else {
            demote_typed(dom, delimiter);
        }
    }
}

/// Keeps entity delimiters in place and turns them into text once typed
/// into.
#[derive(Debug, Default)]
pub struct EntityDelimiterPlugin;

impl EntityDelimiterPlugin {
    pub fn new() -> Self {
        Self
    }

    fn handle_key_down(editor: &mut LegacyEditor<'_>, event: &KeyboardEvent) {
        let raw = &event.raw_event;
        let is_enter = raw.key == "Enter";
        if !is_enter && !raw.is_character_value() {
            return;
        }

        let range_ex = editor.get_selection_range_ex();
        let SelectionRangeEx::Normal {
            ranges,
            are_all_collapsed: true,
        } = &range_ex
        else {
            return;
        };
        let Some(caret) = ranges.first() else {
            return;
        };

        let root = editor.content_div();
        let Some(delimiter) = delimiter_at_caret(editor.dom(), root, caret) else {
            return;
        };
        if !is_enter && editor.dom().text_content(delimiter) != ZERO_WIDTH_SPACE {
            return;
        }

        tracing::trace!(?delimiter, key = %raw.key, "typing into entity delimiter");
        demote(editor.dom_mut(), delimiter);
        editor.run_async(move |core| finish_typed_delimiter(core, delimiter));
    }
}

/// Frame callback after a key was typed into a delimiter: drop the marker
/// character and make the surrounding block explicit.
fn finish_typed_delimiter(core: &mut EditorCore, delimiter: NodeId) {
    let root = core.content_div();
    if core.is_disposed() || !core.dom().contains(root, delimiter) {
        return;
    }
    let dom = core.dom_mut();
    strip_marker(dom, delimiter);

    if let Some(block) = dom.closest(delimiter, root, |dom, n| dom.is_block_element(n)) {
        dom.remove_attribute(block, IMPLICIT_PARAGRAPH_ATTR);
    }
}

impl LegacyEditorPlugin for EntityDelimiterPlugin {
    fn name(&self) -> &str {
        "EntityDelimiter"
    }

    fn initialize(&mut self, _editor: &mut LegacyEditor<'_>) -> Result<(), EditorError> {
        Ok(())
    }

    fn dispose(&mut self) {}

    fn on_plugin_event(
        &mut self,
        editor: &mut LegacyEditor<'_>,
        event: &mut LegacyPluginEvent,
    ) -> Result<(), EditorError> {
        match &event.kind {
            LegacyPluginEventKind::ContentChanged(_) | LegacyPluginEventKind::EditorReady => {
                let root = editor.content_div();
                normalize_delimiters(editor.dom_mut(), root);
            }
            LegacyPluginEventKind::BeforePaste(paste) => {
                add_delimiters(editor.dom_mut(), paste.fragment);
            }
            LegacyPluginEventKind::ExtractContentWithDom { cloned_root } => {
                remove_delimiters(editor.dom_mut(), *cloned_root);
            }
            LegacyPluginEventKind::BeforeCutCopy(copy) => {
                remove_delimiters(editor.dom_mut(), copy.cloned_root);
            }
            LegacyPluginEventKind::KeyDown(key_event) => {
                Self::handle_key_down(editor, key_event);
            }
            _ => {}
        }
        Ok(())
    }
}
