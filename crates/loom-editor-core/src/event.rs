//! Plugin events dispatched by the editor.
//!
//! `PluginEvent` pairs the per-dispatch [`EventDataCache`] with one of the
//! [`PluginEventKind`] variants. Every variant maps to a camelCase
//! `eventType` string via [`PluginEvent::event_type`].

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::dom::{Dom, DomRange, NodeId};
use crate::dom_event::{
    DomClipboardEvent, DomCompositionEvent, DomInputEvent, DomKeyboardEvent, DomMouseEvent,
    DomScrollEvent, RawEvent,
};
use crate::entity::Entity;
use crate::selection::DomSelection;

// === Dispatch context ===

/// Index of a plugin in the plugin list that is handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PluginSlot(pub usize);

/// Scratch data attached to one event for the duration of one dispatch.
///
/// Converting an event between plugin APIs copies the cache unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDataCache {
    /// Plugin that claimed exclusive handling of this event.
    pub exclusive_handler: Option<PluginSlot>,
    /// Fragment created for an enteredShadowEdit event, reused by every
    /// conversion of the same dispatch.
    pub shadow_fragment: Option<NodeId>,
}

// === Event payloads ===

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardEvent {
    pub raw_event: DomKeyboardEvent,
    /// Set on keyDown when an edit feature handled the key.
    pub handled_by_edit_feature: bool,
}

impl KeyboardEvent {
    pub fn new(raw_event: DomKeyboardEvent) -> Self {
        Self {
            raw_event,
            handled_by_edit_feature: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    pub raw_event: DomMouseEvent,
    /// Set on mouseUp when the mouse did not move since mouseDown.
    pub is_clicking: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BeforeCutCopyEvent {
    pub raw_event: DomClipboardEvent,
    /// Detached copy of the content about to be placed on the clipboard.
    pub cloned_root: NodeId,
    pub range: DomRange,
    pub is_cut: bool,
}

/// Clipboard payload of a paste.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClipboardData {
    pub types: Vec<String>,
    pub text: String,
    pub raw_html: Option<String>,
    pub image_data_uri: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasteType {
    #[default]
    Normal,
    AsPlainText,
    AsImage,
    MergeFormat,
}

impl PasteType {
    pub fn as_str(self) -> &'static str {
        match self {
            PasteType::Normal => "normal",
            PasteType::AsPlainText => "asPlainText",
            PasteType::AsImage => "asImage",
            PasteType::MergeFormat => "mergeFormat",
        }
    }
}

/// Options for converting pasted DOM into content.
///
/// The default value is the empty options record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomToModelOption {
    pub additional_allowed_tags: Vec<SmolStr>,
    pub additional_disallowed_tags: Vec<SmolStr>,
    pub additional_format_parsers: BTreeMap<String, Vec<String>>,
    pub format_parser_override: BTreeMap<String, String>,
    pub processor_override: BTreeMap<String, String>,
}

/// Caller-supplied merge of a pasted fragment into the document.
///
/// Arguments are the document, the target container and the fragment.
#[derive(Clone)]
pub struct CustomizedMerge(pub Rc<dyn Fn(&mut Dom, NodeId, NodeId)>);

impl CustomizedMerge {
    pub fn new(merge: impl Fn(&mut Dom, NodeId, NodeId) + 'static) -> Self {
        Self(Rc::new(merge))
    }

    pub fn call(&self, dom: &mut Dom, container: NodeId, fragment: NodeId) {
        (self.0)(dom, container, fragment)
    }
}

impl fmt::Debug for CustomizedMerge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomizedMerge(..)")
    }
}

impl PartialEq for CustomizedMerge {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeforePasteEvent {
    pub clipboard_data: ClipboardData,
    /// Fragment holding the content to be pasted.
    pub fragment: NodeId,
    pub html_before: String,
    pub html_after: String,
    pub html_attributes: BTreeMap<String, String>,
    pub paste_type: PasteType,
    pub dom_to_model_option: DomToModelOption,
    pub customized_merge: Option<CustomizedMerge>,
}

/// Screen reader announcement requested by an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnounceData {
    pub default_str_key: Option<SmolStr>,
    pub formatted_strings: Vec<String>,
    pub text: Option<String>,
}

/// Persisted state of one entity after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityState {
    pub entity_type: SmolStr,
    pub id: SmolStr,
    pub state: String,
}

/// What happened to an entity during an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedEntity {
    pub entity: Entity,
    pub operation: EntityOperation,
}

/// Content snapshot carried by contentChanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentModelSnapshot {
    pub html: String,
}

/// Known `ContentChangedEvent::source` values.
pub mod change_source {
    pub const SET_CONTENT: &str = "SetContent";
    pub const FORMAT: &str = "Format";
    pub const KEYBOARD: &str = "Keyboard";
    pub const PASTE: &str = "Paste";
    pub const CUT: &str = "Cut";
    pub const SWITCH_TO_DARK_MODE: &str = "SwitchToDarkMode";
    pub const SWITCH_TO_LIGHT_MODE: &str = "SwitchToLightMode";
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentChangedEvent {
    pub source: SmolStr,
    pub data: Option<serde_json::Value>,
    pub format_api_name: Option<SmolStr>,
    pub announce_data: Option<AnnounceData>,
    pub entity_states: Option<Vec<EntityState>>,
    pub changed_entities: Option<Vec<ChangedEntity>>,
    pub content_model: Option<ContentModelSnapshot>,
    pub selection: Option<DomSelection>,
}

impl ContentChangedEvent {
    pub fn new(source: impl Into<SmolStr>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}

/// One context menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMenuItem {
    pub key: SmolStr,
    pub label: String,
}

impl ContextMenuItem {
    pub fn new(key: impl Into<SmolStr>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityOperation {
    NewEntity,
    Overwrite,
    RemoveFromStart,
    RemoveFromEnd,
    Click,
    UpdateEntityState,
    ReplaceTemporaryContent,
    /// Formatting is about to be applied to the entity.
    BeforeFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOperationEvent {
    pub operation: EntityOperation,
    pub entity: Entity,
    pub raw_event: Option<RawEvent>,
    pub state: Option<String>,
    pub should_persist: Option<bool>,
}

// === The event union ===

#[derive(Debug, Clone, PartialEq)]
pub enum PluginEventKind {
    BeforeCutCopy(BeforeCutCopyEvent),
    BeforeDispose,
    BeforeKeyboardEditing(KeyboardEvent),
    BeforePaste(BeforePasteEvent),
    BeforeSetContent {
        new_content: String,
    },
    CompositionEnd {
        raw_event: DomCompositionEvent,
    },
    ContentChanged(ContentChangedEvent),
    ContextMenu {
        raw_event: DomMouseEvent,
        /// Menu entries; `None` is a separator.
        items: Vec<Option<ContextMenuItem>>,
    },
    EditImage {
        image: NodeId,
        original_src: String,
        previous_src: String,
        new_src: String,
    },
    EditorReady,
    EnteredShadowEdit,
    EntityOperation(EntityOperationEvent),
    ExtractContentWithDom {
        cloned_root: NodeId,
    },
    Input {
        raw_event: DomInputEvent,
    },
    KeyDown(KeyboardEvent),
    KeyPress(KeyboardEvent),
    KeyUp(KeyboardEvent),
    LeavingShadowEdit,
    LogicalRootChanged {
        logical_root: NodeId,
    },
    MouseDown(MouseEvent),
    MouseUp(MouseEvent),
    Scroll {
        raw_event: DomScrollEvent,
        scroll_container: NodeId,
    },
    SelectionChanged {
        new_selection: Option<DomSelection>,
    },
    ZoomChanged {
        new_zoom_scale: f64,
    },
}

impl PluginEventKind {
    /// The `eventType` tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            PluginEventKind::BeforeCutCopy(_) => "beforeCutCopy",
            PluginEventKind::BeforeDispose => "beforeDispose",
            PluginEventKind::BeforeKeyboardEditing(_) => "beforeKeyboardEditing",
            PluginEventKind::BeforePaste(_) => "beforePaste",
            PluginEventKind::BeforeSetContent { .. } => "beforeSetContent",
            PluginEventKind::CompositionEnd { .. } => "compositionEnd",
            PluginEventKind::ContentChanged(_) => "contentChanged",
            PluginEventKind::ContextMenu { .. } => "contextMenu",
            PluginEventKind::EditImage { .. } => "editImage",
            PluginEventKind::EditorReady => "editorReady",
            PluginEventKind::EnteredShadowEdit => "enteredShadowEdit",
            PluginEventKind::EntityOperation(_) => "entityOperation",
            PluginEventKind::ExtractContentWithDom { .. } => "extractContentWithDom",
            PluginEventKind::Input { .. } => "input",
            PluginEventKind::KeyDown(_) => "keyDown",
            PluginEventKind::KeyPress(_) => "keyPress",
            PluginEventKind::KeyUp(_) => "keyUp",
            PluginEventKind::LeavingShadowEdit => "leavingShadowEdit",
            PluginEventKind::LogicalRootChanged { .. } => "logicalRootChanged",
            PluginEventKind::MouseDown(_) => "mouseDown",
            PluginEventKind::MouseUp(_) => "mouseUp",
            PluginEventKind::Scroll { .. } => "scroll",
            PluginEventKind::SelectionChanged { .. } => "selectionChanged",
            PluginEventKind::ZoomChanged { .. } => "zoomChanged",
        }
    }
}

/// An event as seen by new-API plugins.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginEvent {
    pub event_data_cache: EventDataCache,
    pub kind: PluginEventKind,
}

impl PluginEvent {
    /// Event with a fresh cache.
    pub fn new(kind: PluginEventKind) -> Self {
        Self {
            event_data_cache: EventDataCache::default(),
            kind,
        }
    }

    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }
}

impl From<PluginEventKind> for PluginEvent {
    fn from(kind: PluginEventKind) -> Self {
        Self::new(kind)
    }
}
