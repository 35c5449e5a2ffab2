//! The legacy plugin event union.
//!
//! Variants that the two APIs share reuse the core payload types. The
//! legacy-only shapes (lazy contentChanged data, sanitizer options on
//! paste, the wider entity operation set) are defined here.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use loom_editor_core::event::{
    AnnounceData, BeforeCutCopyEvent, ClipboardData, ContextMenuItem, EntityState,
    EventDataCache, KeyboardEvent, MouseEvent,
};
use loom_editor_core::{
    DomCompositionEvent, DomInputEvent, DomMouseEvent, DomScrollEvent, DomSelection, Entity,
    NodeId, RawEvent, SelectionPath,
};

use super::deferred::Deferred;
use super::selection::SelectionRangeEx;
use crate::sanitizer::HtmlSanitizerOptions;

/// Numeric tag of a [`LegacyPluginEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PluginEventType {
    KeyDown = 0,
    KeyPress = 1,
    KeyUp = 2,
    CompositionEnd = 3,
    MouseDown = 4,
    MouseUp = 5,
    Input = 6,
    ContentChanged = 7,
    ExtractContentWithDom = 8,
    BeforeCutCopy = 9,
    BeforePaste = 10,
    EditorReady = 11,
    BeforeDispose = 12,
    PendingFormatStateChanged = 13,
    Scroll = 14,
    EntityOperation = 15,
    ContextMenu = 16,
    EnteredShadowEdit = 17,
    LeavingShadowEdit = 18,
    EditImage = 19,
    BeforeSetContent = 20,
    ZoomChanged = 21,
    SelectionChanged = 22,
    BeforeKeyboardEditing = 23,
}

// === Legacy-only payloads ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LegacyPasteType {
    #[default]
    Normal = 0,
    AsPlainText = 1,
    AsImage = 2,
    MergeFormat = 3,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeforePasteEvent {
    pub clipboard_data: ClipboardData,
    pub fragment: NodeId,
    pub html_before: String,
    pub html_after: String,
    pub html_attributes: BTreeMap<String, String>,
    pub sanitizing_option: HtmlSanitizerOptions,
    pub paste_type: LegacyPasteType,
}

/// Lazily computed extras of a legacy contentChanged event.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentChangedAdditionalData {
    pub format_api_name: Option<SmolStr>,
    pub get_announce_data: Option<Deferred<Option<AnnounceData>>>,
    pub get_entity_state: Option<Deferred<Option<Vec<EntityState>>>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentChangedEvent {
    pub source: SmolStr,
    pub data: Option<serde_json::Value>,
    pub additional_data: Option<ContentChangedAdditionalData>,
}

impl ContentChangedEvent {
    pub fn new(source: impl Into<SmolStr>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnteredShadowEditEvent {
    /// Detached copy of the content being edited.
    pub fragment: NodeId,
    pub selection_path: SelectionPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LegacyEntityOperation {
    NewEntity = 0,
    Overwrite = 1,
    PartialOverwrite = 2,
    RemoveFromStart = 3,
    RemoveFromEnd = 4,
    ContextMenu = 5,
    Escape = 6,
    Click = 7,
    AddShadowRoot = 8,
    RemoveShadowRoot = 9,
    UpdateEntityState = 10,
    ReplaceTemporaryContent = 11,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityOperationEvent {
    pub operation: LegacyEntityOperation,
    pub entity: Entity,
    pub raw_event: Option<RawEvent>,
    pub state: Option<String>,
    /// Shadow root content of the entity, for AddShadowRoot.
    pub content_for_shadow_entity: Option<NodeId>,
}

/// Formatting that will apply to the next typed character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingFormatState {
    pub is_bold: Option<bool>,
    pub is_italic: Option<bool>,
    pub is_underline: Option<bool>,
    pub font_name: Option<String>,
    pub font_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionChangedEvent {
    pub selection_range_ex: Option<SelectionRangeEx>,
    /// Only present on events built from the new selection model.
    pub new_selection: Option<DomSelection>,
}

// === The event union ===

#[derive(Debug, Clone, PartialEq)]
pub enum LegacyPluginEventKind {
    KeyDown(KeyboardEvent),
    KeyPress(KeyboardEvent),
    KeyUp(KeyboardEvent),
    CompositionEnd {
        raw_event: DomCompositionEvent,
    },
    MouseDown(MouseEvent),
    MouseUp(MouseEvent),
    Input {
        raw_event: DomInputEvent,
    },
    ContentChanged(ContentChangedEvent),
    ExtractContentWithDom {
        cloned_root: NodeId,
    },
    BeforeCutCopy(BeforeCutCopyEvent),
    BeforePaste(BeforePasteEvent),
    EditorReady,
    BeforeDispose,
    PendingFormatStateChanged {
        format_state: PendingFormatState,
    },
    Scroll {
        raw_event: DomScrollEvent,
        scroll_container: NodeId,
    },
    EntityOperation(EntityOperationEvent),
    ContextMenu {
        raw_event: DomMouseEvent,
        items: Vec<Option<ContextMenuItem>>,
    },
    EnteredShadowEdit(EnteredShadowEditEvent),
    LeavingShadowEdit,
    EditImage {
        image: NodeId,
        original_src: String,
        previous_src: String,
        new_src: String,
    },
    BeforeSetContent {
        new_content: String,
    },
    ZoomChanged {
        new_zoom_scale: f64,
    },
    SelectionChanged(SelectionChangedEvent),
    BeforeKeyboardEditing(KeyboardEvent),
}

impl LegacyPluginEventKind {
    pub fn event_type(&self) -> PluginEventType {
        match self {
            LegacyPluginEventKind::KeyDown(_) => PluginEventType::KeyDown,
            LegacyPluginEventKind::KeyPress(_) => PluginEventType::KeyPress,
            LegacyPluginEventKind::KeyUp(_) => PluginEventType::KeyUp,
            LegacyPluginEventKind::CompositionEnd { .. } => PluginEventType::CompositionEnd,
            LegacyPluginEventKind::MouseDown(_) => PluginEventType::MouseDown,
            LegacyPluginEventKind::MouseUp(_) => PluginEventType::MouseUp,
            LegacyPluginEventKind::Input { .. } => PluginEventType::Input,
            LegacyPluginEventKind::ContentChanged(_) => PluginEventType::ContentChanged,
            LegacyPluginEventKind::ExtractContentWithDom { .. } => {
                PluginEventType::ExtractContentWithDom
            }
            LegacyPluginEventKind::BeforeCutCopy(_) => PluginEventType::BeforeCutCopy,
            LegacyPluginEventKind::BeforePaste(_) => PluginEventType::BeforePaste,
            LegacyPluginEventKind::EditorReady => PluginEventType::EditorReady,
            LegacyPluginEventKind::BeforeDispose => PluginEventType::BeforeDispose,
            LegacyPluginEventKind::PendingFormatStateChanged { .. } => {
                PluginEventType::PendingFormatStateChanged
            }
            LegacyPluginEventKind::Scroll { .. } => PluginEventType::Scroll,
            LegacyPluginEventKind::EntityOperation(_) => PluginEventType::EntityOperation,
            LegacyPluginEventKind::ContextMenu { .. } => PluginEventType::ContextMenu,
            LegacyPluginEventKind::EnteredShadowEdit(_) => PluginEventType::EnteredShadowEdit,
            LegacyPluginEventKind::LeavingShadowEdit => PluginEventType::LeavingShadowEdit,
            LegacyPluginEventKind::EditImage { .. } => PluginEventType::EditImage,
            LegacyPluginEventKind::BeforeSetContent { .. } => PluginEventType::BeforeSetContent,
            LegacyPluginEventKind::ZoomChanged { .. } => PluginEventType::ZoomChanged,
            LegacyPluginEventKind::SelectionChanged(_) => PluginEventType::SelectionChanged,
            LegacyPluginEventKind::BeforeKeyboardEditing(_) => {
                PluginEventType::BeforeKeyboardEditing
            }
        }
    }
}

/// An event as seen by legacy plugins.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyPluginEvent {
    pub event_data_cache: EventDataCache,
    pub kind: LegacyPluginEventKind,
}

impl LegacyPluginEvent {
    pub fn new(kind: LegacyPluginEventKind) -> Self {
        Self {
            event_data_cache: EventDataCache::default(),
            kind,
        }
    }

    pub fn event_type(&self) -> PluginEventType {
        self.kind.event_type()
    }
}

impl From<LegacyPluginEventKind> for LegacyPluginEvent {
    fn from(kind: LegacyPluginEventKind) -> Self {
        Self::new(kind)
    }
}
