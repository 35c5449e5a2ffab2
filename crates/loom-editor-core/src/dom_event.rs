//! Raw browser events carried inside plugin events.
//!
//! These are data snapshots of the browser event objects. The only piece
//! of behaviour kept is `preventDefault`, recorded as a flag the host reads
//! back after dispatch.

use smol_str::SmolStr;

use crate::dom::NodeId;

/// Keyboard event (`keydown` / `keypress` / `keyup`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomKeyboardEvent {
    /// `KeyboardEvent.key`, e.g. `"a"`, `"Enter"`, `"ArrowLeft"`.
    pub key: SmolStr,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub shift_key: bool,
    pub meta_key: bool,
    pub default_prevented: bool,
}

impl DomKeyboardEvent {
    pub fn new(key: impl Into<SmolStr>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn has_modifier(&self) -> bool {
        self.ctrl_key || self.alt_key || self.meta_key
    }

    /// Whether the key produces a visible character.
    pub fn is_character_value(&self) -> bool {
        !self.has_modifier() && self.key.chars().count() == 1
    }
}

/// Mouse event (`mousedown` / `mouseup` / `contextmenu`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomMouseEvent {
    pub button: u8,
    pub client_x: i32,
    pub client_y: i32,
    pub target: Option<NodeId>,
    pub default_prevented: bool,
}

impl DomMouseEvent {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// `input` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomInputEvent {
    pub input_type: SmolStr,
    pub data: Option<String>,
    pub is_composing: bool,
}

/// `compositionend` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomCompositionEvent {
    pub data: String,
}

/// `cut` / `copy` / `paste` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomClipboardEvent {
    pub default_prevented: bool,
}

impl DomClipboardEvent {
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}

/// `scroll` event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DomScrollEvent {
    pub scroll_top: i32,
    pub scroll_left: i32,
}

/// Any raw event, for event types that accept several sources
/// (entity operations are triggered by clicks, keys and clipboard).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    Keyboard(DomKeyboardEvent),
    Mouse(DomMouseEvent),
    Clipboard(DomClipboardEvent),
    Input(DomInputEvent),
}
