//! loom-editor-core: framework-agnostic core of the loom rich text editor.
//!
//! This crate provides:
//! - `Dom` - an arena DOM standing in for the browser's node tree, with
//!   fragment parsing, HTML serialization and range helpers
//! - `DomSelection` - the selection model (range / image / table)
//! - `ContentMetadata` - id-based selection persistence
//! - `PluginEvent` - the plugin event union and `EditorPlugin` trait
//! - `Editor` / `EditorCore` - plugin dispatch, `set_content`, `get_content`
//!
//! Legacy plugin support lives in `loom-editor-adapter`, which builds on
//! the types re-exported here.

pub mod color;
pub mod content;
pub mod dom;
pub mod dom_event;
pub mod editor;
pub mod entity;
pub mod error;
pub mod event;
pub mod metadata;
pub mod options;
pub mod plugin;
pub mod selection;
pub mod selection_path;

pub use color::{
    ColorTransformDirection, DarkColorHandler, DefaultDarkColorHandler, rgba_u32_to_css,
    transform_color,
};
pub use content::GetContentMode;
pub use dom::{Dom, DomRange, DomServices, Element, NodeId, NodeKind};
pub use dom_event::{
    DomClipboardEvent, DomCompositionEvent, DomInputEvent, DomKeyboardEvent, DomMouseEvent,
    DomScrollEvent, RawEvent,
};
pub use editor::{AnimationFrameCallback, Editor, EditorCore};
pub use entity::{Entity, commit_entity, get_entity_from_element};
pub use error::EditorError;
pub use event::*;
pub use metadata::{
    ContentMetadata, SelectionMetadata, dom_selection_to_metadata, extract_content_metadata,
    metadata_to_dom_selection,
};
pub use options::{EditorOptions, EditorSettings, TrustedHtmlHandler};
pub use plugin::EditorPlugin;
pub use selection::{DomSelection, TableSelection};
pub use selection_path::{SelectionPath, create_range_from_path, get_selection_path};
pub use smol_str::SmolStr;
