//! loom-editor-adapter: legacy plugin support for loom-editor-core.
//!
//! Legacy plugins speak an older event taxonomy (numeric event types,
//! `SelectionRangeEx` selections, lazy contentChanged data). This crate
//! provides:
//! - `legacy` - the legacy event union, selection shape and plugin traits
//! - `selection_converter` / `event_converter` - translation in both
//!   directions
//! - `BridgePlugin` - a new-API plugin that runs a list of legacy plugins
//! - `EditorAdapter` - an editor wired up with the bridge

pub mod adapter;
pub mod bridge;
pub mod event_converter;
pub mod legacy;
pub mod plugins;
pub mod sanitizer;
pub mod selection_converter;

pub use adapter::{AdapterOptions, EditorAdapter};
pub use bridge::BridgePlugin;
pub use event_converter::{new_event_to_old_event, old_event_to_new_event};
pub use legacy::{
    AdapterContext, ContextMenuProvider, LegacyEditor, LegacyEditorPlugin, LegacyPluginEvent,
    LegacyPluginEventKind, PluginEventType, SelectionRangeEx,
};
pub use plugins::{ContentEditFeature, EditPlugin, EntityDelimiterPlugin, EventTypeTranslatePlugin};
pub use sanitizer::{HtmlSanitizerOptions, create_default_html_sanitizer_options};
pub use selection_converter::{
    dom_selection_to_range_ex, metadata_to_dom_selection, range_ex_to_dom_selection,
};

pub use loom_editor_core;
