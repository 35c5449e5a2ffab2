//! The legacy plugin API: events, selections, the plugin traits and the
//! editor handle legacy plugins work against.

pub mod deferred;
pub mod editor;
pub mod event;
pub mod plugin;
pub mod selection;

pub use deferred::Deferred;
pub use editor::{AdapterContext, LegacyEditor};
pub use event::{
    BeforePasteEvent, ContentChangedAdditionalData, ContentChangedEvent, EnteredShadowEditEvent,
    EntityOperationEvent, LegacyEntityOperation, LegacyPasteType, LegacyPluginEvent,
    LegacyPluginEventKind, PendingFormatState, PluginEventType, SelectionChangedEvent,
};
pub use plugin::{ContextMenuProvider, LegacyEditorPlugin};
pub use selection::{
    Coordinates, SelectionRangeEx, SelectionRangeTypes, TableSelectionCoordinates,
};
