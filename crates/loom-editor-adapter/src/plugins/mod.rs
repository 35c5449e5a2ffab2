//! Legacy plugins shipped with the adapter.

pub mod edit;
pub mod entity_delimiter;
pub mod event_type_translate;

pub use edit::{ContentEditFeature, EditPlugin};
pub use entity_delimiter::EntityDelimiterPlugin;
pub use event_type_translate::EventTypeTranslatePlugin;
