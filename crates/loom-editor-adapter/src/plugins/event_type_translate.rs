//! Fills in the legacy selection of selectionChanged events that only carry
//! a new selection.

use loom_editor_core::EditorError;

use crate::legacy::{
    LegacyEditor, LegacyEditorPlugin, LegacyPluginEvent, LegacyPluginEventKind,
    SelectionChangedEvent,
};
use crate::selection_converter::dom_selection_to_range_ex;

#[derive(Debug, Default)]
pub struct EventTypeTranslatePlugin;

impl EventTypeTranslatePlugin {
    pub fn new() -> Self {
        Self
    }
}

impl LegacyEditorPlugin for EventTypeTranslatePlugin {
    fn name(&self) -> &str {
        "EventTypeTranslate"
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
        if let LegacyPluginEventKind::SelectionChanged(SelectionChangedEvent {
            selection_range_ex: range_ex @ None,
            new_selection: Some(selection),
        }) = &mut event.kind
        {
            *range_ex = Some(dom_selection_to_range_ex(Some(&*selection), editor.dom()));
        }
        Ok(())
    }
}
