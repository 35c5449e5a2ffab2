//! The legacy plugin interface.

use loom_editor_core::{ContextMenuItem, EditorError, NodeId};

use super::editor::LegacyEditor;
use super::event::LegacyPluginEvent;

/// A plugin written against the legacy editor API.
pub trait LegacyEditorPlugin {
    fn name(&self) -> &str;

    fn initialize(&mut self, editor: &mut LegacyEditor<'_>) -> Result<(), EditorError>;

    fn dispose(&mut self);

    fn on_plugin_event(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        _event: &mut LegacyPluginEvent,
    ) -> Result<(), EditorError> {
        Ok(())
    }

    /// Declares that [`will_handle_event_exclusively`] may return `true`.
    /// Checked once when the plugin is registered.
    ///
    /// [`will_handle_event_exclusively`]: Self::will_handle_event_exclusively
    fn can_handle_events_exclusively(&self) -> bool {
        false
    }

    fn will_handle_event_exclusively(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        _event: &LegacyPluginEvent,
    ) -> bool {
        false
    }

    /// The plugin's context menu capability, if it has one.
    fn as_context_menu_provider(&mut self) -> Option<&mut dyn ContextMenuProvider> {
        None
    }
}

/// Legacy plugins that contribute context menu entries.
pub trait ContextMenuProvider {
    fn get_context_menu_items(
        &mut self,
        editor: &mut LegacyEditor<'_>,
        target: NodeId,
    ) -> Vec<ContextMenuItem>;
}
