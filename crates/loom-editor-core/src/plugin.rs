//! The plugin interface of the editor.

use crate::dom::NodeId;
use crate::editor::EditorCore;
use crate::error::EditorError;
use crate::event::{ContextMenuItem, PluginEvent};

/// A plugin hosted by [`Editor`](crate::Editor).
///
/// Plugins are owned by the editor and receive the editor state as a
/// parameter on every call instead of keeping a reference to it.
pub trait EditorPlugin {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Called once, in plugin order, when the editor is created.
    fn initialize(&mut self, core: &mut EditorCore) -> Result<(), EditorError>;

    /// Called once, in reverse plugin order, when the editor is disposed.
    fn dispose(&mut self);

    /// Ask whether this plugin wants to be the only receiver of `event`.
    ///
    /// Only consulted for non-broadcast dispatch. The first plugin to
    /// return `true` gets the event and nobody else does.
    fn will_handle_event_exclusively(
        &mut self,
        _core: &mut EditorCore,
        _event: &mut PluginEvent,
    ) -> bool {
        false
    }

    /// Handle an event. The event may be modified in place; later plugins
    /// see the modifications.
    fn on_plugin_event(
        &mut self,
        _core: &mut EditorCore,
        _event: &mut PluginEvent,
    ) -> Result<(), EditorError> {
        Ok(())
    }

    /// Context menu entries for `target`, `None` when the plugin does not
    /// provide a context menu. `None` entries inside the list are
    /// separators.
    fn context_menu_items(
        &mut self,
        _core: &mut EditorCore,
        _target: NodeId,
    ) -> Option<Vec<Option<ContextMenuItem>>> {
        None
    }
}
