//! An editor that runs legacy plugins next to new ones.

use std::rc::Rc;

use loom_editor_core::{
    ContentMetadata, ContextMenuItem, Dom, DomSelection, Editor, EditorError, EditorOptions,
    GetContentMode, NodeId, PluginEvent,
};

use crate::bridge::BridgePlugin;
use crate::legacy::{AdapterContext, LegacyEditorPlugin, SelectionRangeEx};
use crate::plugins::ContentEditFeature;
use crate::selection_converter::dom_selection_to_range_ex;

/// Options for [`EditorAdapter::new`].
#[derive(Default)]
pub struct AdapterOptions {
    /// Options of the underlying editor. Its plugins run after the legacy
    /// plugins.
    pub editor: EditorOptions,
    /// Legacy plugins in dispatch order. `None` entries are skipped.
    pub legacy_plugins: Vec<Option<Box<dyn LegacyEditorPlugin>>>,
    /// Features handed to the edit plugin.
    pub edit_features: Vec<Box<dyn ContentEditFeature>>,
}

#[derive(Debug)]
pub struct EditorAdapter {
    editor: Editor,
    context: Rc<AdapterContext>,
}

impl EditorAdapter {
    /// Create the bridge, connect it to a fresh [`AdapterContext`], and
    /// build the editor with the bridge as its first plugin.
    pub fn new(dom: Dom, content_div: NodeId, options: AdapterOptions) -> Result<Self, EditorError> {
        let AdapterOptions {
            editor: mut editor_options,
            legacy_plugins,
            edit_features,
        } = options;

        let mut bridge = BridgePlugin::new(legacy_plugins, edit_features);
        let context = Rc::new(AdapterContext::new());
        bridge.set_outer_editor(Rc::clone(&context));
        editor_options.plugins.insert(0, Box::new(bridge));

        let editor = Editor::new(dom, content_div, editor_options)?;
        Ok(Self { editor, context })
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn context(&self) -> &AdapterContext {
        &self.context
    }

    pub fn trigger_event(
        &mut self,
        event: impl Into<PluginEvent>,
        broadcast: bool,
    ) -> Result<PluginEvent, EditorError> {
        self.editor.trigger_event(event, broadcast)
    }

    pub fn set_content(
        &mut self,
        html: &str,
        trigger_content_changed: bool,
        metadata: Option<ContentMetadata>,
    ) -> Result<(), EditorError> {
        self.editor.set_content(html, trigger_content_changed, metadata)
    }

    pub fn get_content(&mut self, mode: GetContentMode) -> Result<String, EditorError> {
        self.editor.get_content(mode)
    }

    pub fn select(&mut self, selection: Option<DomSelection>) -> Result<(), EditorError> {
        self.editor.select(selection)
    }

    /// The current selection in legacy form.
    pub fn get_selection_range_ex(&self) -> SelectionRangeEx {
        let core = self.editor.core();
        dom_selection_to_range_ex(core.selection(), core.dom())
    }

    pub fn get_context_menu_items(&mut self, target: NodeId) -> Vec<Option<ContextMenuItem>> {
        self.editor.get_context_menu_items(target)
    }

    pub fn run_animation_frames(&mut self) -> usize {
        self.editor.run_animation_frames()
    }

    /// Dispose the editor and drop all custom data.
    pub fn dispose(&mut self) {
        self.editor.dispose();
        self.context.clear_custom_data();
    }
}
