//! The new-API plugin that hosts the legacy plugins.
//!
//! Every new event is converted to its legacy form, dispatched through the
//! legacy plugin list, and converted back into the same `PluginEvent` the
//! editor handed in, with the original event as the reference for fields
//! the legacy form cannot carry.
//!
//! The bridge is built before the editor exists and only learns about the
//! editor afterwards through [`BridgePlugin::set_outer_editor`]. This order
//! is required: [`EditorAdapter`](crate::EditorAdapter) creates the bridge,
//! wires the context, then hands the bridge to the editor it constructs.

use std::fmt;
use std::rc::Rc;

use loom_editor_core::{
    ContextMenuItem, EditorCore, EditorError, EditorPlugin, NodeId, PluginEvent, PluginEventKind,
    PluginSlot,
};

use crate::event_converter::{new_event_to_old_event, old_event_to_new_event};
use crate::legacy::{
    AdapterContext, LegacyEditor, LegacyEditorPlugin, LegacyPluginEvent, LegacyPluginEventKind,
};
use crate::plugins::{ContentEditFeature, EditPlugin, EntityDelimiterPlugin};

const BRIDGE_NAME: &str = "Bridge";

pub struct BridgePlugin {
    legacy_plugins: Vec<Box<dyn LegacyEditorPlugin>>,
    /// Indices into `legacy_plugins` of plugins with a context menu.
    context_menu_providers: Vec<usize>,
    check_exclusivity: bool,
    outer_editor: Option<Rc<AdapterContext>>,
    /// Set once legacy plugins got their editorReady from `initialize`, so
    /// the editor's own broadcast is not delivered a second time.
    editor_ready_sent: bool,
}

impl fmt::Debug for BridgePlugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgePlugin")
            .field("legacy_plugins", &self.legacy_plugin_names())
            .field("context_menu_providers", &self.context_menu_providers)
            .field("check_exclusivity", &self.check_exclusivity)
            .field("has_outer_editor", &self.outer_editor.is_some())
            .finish()
    }
}

impl BridgePlugin {
    /// Build the legacy plugin list: the edit plugin first, then the
    /// non-`None` entries of `legacy_plugins`, then the entity delimiter
    /// plugin.
    pub fn new(
        legacy_plugins: Vec<Option<Box<dyn LegacyEditorPlugin>>>,
        edit_features: Vec<Box<dyn ContentEditFeature>>,
    ) -> Self {
        let mut plugins: Vec<Box<dyn LegacyEditorPlugin>> =
            Vec::with_capacity(legacy_plugins.len() + 2);
        plugins.push(Box::new(EditPlugin::new(edit_features)));
        plugins.extend(legacy_plugins.into_iter().flatten());
        plugins.push(Box::new(EntityDelimiterPlugin::new()));

        let context_menu_providers = plugins
            .iter_mut()
            .enumerate()
            .filter_map(|(index, plugin)| plugin.as_context_menu_provider().map(|_| index))
            .collect();
        let check_exclusivity = plugins
            .iter()
            .any(|plugin| plugin.can_handle_events_exclusively());

        Self {
            legacy_plugins: plugins,
            context_menu_providers,
            check_exclusivity,
            outer_editor: None,
            editor_ready_sent: false,
        }
    }

    /// Attach the editor context. Must happen before the editor
    /// initializes its plugins.
    pub fn set_outer_editor(&mut self, context: Rc<AdapterContext>) {
        self.outer_editor = Some(context);
    }

    pub fn legacy_plugin_names(&self) -> Vec<&str> {
        self.legacy_plugins.iter().map(|p| p.name()).collect()
    }

    /// Context menu entries of the legacy plugins for `target`. Groups from
    /// different plugins are separated by a single `None`.
    pub fn get_context_menu_items(
        &mut self,
        core: &mut EditorCore,
        target: NodeId,
    ) -> Vec<Option<ContextMenuItem>> {
        let Some(context) = self.outer_editor.clone() else {
            return Vec::new();
        };
        let mut editor = LegacyEditor::new(core, &context);

        let mut items = Vec::new();
        for &index in &self.context_menu_providers {
            let Some(provider) = self
                .legacy_plugins
                .get_mut(index)
                .and_then(|plugin| plugin.as_context_menu_provider())
            else {
                continue;
            };
            let group = provider.get_context_menu_items(&mut editor, target);
            if group.is_empty() {
                continue;
            }
            if !items.is_empty() {
                items.push(None);
            }
            items.extend(group.into_iter().map(Some));
        }
        items
    }
}

/// Legacy form of `event`. A fragment synthesized for enteredShadowEdit is
/// remembered in the event's data cache so the exclusivity check and the
/// dispatch see the same one.
fn to_legacy_event(core: &mut EditorCore, event: &mut PluginEvent) -> Option<LegacyPluginEvent> {
    let mut old = new_event_to_old_event(event, None, core.dom_mut())?;
    if let LegacyPluginEventKind::EnteredShadowEdit(shadow) = &old.kind {
        event.event_data_cache.shadow_fragment = Some(shadow.fragment);
        old.event_data_cache.shadow_fragment = Some(shadow.fragment);
    }
    Some(old)
}

impl EditorPlugin for BridgePlugin {
    fn name(&self) -> &str {
        BRIDGE_NAME
    }

    fn initialize(&mut self, core: &mut EditorCore) -> Result<(), EditorError> {
        let context = self
            .outer_editor
            .clone()
            .ok_or_else(|| EditorError::PluginInit {
                plugin: BRIDGE_NAME.into(),
                reason: "set_outer_editor was not called before initialize".to_string(),
            })?;
        let mut editor = LegacyEditor::new(core, &context);

        for plugin in self.legacy_plugins.iter_mut() {
            tracing::debug!(plugin = plugin.name(), "initializing legacy plugin");
            plugin.initialize(&mut editor)?;
        }

        // editorReady goes out only once every plugin has initialized.
        for plugin in self.legacy_plugins.iter_mut() {
            let mut ready = LegacyPluginEvent::new(LegacyPluginEventKind::EditorReady);
            plugin.on_plugin_event(&mut editor, &mut ready)?;
        }
        self.editor_ready_sent = true;
        Ok(())
    }

    fn dispose(&mut self) {
        for plugin in self.legacy_plugins.iter_mut().rev() {
            tracing::debug!(plugin = plugin.name(), "disposing legacy plugin");
            plugin.dispose();
        }
    }

    fn will_handle_event_exclusively(
        &mut self,
        core: &mut EditorCore,
        event: &mut PluginEvent,
    ) -> bool {
        if !self.check_exclusivity {
            return false;
        }
        let Some(context) = self.outer_editor.clone() else {
            return false;
        };
        let Some(old) = to_legacy_event(core, event) else {
            return false;
        };

        let mut editor = LegacyEditor::new(core, &context);
        let claimant = self
            .legacy_plugins
            .iter_mut()
            .position(|plugin| plugin.will_handle_event_exclusively(&mut editor, &old));

        match claimant {
            Some(index) => {
                tracing::trace!(
                    plugin = self.legacy_plugins[index].name(),
                    event = event.event_type(),
                    "legacy plugin claims event"
                );
                event.event_data_cache.exclusive_handler = Some(PluginSlot(index));
                true
            }
            None => false,
        }
    }

    fn on_plugin_event(
        &mut self,
        core: &mut EditorCore,
        event: &mut PluginEvent,
    ) -> Result<(), EditorError> {
        let Some(context) = self.outer_editor.clone() else {
            return Ok(());
        };
        if matches!(event.kind, PluginEventKind::EditorReady)
            && std::mem::take(&mut self.editor_ready_sent)
        {
            return Ok(());
        }
        let Some(mut old) = to_legacy_event(core, event) else {
            tracing::trace!(event = event.event_type(), "no legacy form, skipping legacy plugins");
            return Ok(());
        };
        let mut editor = LegacyEditor::new(core, &context);

        let exclusive = event
            .event_data_cache
            .exclusive_handler
            .and_then(|slot| self.legacy_plugins.get_mut(slot.0));
        match exclusive {
            Some(plugin) => plugin.on_plugin_event(&mut editor, &mut old)?,
            None => {
                for plugin in self.legacy_plugins.iter_mut() {
                    plugin
                        .on_plugin_event(&mut editor, &mut old)
                        .inspect_err(|err| {
                            tracing::warn!(plugin = plugin.name(), %err, "legacy plugin failed")
                        })?;
                }
            }
        }

        if let Some(merged) = old_event_to_new_event(&old, Some(&*event)) {
            *event = merged;
        }
        Ok(())
    }

    fn context_menu_items(
        &mut self,
        core: &mut EditorCore,
        target: NodeId,
    ) -> Option<Vec<Option<ContextMenuItem>>> {
        Some(self.get_context_menu_items(core, target))
    }
}
