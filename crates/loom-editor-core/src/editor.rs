//! The editor: state shared with plugins, plus plugin dispatch.
//!
//! `Editor` owns the plugin list and an [`EditorCore`]. Plugins never hold
//! on to the editor; every plugin call receives `&mut EditorCore`, which is
//! why the two live in separate structs.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use smol_str::SmolStr;

use crate::color::{
    ColorTransformDirection, DarkColorHandler, DefaultDarkColorHandler, transform_color,
};
use crate::dom::{Dom, NodeId};
use crate::error::EditorError;
use crate::event::{ContentChangedEvent, ContextMenuItem, PluginEvent, PluginEventKind, change_source};
use crate::options::{EditorOptions, TrustedHtmlHandler};
use crate::plugin::EditorPlugin;
use crate::selection::DomSelection;

/// Work scheduled for the next animation frame.
pub type AnimationFrameCallback = Box<dyn FnOnce(&mut EditorCore)>;

/// Editor state visible to plugins.
pub struct EditorCore {
    pub(crate) dom: Dom,
    pub(crate) content_div: NodeId,
    pub(crate) selection: Option<DomSelection>,
    pub(crate) dark_mode: bool,
    pub(crate) in_shadow_edit: bool,
    pub(crate) entities: BTreeMap<String, NodeId>,
    pub(crate) zoom_scale: f64,
    pub(crate) experimental_features: Vec<SmolStr>,
    pub(crate) trusted_html_handler: Option<TrustedHtmlHandler>,
    pub(crate) dark_color_handler: Rc<dyn DarkColorHandler>,
    animation_frames: Vec<AnimationFrameCallback>,
    disposed: bool,
}

impl fmt::Debug for EditorCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorCore")
            .field("content_div", &self.content_div)
            .field("selection", &self.selection)
            .field("dark_mode", &self.dark_mode)
            .field("in_shadow_edit", &self.in_shadow_edit)
            .field("zoom_scale", &self.zoom_scale)
            .field("pending_frames", &self.animation_frames.len())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

impl EditorCore {
    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    /// The editable root element.
    pub fn content_div(&self) -> NodeId {
        self.content_div
    }

    pub fn selection(&self) -> Option<&DomSelection> {
        self.selection.as_ref()
    }

    /// Replace the selection without firing selectionChanged.
    pub fn set_selection(&mut self, selection: Option<DomSelection>) {
        self.selection = selection;
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn is_in_shadow_edit(&self) -> bool {
        self.in_shadow_edit
    }

    pub fn zoom_scale(&self) -> f64 {
        self.zoom_scale
    }

    pub fn is_feature_enabled(&self, feature: &str) -> bool {
        self.experimental_features.iter().any(|f| f == feature)
    }

    pub fn dark_color_handler(&self) -> Rc<dyn DarkColorHandler> {
        Rc::clone(&self.dark_color_handler)
    }

    /// Track a live entity node so content replacement keeps it.
    pub fn track_entity(&mut self, id: impl Into<String>, wrapper: NodeId) {
        self.entities.insert(id.into(), wrapper);
    }

    pub fn untrack_entity(&mut self, id: &str) -> Option<NodeId> {
        self.entities.remove(id)
    }

    pub fn tracked_entities(&self) -> &BTreeMap<String, NodeId> {
        &self.entities
    }

    /// Run `callback` on the next animation frame.
    ///
    /// There is no cancellation. Callbacks run even if the editor was
    /// disposed in between and must check [`is_disposed`](Self::is_disposed).
    pub fn request_animation_frame(&mut self, callback: impl FnOnce(&mut EditorCore) + 'static) {
        self.animation_frames.push(Box::new(callback));
    }

    pub fn pending_animation_frames(&self) -> usize {
        self.animation_frames.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Drop the selection if it points at nodes outside the content.
    pub(crate) fn drop_detached_selection(&mut self) {
        let root = self.content_div;
        let attached = match &self.selection {
            None => return,
            Some(DomSelection::Range(range)) => {
                self.dom.contains(root, range.start_container)
                    && self.dom.contains(root, range.end_container)
            }
            Some(DomSelection::Image(image)) => self.dom.contains(root, *image),
            Some(DomSelection::Table(table)) => self.dom.contains(root, table.table),
        };
        if !attached {
            self.selection = None;
        }
    }
}

/// A contentEditable editor hosting a list of plugins.
pub struct Editor {
    core: EditorCore,
    plugins: Vec<Box<dyn EditorPlugin>>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("core", &self.core)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Editor {
    /// Create an editor over `content_div`, initialize its plugins in order
    /// and broadcast editorReady once all of them are up.
    pub fn new(dom: Dom, content_div: NodeId, options: EditorOptions) -> Result<Self, EditorError> {
        let EditorOptions {
            settings,
            plugins,
            trusted_html_handler,
            dark_color_handler,
            initial_content,
        } = options;

        let core = EditorCore {
            dom,
            content_div,
            selection: None,
            dark_mode: settings.in_dark_mode,
            in_shadow_edit: false,
            entities: BTreeMap::new(),
            zoom_scale: settings.zoom_scale,
            experimental_features: settings.experimental_features,
            trusted_html_handler,
            dark_color_handler: dark_color_handler
                .unwrap_or_else(|| Rc::new(DefaultDarkColorHandler)),
            animation_frames: Vec::new(),
            disposed: false,
        };

        let mut editor = Self { core, plugins };
        for plugin in editor.plugins.iter_mut() {
            tracing::debug!(plugin = plugin.name(), "initializing plugin");
            plugin.initialize(&mut editor.core)?;
        }

        if let Some(html) = initial_content {
            editor.set_content(&html, false, None)?;
        }
        editor.trigger_event(PluginEventKind::EditorReady, true)?;
        Ok(editor)
    }

    pub fn core(&self) -> &EditorCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EditorCore {
        &mut self.core
    }

    pub fn dom(&self) -> &Dom {
        &self.core.dom
    }

    pub fn content_div(&self) -> NodeId {
        self.core.content_div
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn is_disposed(&self) -> bool {
        self.core.disposed
    }

    /// Dispatch `event` to the plugins and return it with whatever
    /// modifications they made.
    ///
    /// Without `broadcast`, the first plugin that claims the event
    /// exclusively is the only one to receive it. Otherwise, and when
    /// nobody claims it, every plugin receives it in order. A plugin error
    /// stops the dispatch and is returned.
    pub fn trigger_event(
        &mut self,
        event: impl Into<PluginEvent>,
        broadcast: bool,
    ) -> Result<PluginEvent, EditorError> {
        if self.core.disposed {
            return Err(EditorError::Disposed);
        }
        let mut event = event.into();
        let Self { core, plugins } = self;

        if !broadcast {
            let exclusive = plugins
                .iter_mut()
                .position(|plugin| plugin.will_handle_event_exclusively(core, &mut event));
            if let Some(index) = exclusive {
                let plugin = &mut plugins[index];
                tracing::trace!(
                    plugin = plugin.name(),
                    event = event.event_type(),
                    "exclusive dispatch"
                );
                plugin.on_plugin_event(core, &mut event)?;
                return Ok(event);
            }
        }

        for plugin in plugins.iter_mut() {
            plugin
                .on_plugin_event(core, &mut event)
                .inspect_err(|err| {
                    tracing::warn!(plugin = plugin.name(), %err, "plugin event handler failed")
                })?;
        }
        Ok(event)
    }

    /// Context menu entries of all plugins for `target`, groups separated
    /// by a single `None`.
    pub fn get_context_menu_items(&mut self, target: NodeId) -> Vec<Option<ContextMenuItem>> {
        let Self { core, plugins } = self;
        let mut items = Vec::new();
        for plugin in plugins.iter_mut() {
            let Some(group) = plugin.context_menu_items(core, target) else {
                continue;
            };
            if group.is_empty() {
                continue;
            }
            if !items.is_empty() {
                items.push(None);
            }
            items.extend(group);
        }
        items
    }

    /// Run the callbacks queued for this frame. Callbacks queued while they
    /// run wait for the next call. Returns how many ran.
    pub fn run_animation_frames(&mut self) -> usize {
        let frames = std::mem::take(&mut self.core.animation_frames);
        let count = frames.len();
        for frame in frames {
            frame(&mut self.core);
        }
        count
    }

    /// Replace the selection and notify plugins.
    pub fn select(&mut self, selection: Option<DomSelection>) -> Result<(), EditorError> {
        self.core.selection = selection.clone();
        self.trigger_event(
            PluginEventKind::SelectionChanged {
                new_selection: selection,
            },
            true,
        )?;
        Ok(())
    }

    /// Switch between light and dark mode, transforming content colors.
    pub fn set_dark_mode(&mut self, dark_mode: bool) -> Result<(), EditorError> {
        if self.core.dark_mode == dark_mode {
            return Ok(());
        }
        let direction = if dark_mode {
            ColorTransformDirection::LightToDark
        } else {
            ColorTransformDirection::DarkToLight
        };
        let handler = self.core.dark_color_handler();
        transform_color(
            &mut self.core.dom,
            self.core.content_div,
            direction,
            handler.as_ref(),
        );
        self.core.dark_mode = dark_mode;

        let source = if dark_mode {
            change_source::SWITCH_TO_DARK_MODE
        } else {
            change_source::SWITCH_TO_LIGHT_MODE
        };
        self.trigger_event(
            PluginEventKind::ContentChanged(ContentChangedEvent::new(source)),
            false,
        )?;
        Ok(())
    }

    pub fn start_shadow_edit(&mut self) -> Result<(), EditorError> {
        if self.core.in_shadow_edit {
            return Ok(());
        }
        self.trigger_event(PluginEventKind::EnteredShadowEdit, false)?;
        self.core.in_shadow_edit = true;
        Ok(())
    }

    pub fn stop_shadow_edit(&mut self) -> Result<(), EditorError> {
        if !self.core.in_shadow_edit {
            return Ok(());
        }
        self.trigger_event(PluginEventKind::LeavingShadowEdit, false)?;
        self.core.in_shadow_edit = false;
        Ok(())
    }

    pub fn set_zoom_scale(&mut self, scale: f64) -> Result<(), EditorError> {
        if self.core.zoom_scale == scale {
            return Ok(());
        }
        self.core.zoom_scale = scale;
        self.trigger_event(
            PluginEventKind::ZoomChanged {
                new_zoom_scale: scale,
            },
            true,
        )?;
        Ok(())
    }

    /// Broadcast beforeDispose, then dispose plugins in reverse order.
    /// Later calls do nothing.
    pub fn dispose(&mut self) {
        if self.core.disposed {
            return;
        }
        if let Err(err) = self.trigger_event(PluginEventKind::BeforeDispose, true) {
            tracing::warn!(%err, "beforeDispose handler failed");
        }
        for plugin in self.plugins.iter_mut().rev() {
            tracing::debug!(plugin = plugin.name(), "disposing plugin");
            plugin.dispose();
        }
        self.core.disposed = true;
    }
}
