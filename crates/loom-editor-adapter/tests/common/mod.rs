#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use loom_editor_adapter::{
    AdapterOptions, ContextMenuProvider, EditorAdapter, LegacyEditor, LegacyEditorPlugin,
    LegacyPluginEvent, PluginEventType,
};
use loom_editor_core::{
    ContextMenuItem, Dom, EditorCore, EditorError, EditorPlugin, NodeId, PluginEvent,
};

pub type Log = Rc<RefCell<Vec<String>>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Legacy plugin that writes every call into a shared log.
pub struct LegacyRecorder {
    pub name: &'static str,
    pub log: Log,
    pub exclusive: bool,
    pub fail_on: Option<PluginEventType>,
    pub menu: Option<Vec<ContextMenuItem>>,
}

impl LegacyRecorder {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            exclusive: false,
            fail_on: None,
            menu: None,
        }
    }

    pub fn boxed(self) -> Option<Box<dyn LegacyEditorPlugin>> {
        Some(Box::new(self))
    }
}

impl LegacyEditorPlugin for LegacyRecorder {
    fn name(&self) -> &str {
        self.name
    }

    fn initialize(&mut self, _editor: &mut LegacyEditor<'_>) -> Result<(), EditorError> {
        self.log.borrow_mut().push(format!("{}:init", self.name));
        Ok(())
    }

    fn dispose(&mut self) {
        self.log.borrow_mut().push(format!("{}:dispose", self.name));
    }

    fn on_plugin_event(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        event: &mut LegacyPluginEvent,
    ) -> Result<(), EditorError> {
        self.log
            .borrow_mut()
            .push(format!("{}:{:?}", self.name, event.event_type()));
        if self.fail_on == Some(event.event_type()) {
            return Err(EditorError::plugin(self.name, "refused event"));
        }
        Ok(())
    }

    fn can_handle_events_exclusively(&self) -> bool {
        self.exclusive
    }

    fn will_handle_event_exclusively(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        _event: &LegacyPluginEvent,
    ) -> bool {
        self.exclusive
    }

    fn as_context_menu_provider(&mut self) -> Option<&mut dyn ContextMenuProvider> {
        if self.menu.is_some() { Some(self) } else { None }
    }
}

impl ContextMenuProvider for LegacyRecorder {
    fn get_context_menu_items(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        _target: NodeId,
    ) -> Vec<ContextMenuItem> {
        self.menu.clone().unwrap_or_default()
    }
}

/// New-API plugin logging event types.
pub struct NewRecorder {
    pub log: Log,
}

impl EditorPlugin for NewRecorder {
    fn name(&self) -> &str {
        "new"
    }

    fn initialize(&mut self, _core: &mut EditorCore) -> Result<(), EditorError> {
        Ok(())
    }

    fn dispose(&mut self) {}

    fn on_plugin_event(
        &mut self,
        _core: &mut EditorCore,
        event: &mut PluginEvent,
    ) -> Result<(), EditorError> {
        self.log
            .borrow_mut()
            .push(format!("new:{}", event.event_type()));
        Ok(())
    }
}

/// Adapter over an empty `<div>`.
pub fn adapter(options: AdapterOptions) -> EditorAdapter {
    init_tracing();
    let mut dom = Dom::new();
    let div = dom.create_element("div");
    EditorAdapter::new(dom, div, options).unwrap()
}
