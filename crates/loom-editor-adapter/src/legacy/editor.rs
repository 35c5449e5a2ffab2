//! The editor surface legacy plugins are handed.

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use loom_editor_core::{Dom, DomSelection, EditorCore, NodeId};

use super::selection::SelectionRangeEx;
use crate::selection_converter::{dom_selection_to_range_ex, range_ex_to_dom_selection};

/// State of the legacy editor that outlives single plugin calls.
///
/// Created before the editor exists and handed to the bridge with
/// [`BridgePlugin::set_outer_editor`](crate::BridgePlugin::set_outer_editor).
#[derive(Default)]
pub struct AdapterContext {
    custom_data: RefCell<HashMap<String, Rc<dyn Any>>>,
}

impl std::fmt::Debug for AdapterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self.custom_data.borrow().keys().cloned().collect();
        f.debug_struct("AdapterContext")
            .field("custom_data", &keys)
            .finish()
    }
}

impl AdapterContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared value stored under `key`, created with `getter` on first use.
    ///
    /// A value of another type under the same key is replaced.
    pub fn get_custom_data<T: 'static>(&self, key: &str, getter: impl FnOnce() -> T) -> Rc<T> {
        let existing = self.custom_data.borrow().get(key).cloned();
        if let Some(value) = existing.and_then(|v| v.downcast::<T>().ok()) {
            return value;
        }
        let value = Rc::new(getter());
        self.custom_data
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        value
    }

    pub fn has_custom_data(&self, key: &str) -> bool {
        self.custom_data.borrow().contains_key(key)
    }

    /// Drop all custom data.
    pub fn clear_custom_data(&self) {
        self.custom_data.borrow_mut().clear();
    }
}

/// Editor handle passed to legacy plugins for the duration of one call.
pub struct LegacyEditor<'a> {
    core: &'a mut EditorCore,
    context: &'a AdapterContext,
}

impl<'a> LegacyEditor<'a> {
    pub fn new(core: &'a mut EditorCore, context: &'a AdapterContext) -> Self {
        Self { core, context }
    }

    pub fn core(&self) -> &EditorCore {
        &*self.core
    }

    pub fn core_mut(&mut self) -> &mut EditorCore {
        &mut *self.core
    }

    pub fn dom(&self) -> &Dom {
        self.core.dom()
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        self.core.dom_mut()
    }

    pub fn content_div(&self) -> NodeId {
        self.core.content_div()
    }

    /// Whether `node` is inside the editable content.
    pub fn contains(&self, node: NodeId) -> bool {
        self.dom().contains(self.content_div(), node)
    }

    /// Elements inside the content carrying `class`.
    pub fn query_elements(&self, class: &str) -> Vec<NodeId> {
        self.dom().query_class(self.content_div(), class)
    }

    pub fn get_selection_range_ex(&self) -> SelectionRangeEx {
        dom_selection_to_range_ex(self.core.selection(), self.core.dom())
    }

    pub fn get_dom_selection(&self) -> Option<&DomSelection> {
        self.core.selection()
    }

    pub fn select(&mut self, selection: Option<DomSelection>) {
        self.core.set_selection(selection);
    }

    pub fn select_range_ex(&mut self, range_ex: &SelectionRangeEx) {
        self.core
            .set_selection(range_ex_to_dom_selection(Some(range_ex)));
    }

    pub fn is_dark_mode(&self) -> bool {
        self.core.is_dark_mode()
    }

    pub fn is_in_shadow_edit(&self) -> bool {
        self.core.is_in_shadow_edit()
    }

    pub fn is_feature_enabled(&self, feature: &str) -> bool {
        self.core.is_feature_enabled(feature)
    }

    pub fn is_disposed(&self) -> bool {
        self.core.is_disposed()
    }

    /// Run `callback` on the next animation frame.
    pub fn run_async(&mut self, callback: impl FnOnce(&mut EditorCore) + 'static) {
        self.core.request_animation_frame(callback);
    }

    pub fn get_custom_data<T: 'static>(&self, key: &str, getter: impl FnOnce() -> T) -> Rc<T> {
        self.context.get_custom_data(key, getter)
    }
}
