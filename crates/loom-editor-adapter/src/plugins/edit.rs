//! Keyboard edit features and the plugin that dispatches keys to them.

use std::collections::BTreeMap;

use smol_str::SmolStr;

use loom_editor_core::EditorError;
use loom_editor_core::event::KeyboardEvent;

use crate::legacy::{LegacyEditor, LegacyEditorPlugin, LegacyPluginEvent, LegacyPluginEventKind};

/// A keyboard shortcut or auto-format behaviour bound to specific keys.
pub trait ContentEditFeature {
    /// `KeyboardEvent.key` values this feature reacts to.
    fn keys(&self) -> &[&'static str];

    fn should_handle_event(&mut self, editor: &mut LegacyEditor<'_>, event: &KeyboardEvent)
    -> bool;

    fn handle_event(
        &mut self,
        editor: &mut LegacyEditor<'_>,
        event: &mut KeyboardEvent,
    ) -> Result<(), EditorError>;

    /// Whether the feature also fires with ctrl, alt or meta held.
    fn allow_function_keys(&self) -> bool {
        false
    }
}

/// Runs [`ContentEditFeature`]s on keyDown.
///
/// Features are tried in registration order; the first one whose
/// `should_handle_event` says yes handles the key and the browser default
/// is prevented.
#[derive(Default)]
pub struct EditPlugin {
    features: Vec<Box<dyn ContentEditFeature>>,
    by_key: BTreeMap<SmolStr, Vec<usize>>,
}

impl std::fmt::Debug for EditPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditPlugin")
            .field("keys", &self.by_key.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl EditPlugin {
    pub fn new(features: Vec<Box<dyn ContentEditFeature>>) -> Self {
        let mut plugin = Self::default();
        for feature in features {
            plugin.add_feature(feature);
        }
        plugin
    }

    pub fn add_feature(&mut self, feature: Box<dyn ContentEditFeature>) {
        let index = self.features.len();
        for key in feature.keys() {
            self.by_key.entry(SmolStr::new(key)).or_default().push(index);
        }
        self.features.push(feature);
    }

    fn handle_key_down(
        &mut self,
        editor: &mut LegacyEditor<'_>,
        event: &mut KeyboardEvent,
    ) -> Result<(), EditorError> {
        if event.raw_event.default_prevented {
            return Ok(());
        }
        let Some(candidates) = self.by_key.get(&event.raw_event.key) else {
            return Ok(());
        };
        let has_modifier = event.raw_event.has_modifier();

        for &index in candidates {
            let feature = &mut self.features[index];
            if has_modifier && !feature.allow_function_keys() {
                continue;
            }
            if feature.should_handle_event(editor, event) {
                tracing::trace!(key = %event.raw_event.key, feature = index, "edit feature handles key");
                feature.handle_event(editor, event)?;
                event.handled_by_edit_feature = true;
                event.raw_event.prevent_default();
                break;
            }
        }
        Ok(())
    }
}

impl LegacyEditorPlugin for EditPlugin {
    fn name(&self) -> &str {
        "Edit"
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
        match &mut event.kind {
            LegacyPluginEventKind::KeyDown(key_event) => self.handle_key_down(editor, key_event),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use loom_editor_core::{Dom, DomKeyboardEvent, Editor, EditorOptions};

    use super::*;
    use crate::legacy::AdapterContext;

    struct Feature {
        name: &'static str,
        keys: &'static [&'static str],
        accept: bool,
        function_keys: bool,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl ContentEditFeature for Feature {
        fn keys(&self) -> &[&'static str] {
            self.keys
        }

        fn should_handle_event(&mut self, _: &mut LegacyEditor<'_>, _: &KeyboardEvent) -> bool {
            self.accept
        }

        fn handle_event(
            &mut self,
            _: &mut LegacyEditor<'_>,
            _: &mut KeyboardEvent,
        ) -> Result<(), EditorError> {
            self.log.borrow_mut().push(self.name);
            Ok(())
        }

        fn allow_function_keys(&self) -> bool {
            self.function_keys
        }
    }

    fn feature(
        name: &'static str,
        accept: bool,
        function_keys: bool,
        log: &Rc<RefCell<Vec<&'static str>>>,
    ) -> Box<dyn ContentEditFeature> {
        Box::new(Feature {
            name,
            keys: &["Tab"],
            accept,
            function_keys,
            log: log.clone(),
        })
    }

    fn key_down(raw_event: DomKeyboardEvent, plugin: &mut EditPlugin) -> KeyboardEvent {
        let mut dom = Dom::new();
        let div = dom.create_element("div");
        let mut editor = Editor::new(dom, div, EditorOptions::default()).unwrap();
        let context = AdapterContext::new();
        let mut legacy = LegacyEditor::new(editor.core_mut(), &context);

        let mut event =
            LegacyPluginEvent::new(LegacyPluginEventKind::KeyDown(KeyboardEvent::new(raw_event)));
        plugin.on_plugin_event(&mut legacy, &mut event).unwrap();
        match event.kind {
            LegacyPluginEventKind::KeyDown(e) => e,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_first_accepting_feature_wins() {
        let log = Rc::default();
        let mut plugin = EditPlugin::new(vec![
            feature("declines", false, false, &log),
            feature("first", true, false, &log),
            feature("second", true, false, &log),
        ]);
        let event = key_down(DomKeyboardEvent::new("Tab"), &mut plugin);
        assert!(event.handled_by_edit_feature);
        assert!(event.raw_event.default_prevented);
        assert_eq!(*log.borrow(), ["first"]);
    }

    #[test]
    fn test_modifiers_and_prevented_events() {
        let log = Rc::default();
        let mut plugin = EditPlugin::new(vec![
            feature("plain", true, false, &log),
            feature("function", true, true, &log),
        ]);

        let mut ctrl_tab = DomKeyboardEvent::new("Tab");
        ctrl_tab.ctrl_key = true;
        key_down(ctrl_tab, &mut plugin);
        assert_eq!(*log.borrow(), ["function"]);

        let mut prevented = DomKeyboardEvent::new("Tab");
        prevented.prevent_default();
        let event = key_down(prevented, &mut plugin);
        assert!(!event.handled_by_edit_feature);

        let event = key_down(DomKeyboardEvent::new("Enter"), &mut plugin);
        assert!(!event.handled_by_edit_feature);
        assert_eq!(log.borrow().len(), 1);
    }
}
