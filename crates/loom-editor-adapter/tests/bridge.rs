mod common;

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use common::{LegacyRecorder, Log, NewRecorder, adapter, init_tracing};
use loom_editor_adapter::{
    AdapterOptions, BridgePlugin, ContentEditFeature, LegacyEditor, LegacyEditorPlugin,
    LegacyPluginEvent, LegacyPluginEventKind, PluginEventType,
};
use loom_editor_adapter::legacy::LegacyPasteType;
use loom_editor_core::{
    BeforePasteEvent, ClipboardData, ContextMenuItem, CustomizedMerge, Dom, DomKeyboardEvent,
    DomToModelOption, Editor, EditorError, EditorOptions, EditorPlugin, KeyboardEvent, PasteType,
    NodeId, PluginEvent, PluginEventKind, PluginSlot, SmolStr,
};
use miette::Diagnostic;

fn bare_editor() -> Editor {
    init_tracing();
    let mut dom = Dom::new();
    let div = dom.create_element("div");
    Editor::new(dom, div, EditorOptions::default()).unwrap()
}

fn connected_bridge(plugins: Vec<Option<Box<dyn LegacyEditorPlugin>>>) -> BridgePlugin {
    let mut bridge = BridgePlugin::new(plugins, Vec::new());
    bridge.set_outer_editor(Default::default());
    bridge
}

fn key_down(key: &str) -> PluginEvent {
    PluginEvent::new(PluginEventKind::KeyDown(KeyboardEvent::new(
        DomKeyboardEvent::new(key),
    )))
}

#[test]
fn test_plugin_list_layout() {
    let log = Log::default();
    let bridge = BridgePlugin::new(
        vec![
            LegacyRecorder::new("a", &log).boxed(),
            None,
            LegacyRecorder::new("b", &log).boxed(),
        ],
        Vec::new(),
    );
    assert_eq!(
        bridge.legacy_plugin_names(),
        ["Edit", "a", "b", "EntityDelimiter"]
    );
}

#[test]
fn test_initialize_runs_before_editor_ready() {
    let log = Log::default();
    let _adapter = adapter(AdapterOptions {
        editor: EditorOptions {
            plugins: vec![Box::new(NewRecorder { log: log.clone() })],
            ..Default::default()
        },
        legacy_plugins: vec![
            LegacyRecorder::new("a", &log).boxed(),
            LegacyRecorder::new("b", &log).boxed(),
        ],
        ..Default::default()
    });

    assert_eq!(
        *log.borrow(),
        [
            "a:init",
            "b:init",
            "a:EditorReady",
            "b:EditorReady",
            "new:editorReady"
        ]
    );
}

#[test]
fn test_later_editor_ready_reaches_legacy_plugins() {
    let log = Log::default();
    let mut adapter = adapter(AdapterOptions {
        legacy_plugins: vec![LegacyRecorder::new("a", &log).boxed()],
        ..Default::default()
    });
    assert_eq!(*log.borrow(), ["a:init", "a:EditorReady"]);
    log.borrow_mut().clear();

    adapter.trigger_event(PluginEventKind::EditorReady, true).unwrap();
    assert_eq!(*log.borrow(), ["a:EditorReady"]);
}

#[test]
fn test_initialize_requires_outer_editor() {
    init_tracing();
    let mut dom = Dom::new();
    let div = dom.create_element("div");
    let bridge: Box<dyn EditorPlugin> = Box::new(BridgePlugin::new(Vec::new(), Vec::new()));
    let result = Editor::new(
        dom,
        div,
        EditorOptions {
            plugins: vec![bridge],
            ..Default::default()
        },
    );

    let err = result.unwrap_err();
    assert!(matches!(err, EditorError::PluginInit { .. }));
    assert_eq!(err.code().unwrap().to_string(), "loom::plugin::init");
}

#[test]
fn test_dispose_in_reverse_order() {
    let log = Log::default();
    let mut editor = bare_editor();
    let mut bridge = connected_bridge(vec![
        LegacyRecorder::new("A", &log).boxed(),
        LegacyRecorder::new("B", &log).boxed(),
        LegacyRecorder::new("C", &log).boxed(),
    ]);
    bridge.initialize(editor.core_mut()).unwrap();
    log.borrow_mut().clear();

    bridge.dispose();
    assert_eq!(*log.borrow(), ["C:dispose", "B:dispose", "A:dispose"]);
}

#[test]
fn test_exclusive_handler_is_cached_and_used() {
    let log = Log::default();
    let mut editor = bare_editor();
    let mut claimant = LegacyRecorder::new("second", &log);
    claimant.exclusive = true;
    let mut bridge = connected_bridge(vec![
        LegacyRecorder::new("first", &log).boxed(),
        claimant.boxed(),
    ]);
    bridge.initialize(editor.core_mut()).unwrap();
    log.borrow_mut().clear();

    let mut event = key_down("a");
    assert!(bridge.will_handle_event_exclusively(editor.core_mut(), &mut event));
    assert_eq!(event.event_data_cache.exclusive_handler, Some(PluginSlot(2)));

    bridge.on_plugin_event(editor.core_mut(), &mut event).unwrap();
    assert_eq!(*log.borrow(), ["second:KeyDown"]);
    assert_eq!(event.event_data_cache.exclusive_handler, Some(PluginSlot(2)));
}

#[test]
fn test_no_exclusive_capability_takes_fast_path() {
    let log = Log::default();
    let mut editor = bare_editor();
    let mut bridge = connected_bridge(vec![LegacyRecorder::new("a", &log).boxed()]);
    bridge.initialize(editor.core_mut()).unwrap();

    let mut event = key_down("a");
    assert!(!bridge.will_handle_event_exclusively(editor.core_mut(), &mut event));
    assert_eq!(event.event_data_cache.exclusive_handler, None);
}

#[test]
fn test_exclusive_claim_through_editor_skips_everyone_else() {
    let log = Log::default();
    let mut claimant = LegacyRecorder::new("claimant", &log);
    claimant.exclusive = true;
    let mut adapter = adapter(AdapterOptions {
        editor: EditorOptions {
            plugins: vec![Box::new(NewRecorder { log: log.clone() })],
            ..Default::default()
        },
        legacy_plugins: vec![LegacyRecorder::new("other", &log).boxed(), claimant.boxed()],
        ..Default::default()
    });
    log.borrow_mut().clear();

    adapter.trigger_event(key_down("a"), false).unwrap();
    assert_eq!(*log.borrow(), ["claimant:KeyDown"]);

    log.borrow_mut().clear();
    adapter.trigger_event(key_down("a"), true).unwrap();
    assert_eq!(
        *log.borrow(),
        ["other:KeyDown", "claimant:KeyDown", "new:keyDown"]
    );
}

#[test]
fn test_unconvertible_events_skip_legacy_plugins() {
    let log = Log::default();
    let mut adapter = adapter(AdapterOptions {
        editor: EditorOptions {
            plugins: vec![Box::new(NewRecorder { log: log.clone() })],
            ..Default::default()
        },
        legacy_plugins: vec![LegacyRecorder::new("a", &log).boxed()],
        ..Default::default()
    });
    log.borrow_mut().clear();

    let root = adapter.editor().content_div();
    adapter
        .trigger_event(PluginEventKind::LogicalRootChanged { logical_root: root }, true)
        .unwrap();
    assert_eq!(*log.borrow(), ["new:logicalRootChanged"]);
}

#[test]
fn test_context_menu_separators() {
    let log = Log::default();
    let with_menu = |name: &'static str, items: Vec<ContextMenuItem>| {
        let mut plugin = LegacyRecorder::new(name, &log);
        plugin.menu = Some(items);
        plugin.boxed()
    };
    let mut adapter = adapter(AdapterOptions {
        legacy_plugins: vec![
            with_menu("a", vec![ContextMenuItem::new("a1", "A1")]),
            LegacyRecorder::new("no-menu", &log).boxed(),
            with_menu("empty", Vec::new()),
            with_menu(
                "c",
                vec![ContextMenuItem::new("c1", "C1"), ContextMenuItem::new("c2", "C2")],
            ),
        ],
        ..Default::default()
    });

    let target = adapter.editor().content_div();
    assert_eq!(
        adapter.get_context_menu_items(target),
        vec![
            Some(ContextMenuItem::new("a1", "A1")),
            None,
            Some(ContextMenuItem::new("c1", "C1")),
            Some(ContextMenuItem::new("c2", "C2")),
        ]
    );
}

#[test]
fn test_failing_legacy_plugin_stops_dispatch() {
    let log = Log::default();
    let mut failing = LegacyRecorder::new("failing", &log);
    failing.fail_on = Some(PluginEventType::KeyUp);
    let mut adapter = adapter(AdapterOptions {
        editor: EditorOptions {
            plugins: vec![Box::new(NewRecorder { log: log.clone() })],
            ..Default::default()
        },
        legacy_plugins: vec![failing.boxed(), LegacyRecorder::new("after", &log).boxed()],
        ..Default::default()
    });
    log.borrow_mut().clear();

    let event = PluginEventKind::KeyUp(KeyboardEvent::new(DomKeyboardEvent::new("a")));
    let result = adapter.trigger_event(event, true);
    assert!(matches!(result, Err(EditorError::Plugin { ref plugin, .. }) if plugin == "failing"));
    assert_eq!(*log.borrow(), ["failing:KeyUp"]);
}

/// Rewrites paste events the way a legacy paste plugin would.
struct PasteRewriter;

impl LegacyEditorPlugin for PasteRewriter {
    fn name(&self) -> &str {
        "PasteRewriter"
    }

    fn initialize(&mut self, _editor: &mut LegacyEditor<'_>) -> Result<(), EditorError> {
        Ok(())
    }

    fn dispose(&mut self) {}

    fn on_plugin_event(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        event: &mut LegacyPluginEvent,
    ) -> Result<(), EditorError> {
        if let LegacyPluginEventKind::BeforePaste(paste) = &mut event.kind {
            paste.html_before = "<meta charset=\"utf-8\">".to_string();
            paste.paste_type = LegacyPasteType::AsPlainText;
        }
        Ok(())
    }
}

#[test]
fn test_legacy_changes_merge_back_into_event() {
    let mut adapter = adapter(AdapterOptions {
        legacy_plugins: vec![Some(Box::new(PasteRewriter) as Box<dyn LegacyEditorPlugin>)],
        ..Default::default()
    });
    let fragment = adapter.editor_mut().core_mut().dom_mut().create_fragment();
    let merge = CustomizedMerge::new(|_, _, _| {});
    let option = DomToModelOption {
        additional_allowed_tags: vec![SmolStr::new("article")],
        ..Default::default()
    };

    let result = adapter
        .trigger_event(
            PluginEventKind::BeforePaste(BeforePasteEvent {
                clipboard_data: ClipboardData::default(),
                fragment,
                html_before: String::new(),
                html_after: String::new(),
                html_attributes: BTreeMap::new(),
                paste_type: PasteType::Normal,
                dom_to_model_option: option.clone(),
                customized_merge: Some(merge.clone()),
            }),
            true,
        )
        .unwrap();

    let PluginEventKind::BeforePaste(paste) = result.kind else {
        panic!("expected beforePaste");
    };
    assert_eq!(paste.html_before, "<meta charset=\"utf-8\">");
    assert_eq!(paste.paste_type, PasteType::AsPlainText);
    assert_eq!(paste.dom_to_model_option, option);
    assert_eq!(paste.customized_merge, Some(merge));
}

struct TabIndent {
    handled: std::rc::Rc<Cell<usize>>,
}

impl ContentEditFeature for TabIndent {
    fn keys(&self) -> &[&'static str] {
        &["Tab"]
    }

    fn should_handle_event(&mut self, _: &mut LegacyEditor<'_>, _: &KeyboardEvent) -> bool {
        true
    }

    fn handle_event(
        &mut self,
        _: &mut LegacyEditor<'_>,
        _: &mut KeyboardEvent,
    ) -> Result<(), EditorError> {
        self.handled.set(self.handled.get() + 1);
        Ok(())
    }
}

#[test]
fn test_edit_feature_result_reaches_new_plugins() {
    let handled = std::rc::Rc::new(Cell::new(0));
    let mut adapter = adapter(AdapterOptions {
        edit_features: vec![Box::new(TabIndent {
            handled: handled.clone(),
        })],
        ..Default::default()
    });

    let result = adapter.trigger_event(key_down("Tab"), true).unwrap();
    let PluginEventKind::KeyDown(key) = result.kind else {
        panic!("expected keyDown");
    };
    assert_eq!(handled.get(), 1);
    assert!(key.handled_by_edit_feature);
    assert!(key.raw_event.default_prevented);

    let result = adapter.trigger_event(key_down("a"), true).unwrap();
    let PluginEventKind::KeyDown(key) = result.kind else {
        panic!("expected keyDown");
    };
    assert!(!key.handled_by_edit_feature);
}

/// Legacy plugin sharing a counter through the custom data store.
struct Counter;

impl LegacyEditorPlugin for Counter {
    fn name(&self) -> &str {
        "Counter"
    }

    fn initialize(&mut self, editor: &mut LegacyEditor<'_>) -> Result<(), EditorError> {
        let count = editor.get_custom_data("count", || Cell::new(0u32));
        count.set(count.get() + 1);
        Ok(())
    }

    fn dispose(&mut self) {}
}

#[test]
fn test_custom_data_shared_and_cleared_on_dispose() {
    let mut adapter = adapter(AdapterOptions {
        legacy_plugins: vec![
            Some(Box::new(Counter) as Box<dyn LegacyEditorPlugin>),
            Some(Box::new(Counter)),
        ],
        ..Default::default()
    });
    let count = adapter.context().get_custom_data("count", || Cell::new(0u32));
    assert_eq!(count.get(), 2);

    adapter.dispose();
    assert!(adapter.editor().is_disposed());
    assert!(!adapter.context().has_custom_data("count"));
}

/// Claims enteredShadowEdit and records the fragment of every call.
struct ShadowWatcher {
    fragments: Rc<RefCell<Vec<NodeId>>>,
}

impl ShadowWatcher {
    fn record(&self, event: &LegacyPluginEvent) -> bool {
        let LegacyPluginEventKind::EnteredShadowEdit(shadow) = &event.kind else {
            return false;
        };
        self.fragments.borrow_mut().push(shadow.fragment);
        true
    }
}

impl LegacyEditorPlugin for ShadowWatcher {
    fn name(&self) -> &str {
        "ShadowWatcher"
    }

    fn initialize(&mut self, _editor: &mut LegacyEditor<'_>) -> Result<(), EditorError> {
        Ok(())
    }

    fn dispose(&mut self) {}

    fn on_plugin_event(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        event: &mut LegacyPluginEvent,
    ) -> Result<(), EditorError> {
        self.record(event);
        Ok(())
    }

    fn can_handle_events_exclusively(&self) -> bool {
        true
    }

    fn will_handle_event_exclusively(
        &mut self,
        _editor: &mut LegacyEditor<'_>,
        event: &LegacyPluginEvent,
    ) -> bool {
        self.record(event)
    }
}

#[test]
fn test_shadow_edit_fragment_built_once_per_dispatch() {
    let fragments = Rc::new(RefCell::new(Vec::new()));
    let mut adapter = adapter(AdapterOptions {
        legacy_plugins: vec![Some(Box::new(ShadowWatcher {
            fragments: fragments.clone(),
        }) as Box<dyn LegacyEditorPlugin>)],
        ..Default::default()
    });

    adapter.editor_mut().start_shadow_edit().unwrap();

    let seen = fragments.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
}
