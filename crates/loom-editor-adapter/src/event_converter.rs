//! Translation between new plugin events and legacy plugin events.
//!
//! Both directions take an optional reference event of the other API. A
//! reference is only consulted when it has the same tag as the event being
//! converted, and it supplies the fields the converted event cannot carry
//! itself. Fields that are neither derivable nor present on a reference
//! are left empty; nothing is made up.
//!
//! Events without a counterpart convert to `None`: `logicalRootChanged`,
//! `PendingFormatStateChanged`, and entity operations that exist on one
//! side only.

use loom_editor_core::event::{self as new, EntityOperation, PasteType};
use loom_editor_core::{DomServices, PluginEvent, PluginEventKind, SelectionPath};

use crate::legacy::event::{self as old, LegacyEntityOperation, LegacyPasteType};
use crate::legacy::{Deferred, LegacyPluginEvent, LegacyPluginEventKind};
use crate::sanitizer::create_default_html_sanitizer_options;
use crate::selection_converter::{dom_selection_to_range_ex, range_ex_to_dom_selection};

// === Lookup tables ===

fn paste_type_to_old(paste_type: PasteType) -> LegacyPasteType {
    match paste_type {
        PasteType::Normal => LegacyPasteType::Normal,
        PasteType::AsPlainText => LegacyPasteType::AsPlainText,
        PasteType::AsImage => LegacyPasteType::AsImage,
        PasteType::MergeFormat => LegacyPasteType::MergeFormat,
    }
}

fn paste_type_to_new(paste_type: LegacyPasteType) -> PasteType {
    match paste_type {
        LegacyPasteType::Normal => PasteType::Normal,
        LegacyPasteType::AsPlainText => PasteType::AsPlainText,
        LegacyPasteType::AsImage => PasteType::AsImage,
        LegacyPasteType::MergeFormat => PasteType::MergeFormat,
    }
}

fn entity_operation_to_old(operation: EntityOperation) -> Option<LegacyEntityOperation> {
    Some(match operation {
        EntityOperation::NewEntity => LegacyEntityOperation::NewEntity,
        EntityOperation::Overwrite => LegacyEntityOperation::Overwrite,
        EntityOperation::RemoveFromStart => LegacyEntityOperation::RemoveFromStart,
        EntityOperation::RemoveFromEnd => LegacyEntityOperation::RemoveFromEnd,
        EntityOperation::Click => LegacyEntityOperation::Click,
        EntityOperation::UpdateEntityState => LegacyEntityOperation::UpdateEntityState,
        EntityOperation::ReplaceTemporaryContent => LegacyEntityOperation::ReplaceTemporaryContent,
        EntityOperation::BeforeFormat => return None,
    })
}

fn entity_operation_to_new(operation: LegacyEntityOperation) -> Option<EntityOperation> {
    Some(match operation {
        LegacyEntityOperation::NewEntity => EntityOperation::NewEntity,
        LegacyEntityOperation::Overwrite => EntityOperation::Overwrite,
        LegacyEntityOperation::RemoveFromStart => EntityOperation::RemoveFromStart,
        LegacyEntityOperation::RemoveFromEnd => EntityOperation::RemoveFromEnd,
        LegacyEntityOperation::Click => EntityOperation::Click,
        LegacyEntityOperation::UpdateEntityState => EntityOperation::UpdateEntityState,
        LegacyEntityOperation::ReplaceTemporaryContent => EntityOperation::ReplaceTemporaryContent,
        LegacyEntityOperation::PartialOverwrite
        | LegacyEntityOperation::ContextMenu
        | LegacyEntityOperation::Escape
        | LegacyEntityOperation::AddShadowRoot
        | LegacyEntityOperation::RemoveShadowRoot => return None,
    })
}

// === new -> old ===

/// Convert a new event for legacy plugins.
///
/// `services` creates the fragment an enteredShadowEdit event needs when
/// neither `reference` nor the event's data cache supplies one, and
/// computes legacy selection ranges.
pub fn new_event_to_old_event(
    event: &PluginEvent,
    reference: Option<&LegacyPluginEvent>,
    services: &mut dyn DomServices,
) -> Option<LegacyPluginEvent> {
    let reference = reference.map(|r| &r.kind);

    let kind = match &event.kind {
        PluginEventKind::BeforeCutCopy(e) => LegacyPluginEventKind::BeforeCutCopy(e.clone()),
        PluginEventKind::BeforeDispose => LegacyPluginEventKind::BeforeDispose,
        PluginEventKind::BeforeKeyboardEditing(e) => {
            LegacyPluginEventKind::BeforeKeyboardEditing(e.clone())
        }
        PluginEventKind::BeforePaste(e) => {
            let sanitizing_option = match reference {
                Some(LegacyPluginEventKind::BeforePaste(r)) => r.sanitizing_option.clone(),
                _ => create_default_html_sanitizer_options(),
            };
            LegacyPluginEventKind::BeforePaste(old::BeforePasteEvent {
                clipboard_data: e.clipboard_data.clone(),
                fragment: e.fragment,
                html_before: e.html_before.clone(),
                html_after: e.html_after.clone(),
                html_attributes: e.html_attributes.clone(),
                sanitizing_option,
                paste_type: paste_type_to_old(e.paste_type),
            })
        }
        PluginEventKind::BeforeSetContent { new_content } => {
            LegacyPluginEventKind::BeforeSetContent {
                new_content: new_content.clone(),
            }
        }
        PluginEventKind::CompositionEnd { raw_event } => LegacyPluginEventKind::CompositionEnd {
            raw_event: raw_event.clone(),
        },
        PluginEventKind::ContentChanged(e) => {
            LegacyPluginEventKind::ContentChanged(old::ContentChangedEvent {
                source: e.source.clone(),
                data: e.data.clone(),
                additional_data: Some(old::ContentChangedAdditionalData {
                    format_api_name: e.format_api_name.clone(),
                    get_announce_data: e
                        .announce_data
                        .clone()
                        .map(|data| Deferred::value(Some(data))),
                    get_entity_state: e
                        .entity_states
                        .clone()
                        .map(|states| Deferred::value(Some(states))),
                }),
            })
        }
        PluginEventKind::ContextMenu { raw_event, items } => LegacyPluginEventKind::ContextMenu {
            raw_event: raw_event.clone(),
            items: items.clone(),
        },
        PluginEventKind::EditImage {
            image,
            original_src,
            previous_src,
            new_src,
        } => LegacyPluginEventKind::EditImage {
            image: *image,
            original_src: original_src.clone(),
            previous_src: previous_src.clone(),
            new_src: new_src.clone(),
        },
        PluginEventKind::EditorReady => LegacyPluginEventKind::EditorReady,
        PluginEventKind::EnteredShadowEdit => {
            let shadow = match reference {
                Some(LegacyPluginEventKind::EnteredShadowEdit(r)) => r.clone(),
                _ => old::EnteredShadowEditEvent {
                    fragment: event
                        .event_data_cache
                        .shadow_fragment
                        .unwrap_or_else(|| services.create_fragment()),
                    selection_path: SelectionPath::default(),
                },
            };
            LegacyPluginEventKind::EnteredShadowEdit(shadow)
        }
        PluginEventKind::EntityOperation(e) => {
            let Some(operation) = entity_operation_to_old(e.operation) else {
                tracing::trace!(operation = ?e.operation, "entity operation has no legacy form");
                return None;
            };
            let content_for_shadow_entity = match reference {
                Some(LegacyPluginEventKind::EntityOperation(r)) => r.content_for_shadow_entity,
                _ => None,
            };
            LegacyPluginEventKind::EntityOperation(old::EntityOperationEvent {
                operation,
                entity: e.entity.clone(),
                raw_event: e.raw_event.clone(),
                state: e.state.clone(),
                content_for_shadow_entity,
            })
        }
        PluginEventKind::ExtractContentWithDom { cloned_root } => {
            LegacyPluginEventKind::ExtractContentWithDom {
                cloned_root: *cloned_root,
            }
        }
        PluginEventKind::Input { raw_event } => LegacyPluginEventKind::Input {
            raw_event: raw_event.clone(),
        },
        PluginEventKind::KeyDown(e) => LegacyPluginEventKind::KeyDown(e.clone()),
        PluginEventKind::KeyPress(e) => LegacyPluginEventKind::KeyPress(e.clone()),
        PluginEventKind::KeyUp(e) => LegacyPluginEventKind::KeyUp(e.clone()),
        PluginEventKind::LeavingShadowEdit => LegacyPluginEventKind::LeavingShadowEdit,
        PluginEventKind::LogicalRootChanged { .. } => {
            tracing::trace!("logicalRootChanged has no legacy form");
            return None;
        }
        PluginEventKind::MouseDown(e) => LegacyPluginEventKind::MouseDown(e.clone()),
        PluginEventKind::MouseUp(e) => LegacyPluginEventKind::MouseUp(e.clone()),
        PluginEventKind::Scroll {
            raw_event,
            scroll_container,
        } => LegacyPluginEventKind::Scroll {
            raw_event: raw_event.clone(),
            scroll_container: *scroll_container,
        },
        PluginEventKind::SelectionChanged { new_selection } => {
            let selection_range_ex = match reference {
                Some(LegacyPluginEventKind::SelectionChanged(old::SelectionChangedEvent {
                    selection_range_ex: Some(known),
                    ..
                })) => known.clone(),
                _ => dom_selection_to_range_ex(new_selection.as_ref(), &*services),
            };
            LegacyPluginEventKind::SelectionChanged(old::SelectionChangedEvent {
                selection_range_ex: Some(selection_range_ex),
                new_selection: None,
            })
        }
        PluginEventKind::ZoomChanged { new_zoom_scale } => LegacyPluginEventKind::ZoomChanged {
            new_zoom_scale: *new_zoom_scale,
        },
    };

    Some(LegacyPluginEvent {
        event_data_cache: event.event_data_cache.clone(),
        kind,
    })
}

// === old -> new ===

/// Convert a legacy event back to a new event.
///
/// For contentChanged, a value produced by the legacy getters wins; the
/// reference only fills in what the getters leave empty. Fields that only
/// exist on new events (changed entities, content model, selection) come
/// from the reference alone.
pub fn old_event_to_new_event(
    event: &LegacyPluginEvent,
    reference: Option<&PluginEvent>,
) -> Option<PluginEvent> {
    let reference = reference.map(|r| &r.kind);

    let kind = match &event.kind {
        LegacyPluginEventKind::KeyDown(e) => PluginEventKind::KeyDown(e.clone()),
        LegacyPluginEventKind::KeyPress(e) => PluginEventKind::KeyPress(e.clone()),
        LegacyPluginEventKind::KeyUp(e) => PluginEventKind::KeyUp(e.clone()),
        LegacyPluginEventKind::CompositionEnd { raw_event } => PluginEventKind::CompositionEnd {
            raw_event: raw_event.clone(),
        },
        LegacyPluginEventKind::MouseDown(e) => PluginEventKind::MouseDown(e.clone()),
        LegacyPluginEventKind::MouseUp(e) => PluginEventKind::MouseUp(e.clone()),
        LegacyPluginEventKind::Input { raw_event } => PluginEventKind::Input {
            raw_event: raw_event.clone(),
        },
        LegacyPluginEventKind::ContentChanged(e) => {
            let reference = match reference {
                Some(PluginEventKind::ContentChanged(r)) => Some(r),
                _ => None,
            };
            let additional = e.additional_data.as_ref();

            let format_api_name = additional
                .and_then(|a| a.format_api_name.clone())
                .or_else(|| reference.and_then(|r| r.format_api_name.clone()));
            let announce_data = additional
                .and_then(|a| a.get_announce_data.as_ref())
                .and_then(Deferred::get)
                .or_else(|| reference.and_then(|r| r.announce_data.clone()));
            let entity_states = additional
                .and_then(|a| a.get_entity_state.as_ref())
                .and_then(Deferred::get)
                .or_else(|| reference.and_then(|r| r.entity_states.clone()));

            PluginEventKind::ContentChanged(new::ContentChangedEvent {
                source: e.source.clone(),
                data: e.data.clone(),
                format_api_name,
                announce_data,
                entity_states,
                changed_entities: reference.and_then(|r| r.changed_entities.clone()),
                content_model: reference.and_then(|r| r.content_model.clone()),
                selection: reference.and_then(|r| r.selection.clone()),
            })
        }
        LegacyPluginEventKind::ExtractContentWithDom { cloned_root } => {
            PluginEventKind::ExtractContentWithDom {
                cloned_root: *cloned_root,
            }
        }
        LegacyPluginEventKind::BeforeCutCopy(e) => PluginEventKind::BeforeCutCopy(e.clone()),
        LegacyPluginEventKind::BeforePaste(e) => {
            let reference = match reference {
                Some(PluginEventKind::BeforePaste(r)) => Some(r),
                _ => None,
            };
            PluginEventKind::BeforePaste(new::BeforePasteEvent {
                clipboard_data: e.clipboard_data.clone(),
                fragment: e.fragment,
                html_before: e.html_before.clone(),
                html_after: e.html_after.clone(),
                html_attributes: e.html_attributes.clone(),
                paste_type: paste_type_to_new(e.paste_type),
                dom_to_model_option: reference
                    .map(|r| r.dom_to_model_option.clone())
                    .unwrap_or_default(),
                customized_merge: reference.and_then(|r| r.customized_merge.clone()),
            })
        }
        LegacyPluginEventKind::EditorReady => PluginEventKind::EditorReady,
        LegacyPluginEventKind::BeforeDispose => PluginEventKind::BeforeDispose,
        LegacyPluginEventKind::PendingFormatStateChanged { .. } => {
            tracing::trace!("PendingFormatStateChanged has no new form");
            return None;
        }
        LegacyPluginEventKind::Scroll {
            raw_event,
            scroll_container,
        } => PluginEventKind::Scroll {
            raw_event: raw_event.clone(),
            scroll_container: *scroll_container,
        },
        LegacyPluginEventKind::EntityOperation(e) => {
            let Some(operation) = entity_operation_to_new(e.operation) else {
                tracing::trace!(operation = ?e.operation, "entity operation has no new form");
                return None;
            };
            let should_persist = match reference {
                Some(PluginEventKind::EntityOperation(r)) => r.should_persist,
                _ => None,
            };
            PluginEventKind::EntityOperation(new::EntityOperationEvent {
                operation,
                entity: e.entity.clone(),
                raw_event: e.raw_event.clone(),
                state: e.state.clone(),
                should_persist,
            })
        }
        LegacyPluginEventKind::ContextMenu { raw_event, items } => PluginEventKind::ContextMenu {
            raw_event: raw_event.clone(),
            items: items.clone(),
        },
        LegacyPluginEventKind::EnteredShadowEdit(_) => PluginEventKind::EnteredShadowEdit,
        LegacyPluginEventKind::LeavingShadowEdit => PluginEventKind::LeavingShadowEdit,
        LegacyPluginEventKind::EditImage {
            image,
            original_src,
            previous_src,
            new_src,
        } => PluginEventKind::EditImage {
            image: *image,
            original_src: original_src.clone(),
            previous_src: previous_src.clone(),
            new_src: new_src.clone(),
        },
        LegacyPluginEventKind::BeforeSetContent { new_content } => {
            PluginEventKind::BeforeSetContent {
                new_content: new_content.clone(),
            }
        }
        LegacyPluginEventKind::ZoomChanged { new_zoom_scale } => PluginEventKind::ZoomChanged {
            new_zoom_scale: *new_zoom_scale,
        },
        LegacyPluginEventKind::SelectionChanged(e) => {
            let new_selection = match reference {
                Some(PluginEventKind::SelectionChanged {
                    new_selection: Some(known),
                }) => Some(known.clone()),
                _ => match &e.new_selection {
                    Some(selection) => Some(selection.clone()),
                    None => range_ex_to_dom_selection(e.selection_range_ex.as_ref()),
                },
            };
            PluginEventKind::SelectionChanged { new_selection }
        }
        LegacyPluginEventKind::BeforeKeyboardEditing(e) => {
            PluginEventKind::BeforeKeyboardEditing(e.clone())
        }
    };

    Some(PluginEvent {
        event_data_cache: event.event_data_cache.clone(),
        kind,
    })
}
