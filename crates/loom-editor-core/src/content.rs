//! Replacing and reading back editor content.

use crate::color::{ColorTransformDirection, transform_color};
use crate::editor::Editor;
use crate::entity::restore_content_with_entity_placeholder;
use crate::error::EditorError;
use crate::event::{ContentChangedEvent, PluginEventKind, change_source};
use crate::metadata::{
    ContentMetadata, dom_selection_to_metadata, extract_content_metadata,
    metadata_to_dom_selection,
};

/// What [`Editor::get_content`] returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GetContentMode {
    /// HTML with editor-internal markup removed and colors in light mode.
    #[default]
    CleanHtml,
    /// The live HTML as is.
    RawHtmlOnly,
    /// The live HTML followed by a `<!--{metadata}-->` comment describing
    /// the current selection.
    RawHtmlWithSelection,
    /// Text content only.
    PlainText,
}

impl Editor {
    /// Replace the editor content with `html`.
    ///
    /// When the HTML differs from the current content it is parsed through
    /// the trusted HTML hook, tracked entities are restored into it, and the
    /// selection is restored from `metadata` (or from a trailing metadata
    /// comment in `html`) unless a shadow edit is active. Independently of
    /// that, content whose recorded color mode differs from the editor's is
    /// color transformed. Absent metadata counts as light content.
    ///
    /// contentChanged (non-broadcast, source `SetContent`) fires only when
    /// requested and something changed.
    pub fn set_content(
        &mut self,
        html: &str,
        trigger_content_changed: bool,
        metadata: Option<ContentMetadata>,
    ) -> Result<(), EditorError> {
        let content_div = self.content_div();
        let mut metadata = metadata;
        let mut content_changed = false;

        if self.dom().inner_html(content_div) != html {
            self.trigger_event(
                PluginEventKind::BeforeSetContent {
                    new_content: html.to_string(),
                },
                true,
            )?;

            let core = self.core_mut();
            let trusted = match &core.trusted_html_handler {
                Some(handler) => handler(html),
                None => html.to_string(),
            };
            let fragment = core.dom.parse_fragment(&trusted);
            restore_content_with_entity_placeholder(
                &mut core.dom,
                fragment,
                content_div,
                &core.entities,
            );

            let extracted = extract_content_metadata(&mut core.dom, content_div);
            metadata = metadata.or(extracted);

            if core.in_shadow_edit {
                tracing::debug!("shadow edit active, selection not restored");
            } else {
                match metadata_to_dom_selection(&core.dom, content_div, metadata.as_ref())? {
                    Some(selection) => core.selection = Some(selection),
                    None => core.drop_detached_selection(),
                }
            }
            content_changed = true;
        }

        let content_is_dark = metadata.as_ref().is_some_and(|m| m.is_dark_mode);
        let core = self.core_mut();
        if content_is_dark != core.dark_mode {
            let direction = if core.dark_mode {
                ColorTransformDirection::LightToDark
            } else {
                ColorTransformDirection::DarkToLight
            };
            let handler = core.dark_color_handler();
            transform_color(&mut core.dom, content_div, direction, handler.as_ref());
            content_changed = true;
        }

        if trigger_content_changed && content_changed {
            self.trigger_event(
                PluginEventKind::ContentChanged(ContentChangedEvent::new(
                    change_source::SET_CONTENT,
                )),
                false,
            )?;
        }
        Ok(())
    }

    /// Read back the content in the requested form.
    pub fn get_content(&mut self, mode: GetContentMode) -> Result<String, EditorError> {
        let content_div = self.content_div();
        match mode {
            GetContentMode::RawHtmlOnly => Ok(self.dom().inner_html(content_div)),
            GetContentMode::PlainText => Ok(self.dom().text_content(content_div)),
            GetContentMode::RawHtmlWithSelection => {
                let core = self.core_mut();
                let selection = core.selection.clone();
                let metadata = dom_selection_to_metadata(
                    &mut core.dom,
                    content_div,
                    selection.as_ref(),
                    core.dark_mode,
                );
                let mut html = core.dom.inner_html(content_div);
                if let Some(metadata) = metadata {
                    html.push_str("<!--");
                    html.push_str(&metadata.to_json());
                    html.push_str("-->");
                }
                Ok(html)
            }
            GetContentMode::CleanHtml => {
                let cloned_root = self.core_mut().dom.clone_node(content_div, true);
                self.trigger_event(
                    PluginEventKind::ExtractContentWithDom { cloned_root },
                    true,
                )?;
                let core = self.core_mut();
                if core.dark_mode {
                    let handler = core.dark_color_handler();
                    transform_color(
                        &mut core.dom,
                        cloned_root,
                        ColorTransformDirection::DarkToLight,
                        handler.as_ref(),
                    );
                }
                Ok(core.dom.inner_html(cloned_root))
            }
        }
    }
}
