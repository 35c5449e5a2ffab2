//! Error type for editor operations.
//!
//! Most unrecognized input is not an error: unmapped events convert to
//! `None`, stale selection metadata resolves to no selection. Errors are
//! reserved for broken persisted paths and plugin failures.

use miette::Diagnostic;
use smol_str::SmolStr;

use crate::dom::NodeId;

#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum EditorError {
    /// A stored selection path no longer resolves inside its root.
    #[error("selection path {path:?} does not resolve under node {root}")]
    #[diagnostic(
        code(loom::selection::invalid_path),
        help("selection metadata must be stored against the exact content it is restored into")
    )]
    InvalidSelectionPath { root: NodeId, path: Vec<usize> },

    /// A plugin could not be initialized.
    #[error("plugin {plugin} failed to initialize: {reason}")]
    #[diagnostic(code(loom::plugin::init))]
    PluginInit { plugin: SmolStr, reason: String },

    /// A plugin failed while handling an event. Dispatch stops at the
    /// failing plugin.
    #[error("plugin {plugin} failed: {message}")]
    #[diagnostic(code(loom::plugin::event))]
    Plugin { plugin: SmolStr, message: String },

    /// The editor was used after `dispose`.
    #[error("editor has been disposed")]
    #[diagnostic(code(loom::editor::disposed))]
    Disposed,
}

impl EditorError {
    /// Error raised by a plugin while handling an event.
    pub fn plugin(plugin: impl Into<SmolStr>, message: impl Into<String>) -> Self {
        EditorError::Plugin {
            plugin: plugin.into(),
            message: message.into(),
        }
    }
}
