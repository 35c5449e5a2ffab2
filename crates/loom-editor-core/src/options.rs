//! Editor construction options.
//!
//! Serializable settings live in [`EditorSettings`]; host hooks and plugins
//! are carried next to them in [`EditorOptions`].

use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::color::DarkColorHandler;
use crate::plugin::EditorPlugin;

/// Host hook applied to HTML before it is parsed into the editor.
pub type TrustedHtmlHandler = Rc<dyn Fn(&str) -> String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    /// Start in dark mode.
    pub in_dark_mode: bool,
    pub zoom_scale: f64,
    pub experimental_features: Vec<SmolStr>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            in_dark_mode: false,
            zoom_scale: 1.0,
            experimental_features: Vec::new(),
        }
    }
}

#[derive(Default)]
pub struct EditorOptions {
    pub settings: EditorSettings,
    pub plugins: Vec<Box<dyn EditorPlugin>>,
    pub trusted_html_handler: Option<TrustedHtmlHandler>,
    /// Defaults to [`DefaultDarkColorHandler`](crate::DefaultDarkColorHandler).
    pub dark_color_handler: Option<Rc<dyn DarkColorHandler>>,
    /// Content set (without a contentChanged event) once plugins are
    /// initialized.
    pub initial_content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_partial_json() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{"inDarkMode":true,"experimentalFeatures":["x"]}"#).unwrap();
        assert!(settings.in_dark_mode);
        assert_eq!(settings.zoom_scale, 1.0);
        assert_eq!(settings.experimental_features, vec![SmolStr::new("x")]);
    }
}
