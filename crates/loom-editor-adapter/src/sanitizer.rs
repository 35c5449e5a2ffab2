//! Options handed to the HTML sanitizer when legacy plugins process a
//! paste. The sanitizer itself lives outside this crate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HtmlSanitizerOptions {
    /// Extra tag renames, e.g. `"center" -> "div"`.
    pub additional_tag_replacements: BTreeMap<String, Option<String>>,
    pub additional_allowed_attributes: Vec<String>,
    pub additional_allowed_css_classes: Vec<String>,
    pub additional_default_style_values: BTreeMap<String, String>,
    pub additional_global_style_nodes: Vec<String>,
    /// Replacement for tags the sanitizer does not know. `None` keeps
    /// their content and drops the tag.
    pub unknown_tag_replacement: Option<String>,
    pub preserve_html_comments: bool,
}

/// Sanitizer options used when nothing more specific is known.
pub fn create_default_html_sanitizer_options() -> HtmlSanitizerOptions {
    HtmlSanitizerOptions::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_fills_defaults() {
        let options: HtmlSanitizerOptions = serde_json::from_str(
            r#"{"additionalAllowedCssClasses":["entityDelimiterBefore"],"preserveHtmlComments":true}"#,
        )
        .unwrap();
        assert_eq!(
            options.additional_allowed_css_classes,
            ["entityDelimiterBefore"]
        );
        assert!(options.preserve_html_comments);
        assert_eq!(options.unknown_tag_replacement, None);
        assert_ne!(options, create_default_html_sanitizer_options());
    }
}
