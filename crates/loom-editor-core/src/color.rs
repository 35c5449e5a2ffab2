//! Color utilities and the light/dark content transform.
//!
//! In dark mode every inline `color` / `background-color` is replaced by a
//! dark counterpart and the original value is kept in `data-ogsc` /
//! `data-ogsb`, so the transform back to light is exact.

use crate::dom::{Dom, NodeId};

/// Attribute holding the original (light) text color.
pub const DATA_OGSC: &str = "data-ogsc";
/// Attribute holding the original (light) background color.
pub const DATA_OGSB: &str = "data-ogsb";

const COLOR_PROPERTIES: [(&str, &str); 2] =
    [("color", DATA_OGSC), ("background-color", DATA_OGSB)];

/// Convert RGBA u32 (packed as 0xRRGGBBAA) to CSS rgba() string.
pub fn rgba_u32_to_css(color: u32) -> String {
    let r = (color >> 24) & 0xFF;
    let g = (color >> 16) & 0xFF;
    let b = (color >> 8) & 0xFF;
    let a = (color & 0xFF) as f32 / 255.0;
    format!("rgba({}, {}, {}, {})", r, g, b, a)
}

/// Parse a CSS color into packed 0xRRGGBBAA.
///
/// Supports `#rgb`, `#rrggbb`, `rgb()`, `rgba()` and a handful of names.
pub fn parse_css_color(value: &str) -> Option<u32> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let rgb = u32::from_str_radix(&expanded, 16).ok()?;
        return Some((rgb << 8) | 0xFF);
    }

    if let Some(args) = value
        .strip_prefix("rgba(")
        .or_else(|| value.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return None;
        }
        let mut packed = 0u32;
        for part in &parts[..3] {
            let channel: u8 = part.parse().ok()?;
            packed = (packed << 8) | channel as u32;
        }
        let alpha = match parts.get(3) {
            Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u32,
            None => 0xFF,
        };
        return Some((packed << 8) | alpha);
    }

    let named = match value.as_str() {
        "black" => 0x000000FF,
        "white" => 0xFFFFFFFF,
        "red" => 0xFF0000FF,
        "green" => 0x008000FF,
        "blue" => 0x0000FFFF,
        "gray" | "grey" => 0x808080FF,
        "yellow" => 0xFFFF00FF,
        "transparent" => 0x00000000,
        _ => return None,
    };
    Some(named)
}

/// Maps light-mode colors to their dark-mode counterparts.
pub trait DarkColorHandler {
    /// Dark counterpart of a light CSS color, or `None` to leave it as is.
    fn light_to_dark(&self, light: &str) -> Option<String>;
}

/// Inverts the RGB channels and keeps alpha.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDarkColorHandler;

impl DarkColorHandler for DefaultDarkColorHandler {
    fn light_to_dark(&self, light: &str) -> Option<String> {
        let color = parse_css_color(light)?;
        let inverted = (!color & 0xFFFFFF00) | (color & 0xFF);
        Some(rgba_u32_to_css(inverted))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTransformDirection {
    LightToDark,
    DarkToLight,
}

/// Transform inline colors of every element below `root`.
pub fn transform_color(
    dom: &mut Dom,
    root: NodeId,
    direction: ColorTransformDirection,
    handler: &dyn DarkColorHandler,
) {
    let elements: Vec<NodeId> = dom
        .descendants(root)
        .into_iter()
        .filter(|&n| dom.is_element(n))
        .collect();

    tracing::trace!(count = elements.len(), ?direction, "transforming colors");

    for element in elements {
        for (property, data_attribute) in COLOR_PROPERTIES {
            match direction {
                ColorTransformDirection::LightToDark => {
                    // Already dark: start again from the stored original.
                    let stored = dom.attribute(element, data_attribute).map(str::to_string);
                    let Some(light) = stored.clone().or_else(|| dom.style(element, property))
                    else {
                        continue;
                    };
                    if stored.is_none() {
                        dom.set_attribute(element, data_attribute, light.clone());
                    }
                    if let Some(dark) = handler.light_to_dark(&light) {
                        dom.set_style(element, property, Some(&dark));
                    }
                }
                ColorTransformDirection::DarkToLight => {
                    let Some(light) = dom.attribute(element, data_attribute).map(str::to_string)
                    else {
                        continue;
                    };
                    let value = (!light.is_empty()).then_some(light.as_str());
                    dom.set_style(element, property, value);
                    dom.remove_attribute(element, data_attribute);
                }
            }
        }
    }
}
