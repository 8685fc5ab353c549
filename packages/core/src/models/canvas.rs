//! Canvas Settings
//!
//! Typed view over a document's `canvasSettings` map. Every field has a
//! default and malformed values fall back to it; unknown keys are kept in
//! `extra` so hooks can read settings this crate does not know about.

use crate::models::block::Props;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMAIL_WIDTH: u32 = 600;

/// Document-level configuration consumed while wrapping output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanvasSettings {
    /// Email body width in pixels (also sizes the MSO wrapper table)
    pub width: u32,

    /// Page container max width (CSS length)
    pub max_width: String,

    /// Extra class on the page container
    pub container_class: String,

    pub background_color: String,
    pub content_background: String,
    pub font_family: String,
    pub text_color: String,

    /// Padding around the content area (CSS shorthand)
    pub padding: String,

    /// `<title>` of the email document
    pub title: String,

    /// Hidden inbox preview text (email/campaign)
    pub preheader: String,

    pub lang: String,

    /// `ltr` or `rtl`
    pub direction: String,

    #[serde(flatten)]
    pub extra: Props,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_EMAIL_WIDTH,
            max_width: "1200px".to_string(),
            container_class: String::new(),
            background_color: "#f4f4f5".to_string(),
            content_background: "#ffffff".to_string(),
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            text_color: "#1f2937".to_string(),
            padding: "0".to_string(),
            title: String::new(),
            preheader: String::new(),
            lang: "en".to_string(),
            direction: "ltr".to_string(),
            extra: Props::new(),
        }
    }
}

impl CanvasSettings {
    /// Build settings from the raw document map, field by field.
    ///
    /// `fallback_width` replaces a missing or non-positive `width`;
    /// `max_width` caps it.
    pub fn from_props(props: &Props, fallback_width: u32, max_width: u32) -> Self {
        let defaults = Self::default();
        let text = |key: &str, default: &str| -> String {
            match props.get(key) {
                Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(serde_json::Value::Number(n)) => n.to_string(),
                _ => default.to_string(),
            }
        };

        let width = props
            .get("width")
            .and_then(parse_pixels)
            .filter(|w| *w > 0)
            .unwrap_or(fallback_width)
            .min(max_width);

        let direction = match text("direction", &defaults.direction).as_str() {
            "rtl" => "rtl".to_string(),
            _ => "ltr".to_string(),
        };

        let known = [
            "width",
            "maxWidth",
            "containerClass",
            "backgroundColor",
            "contentBackground",
            "fontFamily",
            "textColor",
            "padding",
            "title",
            "preheader",
            "lang",
            "direction",
        ];
        let extra = props
            .iter()
            .filter(|(k, _)| !known.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        Self {
            width,
            max_width: text("maxWidth", &defaults.max_width),
            container_class: text("containerClass", &defaults.container_class),
            background_color: text("backgroundColor", &defaults.background_color),
            content_background: text("contentBackground", &defaults.content_background),
            font_family: text("fontFamily", &defaults.font_family),
            text_color: text("textColor", &defaults.text_color),
            padding: text("padding", &defaults.padding),
            title: text("title", &defaults.title),
            preheader: text("preheader", &defaults.preheader),
            lang: text("lang", &defaults.lang),
            direction,
            extra,
        }
    }
}

/// Accept `600`, `"600"` and `"600px"`
fn parse_pixels(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u32),
        serde_json::Value::String(s) => s.trim().trim_end_matches("px").trim().parse::<u32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_defaults_when_empty() {
        let settings = CanvasSettings::from_props(&Props::new(), 600, 1200);
        assert_eq!(settings.width, 600);
        assert_eq!(settings.max_width, "1200px");
        assert_eq!(settings.direction, "ltr");
    }

    #[test]
    fn test_width_parsing() {
        let s = CanvasSettings::from_props(&props(json!({"width": "640px"})), 600, 1200);
        assert_eq!(s.width, 640);

        let s = CanvasSettings::from_props(&props(json!({"width": 700})), 600, 1200);
        assert_eq!(s.width, 700);

        let s = CanvasSettings::from_props(&props(json!({"width": "wide"})), 600, 1200);
        assert_eq!(s.width, 600);

        let s = CanvasSettings::from_props(&props(json!({"width": 5000})), 600, 1200);
        assert_eq!(s.width, 1200);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let s = CanvasSettings::from_props(
            &props(json!({"backgroundColor": ["red"], "direction": "sideways", "title": "  "})),
            600,
            1200,
        );
        assert_eq!(s.background_color, "#f4f4f5");
        assert_eq!(s.direction, "ltr");
        assert_eq!(s.title, "");
    }

    #[test]
    fn test_unknown_keys_kept() {
        let s = CanvasSettings::from_props(&props(json!({"brandColor": "#f00"})), 600, 1200);
        assert_eq!(s.extra["brandColor"], "#f00");
    }
}
