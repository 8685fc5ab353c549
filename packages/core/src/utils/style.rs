//! Style Merge Engine
//!
//! String-level composition of inline styles and class lists. No CSS is
//! parsed or validated: declarations are concatenated in a fixed precedence
//! order and the later ones win when a mail client or browser applies them.
//!
//! Precedence (first to last):
//!
//! 1. layout styles from the shared `layoutStyles` prop
//! 2. block-type computed styles
//! 3. user `customCSS`, appended verbatim

use crate::models::definition::PROP_CUSTOM_CLASS;
use crate::models::Props;
use serde_json::Value;

/// Layout keys that take a pixel unit when given as bare numbers
const PIXEL_KEYS: &[&str] = &[
    "margin",
    "padding",
    "width",
    "height",
    "max-width",
    "min-height",
    "border-radius",
    "font-size",
    "gap",
];

/// `marginTop` -> `margin-top`
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

fn css_property(key: &str) -> String {
    match key {
        "alignment" | "align" => "text-align".to_string(),
        other => kebab_case(other),
    }
}

fn css_value(property: &str, value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches(';').trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => {
            let is_pixel = PIXEL_KEYS
                .iter()
                .any(|k| property == *k || property.starts_with(&format!("{k}-")));
            if is_pixel && n.as_f64() != Some(0.0) {
                Some(format!("{n}px"))
            } else {
                Some(n.to_string())
            }
        }
        _ => None,
    }
}

/// Convert a `layoutStyles` map into CSS declarations.
///
/// Keys are camelCase or kebab-case; nested side maps expand in
/// top/right/bottom/left order (`{"margin": {"top": "4px"}}` ->
/// `margin-top:4px`). Output order is the map's key order, so it is stable.
pub fn layout_declarations(layout: &Props) -> Vec<String> {
    let mut declarations = Vec::new();
    for (key, value) in layout {
        let property = css_property(key);
        match value {
            Value::Object(sides) => {
                for side in ["top", "right", "bottom", "left"] {
                    let sub_property = format!("{property}-{side}");
                    if let Some(v) = sides.get(side).and_then(|v| css_value(&sub_property, v)) {
                        declarations.push(format!("{sub_property}:{v}"));
                    }
                }
            }
            other => {
                if let Some(v) = css_value(&property, other) {
                    declarations.push(format!("{property}:{v}"));
                }
            }
        }
    }
    declarations
}

fn clean_segment(segment: &str) -> &str {
    segment.trim().trim_end_matches(';').trim()
}

/// Merge layout, block and custom styles into one inline style string.
///
/// Segments are joined with `"; "` after dropping empty ones.
pub fn merge_styles(layout_styles: &Props, block_styles: &str, custom_css: &str) -> String {
    let mut segments = layout_declarations(layout_styles);
    for segment in [block_styles, custom_css] {
        let cleaned = clean_segment(segment);
        if !cleaned.is_empty() {
            segments.push(cleaned.to_string());
        }
    }
    segments.join("; ")
}

/// Keep only characters valid in a class token
fn class_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// Class list for page output: base class, `block-<type>`, then the user's
/// `customClass` tokens, always in that order.
pub fn build_block_classes(base_class: &str, block_type: &str, props: &Props) -> String {
    let mut classes = Vec::new();
    let base = class_token(base_class);
    if !base.is_empty() {
        classes.push(base);
    }
    classes.push(format!("block-{}", class_token(block_type)));

    if let Some(custom) = props.get(PROP_CUSTOM_CLASS).and_then(Value::as_str) {
        for token in custom.split_whitespace() {
            let token = class_token(token);
            if !token.is_empty() && !classes.contains(&token) {
                classes.push(token);
            }
        }
    }
    classes.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_merge_precedence_order() {
        let merged = merge_styles(&props(json!({"margin": "10px"})), "margin:0", "color:red");
        assert_eq!(merged, "margin:10px; margin:0; color:red");
    }

    #[test]
    fn test_empty_segments_dropped() {
        assert_eq!(merge_styles(&Props::new(), "", "  "), "");
        assert_eq!(merge_styles(&Props::new(), "color:blue;", ""), "color:blue");
        assert_eq!(merge_styles(&props(json!({"padding": ""})), "", "top:0"), "top:0");
    }

    #[test]
    fn test_custom_css_is_verbatim() {
        let merged = merge_styles(&Props::new(), "", "color: red !important; font-weight:bold");
        assert_eq!(merged, "color: red !important; font-weight:bold");
    }

    #[test]
    fn test_layout_key_conversion() {
        let decls = layout_declarations(&props(json!({
            "marginTop": 8,
            "alignment": "center",
            "padding": {"top": "4px", "left": 0}
        })));
        assert_eq!(
            decls,
            vec![
                "text-align:center",
                "margin-top:8px",
                "padding-top:4px",
                "padding-left:0",
            ]
        );
    }

    #[test]
    fn test_non_pixel_numbers_stay_bare() {
        let decls = layout_declarations(&props(json!({"lineHeight": 1.5, "opacity": 0.5})));
        assert_eq!(decls, vec!["line-height:1.5", "opacity:0.5"]);
    }

    #[test]
    fn test_block_classes_fixed_order() {
        let classes = build_block_classes("lb-block", "divider", &props(json!({"customClass": "hero  wide"})));
        assert_eq!(classes, "lb-block block-divider hero wide");
    }

    #[test]
    fn test_block_classes_sanitized() {
        let classes = build_block_classes("lb-block", "text", &props(json!({"customClass": "a\"><script> b"})));
        assert_eq!(classes, "lb-block block-text ascript b");
    }
}
