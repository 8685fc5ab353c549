//! Call-to-action button
//!
//! Schema v3. v1 stored the target as `link`, v2 renamed it to `url`; v3
//! renamed `style` to `variant`.

use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{BlockDefinition, PropType, Props};
use crate::services::{MigrationError, RegistryError};
use crate::utils::html;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ButtonProps {
    pub text: String,
    pub url: String,
    pub variant: String,
    pub background_color: String,
    pub text_color: String,
    pub full_width: bool,
}

impl Default for ButtonProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            url: "#".to_string(),
            variant: "primary".to_string(),
            background_color: String::new(),
            text_color: String::new(),
            full_width: false,
        }
    }
}

impl ButtonProps {
    /// Background, text and border colors for the variant, with explicit
    /// colors taking precedence
    fn colors(&self) -> (String, String, String) {
        let (background, text, border) = match self.variant.as_str() {
            "secondary" => ("#e5e7eb", "#111827", "#e5e7eb"),
            "outline" => ("transparent", "#2563eb", "#2563eb"),
            _ => ("#2563eb", "#ffffff", "#2563eb"),
        };
        let pick = |custom: &str, fallback: &str| {
            if custom.trim().is_empty() {
                fallback.to_string()
            } else {
                custom.trim().to_string()
            }
        };
        (
            pick(&self.background_color, background),
            pick(&self.text_color, text),
            pick(&self.background_color, border),
        )
    }

    fn label(&self, cx: &BlockContext<'_>) -> String {
        if self.text.trim().is_empty() {
            cx.translate("button.default_label")
        } else {
            self.text.clone()
        }
    }
}

pub struct ButtonBlock;

impl BlockRenderer for ButtonBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: ButtonProps = cx.decode_props()?;
        let (background, text, border) = props.colors();
        let display = if props.full_width { "block" } else { "inline-block" };
        let styles = format!(
            "display:{display};padding:12px 24px;border-radius:6px;border:1px solid {border};background-color:{background};color:{text};text-decoration:none;text-align:center;font-weight:600"
        );
        Ok(format!(
            "<a href=\"{}\"{} role=\"button\">{}</a>",
            html::safe_url(&props.url),
            cx.element_attributes(&styles),
            html::text(&props.label(cx))
        ))
    }

    /// Table-based button; the padding sits on the cell so Outlook keeps the
    /// whole area clickable-looking
    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: ButtonProps = cx.decode_props()?;
        let (background, text, border) = props.colors();
        let width = if props.full_width { " width=\"100%\"" } else { "" };
        Ok(format!(
            "<table role=\"presentation\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"{width}{}><tr>\
             <td align=\"center\" bgcolor=\"{bg}\" style=\"border-radius:6px;border:1px solid {border};background-color:{bg}\">\
             <a href=\"{href}\" style=\"display:inline-block;padding:12px 24px;color:{text};text-decoration:none;font-weight:bold\">{label}</a>\
             </td></tr></table>",
            cx.element_attributes(""),
            bg = html::attr(&background),
            border = html::attr(&border),
            href = html::safe_url(&props.url),
            text = html::attr(&text),
            label = html::text(&props.label(cx)),
        ))
    }
}

/// v1 → v2: `link` becomes `url`
fn link_to_url(props: &Props) -> Result<Props, MigrationError> {
    let mut props = props.clone();
    if let Some(link) = props.remove("link") {
        props.entry("url").or_insert(link);
    }
    Ok(props)
}

/// v2 → v3: `style` becomes `variant`
fn style_to_variant(props: &Props) -> Result<Props, MigrationError> {
    let mut props = props.clone();
    if let Some(style) = props.remove("style") {
        props.entry("variant").or_insert(style);
    }
    Ok(props)
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("button", ButtonBlock)
        .schema_version(3)
        .prop("text", PropType::String, json!(""))
        .prop("url", PropType::String, json!("#"))
        .prop("variant", PropType::String, json!("primary"))
        .prop("backgroundColor", PropType::String, json!(""))
        .prop("textColor", PropType::String, json!(""))
        .prop("fullWidth", PropType::Boolean, json!(false))
        .migration(1, 2, link_to_url)
        .migration(2, 3, style_to_variant)
        .build()
}

#[cfg(test)]
#[path = "button_test.rs"]
mod button_test;
