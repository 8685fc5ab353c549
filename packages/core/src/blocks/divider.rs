//! Horizontal rule
//!
//! Schema v2. v1 stored the line weight as a bare pixel number in
//! `borderWidth`.

use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{BlockDefinition, PropType, Props};
use crate::services::{MigrationError, RegistryError};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DividerProps {
    pub thickness: String,
    pub color: String,
    pub line_style: String,
}

impl Default for DividerProps {
    fn default() -> Self {
        Self {
            thickness: "1px".to_string(),
            color: "#e5e7eb".to_string(),
            line_style: "solid".to_string(),
        }
    }
}

impl DividerProps {
    fn border(&self) -> String {
        let line_style = match self.line_style.as_str() {
            "dashed" | "dotted" | "double" => self.line_style.as_str(),
            _ => "solid",
        };
        format!(
            "border:none;border-top:{} {} {}",
            self.thickness.trim(),
            line_style,
            self.color.trim()
        )
    }
}

pub struct DividerBlock;

impl BlockRenderer for DividerBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: DividerProps = cx.decode_props()?;
        Ok(format!("<hr{}>", cx.element_attributes(&props.border())))
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: DividerProps = cx.decode_props()?;
        let styles = format!("{};margin:16px 0;height:0;width:100%", props.border());
        Ok(format!("<hr{}>", cx.element_attributes(&styles)))
    }
}

/// v1 → v2: `borderWidth: 2` becomes `thickness: "2px"`
fn border_width_to_thickness(props: &Props) -> Result<Props, MigrationError> {
    let mut props = props.clone();
    if let Some(width) = props.remove("borderWidth") {
        let thickness = match width {
            Value::Number(n) => format!("{n}px"),
            Value::String(s) if !s.trim().is_empty() && s.trim().chars().all(|c| c.is_ascii_digit()) => format!("{}px", s.trim()),
            Value::String(s) => s,
            other => return Err(MigrationError::new(format!("unexpected borderWidth {other}"))),
        };
        props.entry("thickness").or_insert(json!(thickness));
    }
    Ok(props)
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("divider", DividerBlock)
        .schema_version(2)
        .prop("thickness", PropType::String, json!("1px"))
        .prop("color", PropType::String, json!("#e5e7eb"))
        .prop("lineStyle", PropType::String, json!("solid"))
        .migration(1, 2, border_width_to_thickness)
        .build()
}
