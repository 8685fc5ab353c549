//! Heading block (`<h1>`–`<h6>`)
//!
//! Schema v2. Version 1 documents stored the level as `size`, either a number
//! or a tag name such as `"h3"`.

use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{lenient, BlockDefinition, PropType, Props};
use crate::services::{MigrationError, RegistryError};
use crate::utils::html;
use serde::Deserialize;
use serde_json::{json, Value};

/// Email font sizes for levels 1 to 6
const EMAIL_FONT_SIZES: [u32; 6] = [32, 26, 22, 18, 16, 14];

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingProps {
    pub text: String,
    #[serde(deserialize_with = "lenient::int")]
    pub level: i64,
    pub color: String,
}

impl Default for HeadingProps {
    fn default() -> Self {
        Self {
            text: String::new(),
            level: 2,
            color: String::new(),
        }
    }
}

impl HeadingProps {
    /// Level clamped to 1..=6
    pub fn level(&self) -> usize {
        self.level.clamp(1, 6) as usize
    }

    fn color_style(&self) -> String {
        let color = self.color.trim();
        if color.is_empty() {
            String::new()
        } else {
            format!("color:{color}")
        }
    }
}

pub struct HeadingBlock;

impl BlockRenderer for HeadingBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: HeadingProps = cx.decode_props()?;
        let level = props.level();
        Ok(format!(
            "<h{level}{}>{}</h{level}>",
            cx.element_attributes(&props.color_style()),
            html::text(&props.text)
        ))
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: HeadingProps = cx.decode_props()?;
        let level = props.level();
        let mut styles = format!(
            "margin:0;font-size:{}px;line-height:1.3;font-weight:bold",
            EMAIL_FONT_SIZES[level - 1]
        );
        let color = props.color_style();
        if !color.is_empty() {
            styles.push(';');
            styles.push_str(&color);
        }
        Ok(format!(
            "<h{level}{}>{}</h{level}>",
            cx.element_attributes(&styles),
            html::text(&props.text)
        ))
    }
}

/// v1 → v2: `size` becomes `level`
fn size_to_level(props: &Props) -> Result<Props, MigrationError> {
    let mut props = props.clone();
    let Some(size) = props.remove("size") else {
        return Ok(props);
    };
    let level = match &size {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().trim_start_matches(['h', 'H']).parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| MigrationError::new(format!("cannot read heading size {size}")))?;

    props.entry("level").or_insert(json!(level));
    Ok(props)
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("heading", HeadingBlock)
        .schema_version(2)
        .prop("text", PropType::String, json!(""))
        .prop("level", PropType::Integer, json!(2))
        .prop("color", PropType::String, json!(""))
        .migration(1, 2, size_to_level)
        .build()
}

#[cfg(test)]
#[path = "heading_test.rs"]
mod heading_test;
