//! Rich text block
//!
//! `format` selects how `content` is interpreted: `html` (authored in the
//! editor, emitted as is), `markdown` or `plain`.

use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{BlockDefinition, PropType};
use crate::services::RegistryError;
use crate::utils::render_text;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextProps {
    pub content: String,
    pub format: String,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            content: String::new(),
            format: "html".to_string(),
        }
    }
}

pub struct TextBlock;

impl BlockRenderer for TextBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: TextProps = cx.decode_props()?;
        Ok(format!(
            "<div{}>{}</div>",
            cx.element_attributes(""),
            render_text(&props.content, &props.format)
        ))
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: TextProps = cx.decode_props()?;
        Ok(format!(
            "<div{}>{}</div>",
            cx.element_attributes("margin:0;font-size:16px;line-height:1.6"),
            render_text(&props.content, &props.format)
        ))
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("text", TextBlock)
        .prop("content", PropType::String, json!(""))
        .prop("format", PropType::String, json!("html"))
        .build()
}
