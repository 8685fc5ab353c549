use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{BlockDefinition, PropType};
use crate::services::RegistryError;
use serde_json::json;

/// Raw markup authored by an administrator, emitted unchanged in every context
pub struct HtmlBlock;

impl HtmlBlock {
    fn render(cx: &BlockContext<'_>) -> BlockResult {
        Ok(format!(
            "<div{}>{}</div>",
            cx.element_attributes(""),
            cx.props().str("content")
        ))
    }
}

impl BlockRenderer for HtmlBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        Self::render(cx)
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        Self::render(cx)
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("html", HtmlBlock)
        .prop("content", PropType::String, json!(""))
        .build()
}
