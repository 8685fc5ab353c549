use crate::behaviors::{BlockContext, BlockRenderer, BlockResult};
use crate::models::{BlockDefinition, PropType};
use crate::services::RegistryError;
use serde_json::json;

/// Tallest spacer the editor offers
const MAX_HEIGHT: i64 = 400;

/// Vertical whitespace
pub struct SpacerBlock;

fn height(cx: &BlockContext<'_>) -> i64 {
    cx.props().i64("height").clamp(0, MAX_HEIGHT)
}

impl BlockRenderer for SpacerBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let styles = format!("height:{}px", height(cx));
        Ok(format!("<div{} aria-hidden=\"true\"></div>", cx.element_attributes(&styles)))
    }

    /// Outlook ignores `height` on empty divs, so email uses a sized cell
    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let height = height(cx);
        let styles = format!("height:{height}px;font-size:0;line-height:0");
        Ok(format!(
            "<table role=\"presentation\" width=\"100%\" cellpadding=\"0\" cellspacing=\"0\" border=\"0\"><tr><td height=\"{height}\"{}>&nbsp;</td></tr></table>",
            cx.element_attributes(&styles)
        ))
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("spacer", SpacerBlock)
        .prop("height", PropType::Integer, json!(24))
        .build()
}

#[cfg(test)]
mod tests {
    use crate::blocks::test_support::render_node;
    use serde_json::json;

    #[test]
    fn test_spacer_heights() {
        let out = render_node(json!({"type": "spacer", "props": {"height": 40}}), "email");
        assert!(out.html.contains("<td height=\"40\" style=\"height:40px;font-size:0;line-height:0\">&nbsp;</td>"));

        // Mistyped height falls back to the default
        let out = render_node(json!({"type": "spacer", "props": {"height": "tall"}}), "page");
        assert!(out.html.contains("#lb-0{height:24px}"));
    }
}
