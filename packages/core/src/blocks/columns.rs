//! Multi-column container
//!
//! Each child node is one column, in order. `widths` holds one relative
//! width per column; missing or mismatched widths split the row evenly.
//! Pages lay columns out as a flex row that stacks on narrow screens, email
//! as table cells side by side.

use crate::behaviors::{BlockContext, BlockRenderer, BlockResult, ChildLayout};
use crate::models::definition::SUPPORTS_CHILDREN;
use crate::models::{lenient, BlockDefinition, PropType};
use crate::services::RegistryError;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnsProps {
    #[serde(deserialize_with = "lenient::numbers")]
    pub widths: Vec<f64>,
    #[serde(deserialize_with = "lenient::int")]
    pub gap: i64,
}

impl Default for ColumnsProps {
    fn default() -> Self {
        Self {
            widths: Vec::new(),
            gap: 24,
        }
    }
}

/// Widest gutter the editor offers
const MAX_GAP: i64 = 200;

impl ColumnsProps {
    /// Gap clamped to 0..=200 px
    pub fn gap(&self) -> u32 {
        self.gap.clamp(0, MAX_GAP) as u32
    }
}

pub struct ColumnsBlock;

impl ColumnsBlock {
    fn render(cx: &BlockContext<'_>) -> BlockResult {
        let props: ColumnsProps = cx.decode_props()?;
        let layout = ChildLayout::Columns {
            gap: props.gap(),
            widths: props.widths,
        };
        Ok(format!("<div{}>{}</div>", cx.element_attributes(""), cx.layout_children(&layout)))
    }
}

impl BlockRenderer for ColumnsBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        Self::render(cx)
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        Self::render(cx)
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("columns", ColumnsBlock)
        .prop("widths", PropType::Array, json!([]))
        .prop("gap", PropType::Integer, json!(24))
        .supports(SUPPORTS_CHILDREN)
        .build()
}

#[cfg(test)]
#[path = "columns_test.rs"]
mod columns_test;
