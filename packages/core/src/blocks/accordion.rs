//! Collapsible sections
//!
//! Each child node is one section; its title comes from the child's `title`
//! prop. Email clients cannot toggle content, so email output lists every
//! section expanded.

use crate::behaviors::{BlockContext, BlockRenderer, BlockResult, ChildLayout};
use crate::models::definition::SUPPORTS_CHILDREN;
use crate::models::{BlockDefinition, PropType};
use crate::services::RegistryError;
use crate::utils::html;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccordionProps {
    /// Expand the first section on page load
    pub open_first: bool,
}

pub struct AccordionBlock;

/// Titles of the visible sections, in child order
fn section_titles(cx: &BlockContext<'_>) -> Vec<String> {
    cx.visible_children()
        .map(|child| {
            child
                .source
                .props
                .get("title")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| cx.translate("accordion.untitled"))
        })
        .collect()
}

impl BlockRenderer for AccordionBlock {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        let props: AccordionProps = cx.decode_props()?;
        let sections: String = section_titles(cx)
            .iter()
            .zip(cx.render_children())
            .enumerate()
            .map(|(index, (title, content))| {
                let open = if index == 0 && props.open_first { " open" } else { "" };
                format!(
                    "<details class=\"lb-accordion-item\"{open}><summary>{}</summary><div class=\"lb-accordion-body\">{}</div></details>",
                    html::text(title),
                    content
                )
            })
            .collect();
        Ok(format!("<div{}>{}</div>", cx.element_attributes(""), sections))
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        let items: Vec<String> = section_titles(cx)
            .iter()
            .zip(cx.render_children())
            .map(|(title, content)| {
                format!(
                    "<p style=\"margin:0 0 8px 0;font-size:16px;font-weight:bold\">{}</p>{}",
                    html::text(title),
                    content
                )
            })
            .collect();
        Ok(format!(
            "<div{}>{}</div>",
            cx.element_attributes(""),
            cx.arrange(items, &ChildLayout::Stack { gap: 16 })
        ))
    }
}

pub fn definition() -> Result<BlockDefinition, RegistryError> {
    BlockDefinition::builder("accordion", AccordionBlock)
        .prop("openFirst", PropType::Boolean, json!(false))
        .supports(SUPPORTS_CHILDREN)
        .build()
}
