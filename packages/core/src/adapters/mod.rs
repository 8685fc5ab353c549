//! Context Adapters
//!
//! One adapter per output context. The adapter owns everything that differs
//! between targets so block renderers stay small:
//!
//! - renderer dispatch (`render_block`)
//! - how a block's classes and styles become attributes
//! - how container children are laid out
//! - what a placeholder looks like
//! - the document shell around the concatenated blocks
//!
//! | context  | adapter           | styles             | containers        |
//! |----------|-------------------|--------------------|-------------------|
//! | page     | [`PageAdapter`]   | classes + `<style>`| flex rows         |
//! | email    | [`EmailAdapter`]  | inline `style=""`  | tables            |
//! | campaign | [`CampaignAdapter`] | as email         | as email          |

mod campaign;
mod email;
mod page;

pub use campaign::CampaignAdapter;
pub use email::EmailAdapter;
pub use page::PageAdapter;

use crate::behaviors::{BlockContext, BlockResult, ChildLayout};
use crate::config::RenderConfig;
use crate::hooks::names;
use crate::models::definition::{PROP_CUSTOM_CSS, PROP_LAYOUT_STYLES};
use crate::models::{BlockPath, ContextName};
use crate::services::block_registry::BlockRegistry;
use crate::services::collaborators::Translator;
use crate::services::error::BlockError;
use crate::services::renderer::RenderSession;
use crate::utils::merge_styles;

static PAGE: PageAdapter = PageAdapter;
static EMAIL: EmailAdapter = EmailAdapter;
static CAMPAIGN: CampaignAdapter = CampaignAdapter;

/// Adapter serving `context`
pub fn adapter_for(context: ContextName) -> &'static dyn ContextAdapter {
    match context {
        ContextName::Page => &PAGE,
        ContextName::Email => &EMAIL,
        ContextName::Campaign => &CAMPAIGN,
    }
}

/// Marker shared by every placeholder, in every context
pub const PLACEHOLDER_MARKER: &str = "lb-placeholder";

/// Target-specific half of the pipeline
pub trait ContextAdapter: Send + Sync {
    fn context_name(&self) -> ContextName;

    /// Invoke the registered renderer for this context
    fn render_block(&self, registry: &BlockRegistry, cx: &BlockContext<'_>) -> BlockResult {
        let context = self.context_name();
        registry
            .get_renderer(cx.block_type(), context)
            .ok_or_else(|| BlockError::missing_context_renderer(cx.block_type(), context.as_str()))?
            .render(cx)
    }

    /// Attributes carrying the block's classes/styles, with a leading space
    fn element_attributes(&self, cx: &BlockContext<'_>, block_styles: &str) -> String;

    /// Arrange already rendered children
    fn layout_children(&self, cx: &BlockContext<'_>, children: Vec<String>, layout: &ChildLayout) -> String;

    /// Marked fragment standing in for a node that could not render
    fn placeholder(
        &self,
        block_type: &str,
        path: &BlockPath,
        config: &RenderConfig,
        translator: &dyn Translator,
    ) -> String;

    /// Post-process the concatenated block markup before wrapping
    fn finish_blocks(&self, html: String, session: &RenderSession<'_>) -> String {
        let _ = session;
        html
    }

    /// Document shell around the block markup
    fn wrap_output(&self, body: String, session: &RenderSession<'_>) -> String;

    /// `wrap_output` between the `html.before_wrap` and `html.after_wrap` filters
    fn wrap(&self, body: String, session: &RenderSession<'_>) -> String {
        let args = session.hook_args();
        let body = session.apply_filter(names::HTML_BEFORE_WRAP, body, &args);
        let wrapped = self.wrap_output(body, session);
        session.apply_filter(names::HTML_AFTER_WRAP, wrapped, &args)
    }
}

/// Layout styles, block styles and `customCSS` of `cx`, merged
pub(crate) fn merged_styles(cx: &BlockContext<'_>, block_styles: &str) -> String {
    let props = cx.props();
    merge_styles(&props.object(PROP_LAYOUT_STYLES), block_styles, props.str(PROP_CUSTOM_CSS))
}

/// `50.0` -> `50`, `33.333333` -> `33.33`
pub(crate) fn format_percent(width: f64) -> String {
    let rounded = (width * 100.0).round() / 100.0;
    format!("{rounded}")
}

/// Column widths normalized to one positive percentage per child
pub(crate) fn column_widths(widths: &[f64], count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let usable = widths.len() == count && widths.iter().all(|w| w.is_finite() && *w > 0.0);
    if !usable {
        return vec![100.0 / count as f64; count];
    }
    let total: f64 = widths.iter().sum();
    widths.iter().map(|w| w * 100.0 / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_for_context() {
        for name in ContextName::ALL {
            assert_eq!(adapter_for(name).context_name(), name);
        }
    }

    #[test]
    fn test_column_widths_normalized() {
        assert_eq!(column_widths(&[], 2), vec![50.0, 50.0]);
        assert_eq!(column_widths(&[1.0, 3.0], 2), vec![25.0, 75.0]);
        assert_eq!(column_widths(&[50.0], 2), vec![50.0, 50.0]);
        assert_eq!(column_widths(&[50.0, -1.0], 2), vec![50.0, 50.0]);
        assert!(column_widths(&[], 0).is_empty());
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(50.0), "50");
        assert_eq!(format_percent(100.0 / 3.0), "33.33");
    }
}
