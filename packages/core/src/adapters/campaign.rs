use super::{ContextAdapter, EmailAdapter};
use crate::behaviors::{BlockContext, BlockResult, ChildLayout};
use crate::config::RenderConfig;
use crate::hooks::names;
use crate::models::{BlockPath, ContextName};
use crate::services::block_registry::BlockRegistry;
use crate::services::collaborators::Translator;
use crate::services::renderer::RenderSession;
use crate::utils::personalization::{substitute_tokens, token_keys};
use std::collections::BTreeMap;

/// Token keys in `html` with no value; their fallback (or nothing) is used
fn unfilled_tokens(html: &str, tokens: &BTreeMap<String, String>) -> Vec<String> {
    token_keys(html)
        .into_iter()
        .filter(|key| tokens.get(key).map_or(true, String::is_empty))
        .collect()
}

/// Email output plus personalization.
///
/// Blocks use their campaign renderer when they have one and their email
/// renderer otherwise. `{{ key }}` tokens are substituted after all blocks
/// rendered and before the shell is added.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampaignAdapter;

impl ContextAdapter for CampaignAdapter {
    fn context_name(&self) -> ContextName {
        ContextName::Campaign
    }

    fn render_block(&self, registry: &BlockRegistry, cx: &BlockContext<'_>) -> BlockResult {
        match registry.get_renderer(cx.block_type(), ContextName::Campaign) {
            Some(renderer) => renderer.render(cx),
            None => EmailAdapter.render_block(registry, cx),
        }
    }

    fn element_attributes(&self, cx: &BlockContext<'_>, block_styles: &str) -> String {
        EmailAdapter.element_attributes(cx, block_styles)
    }

    fn layout_children(&self, cx: &BlockContext<'_>, children: Vec<String>, layout: &ChildLayout) -> String {
        EmailAdapter.layout_children(cx, children, layout)
    }

    fn placeholder(
        &self,
        block_type: &str,
        path: &BlockPath,
        config: &RenderConfig,
        translator: &dyn Translator,
    ) -> String {
        EmailAdapter.placeholder(block_type, path, config, translator)
    }

    fn finish_blocks(&self, html: String, session: &RenderSession<'_>) -> String {
        let tokens = session.apply_filter(
            names::PERSONALIZATION_TOKENS,
            session.options().personalization.clone(),
            &session.hook_args(),
        );
        let unfilled = unfilled_tokens(&html, &tokens);
        if !unfilled.is_empty() {
            tracing::debug!(?unfilled, "Personalization tokens without a value");
        }
        substitute_tokens(&html, &tokens)
    }

    fn wrap_output(&self, body: String, session: &RenderSession<'_>) -> String {
        EmailAdapter.wrap_output(body, session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfilled_tokens() {
        let tokens: BTreeMap<String, String> = [("first_name", "Ada"), ("company", "")]
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let html = "{{ first_name }} at {{ company | us }} in {{ city }}, {{ first_name }}";

        assert_eq!(unfilled_tokens(html, &tokens), vec!["company".to_string(), "city".to_string()]);
    }
}
