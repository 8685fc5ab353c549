//! Hook names used by the rendering pipeline.
//!
//! External modules register against these exact strings.

use crate::models::ContextName;

/// Filter over the root block list (`Vec<BlockNode>`); one per context
pub const BLOCKS_PAGE: &str = "blocks.page";
pub const BLOCKS_EMAIL: &str = "blocks.email";
pub const BLOCKS_CAMPAIGN: &str = "blocks.campaign";

/// Filter over the typed canvas settings (`CanvasSettings`)
pub const CANVAS_SETTINGS: &str = "canvas.settings";

/// Filter over each block's markup (`String`); args carry the node
pub const HTML_BLOCK: &str = "html.block";

/// Filter over the concatenated block markup before the adapter wraps it
pub const HTML_BEFORE_WRAP: &str = "html.before_wrap";

/// Filter over the wrapped markup
pub const HTML_AFTER_WRAP: &str = "html.after_wrap";

/// Filter over the final document markup; args carry document and context
pub const HTML_GENERATED: &str = "html.generated";

/// Filter over campaign personalization values (`BTreeMap<String, String>`)
pub const PERSONALIZATION_TOKENS: &str = "personalization.tokens";

/// Action fired before any work on a render call
pub const RENDER_STARTED: &str = "render.started";

/// Action fired after `html.generated`
pub const RENDER_FINISHED: &str = "render.finished";

/// Action fired whenever a node renders as a placeholder
pub const BLOCK_FALLBACK: &str = "block.fallback";

/// Name of the block-list filter for a context
pub fn blocks_filter(context: ContextName) -> &'static str {
    match context {
        ContextName::Page => BLOCKS_PAGE,
        ContextName::Email => BLOCKS_EMAIL,
        ContextName::Campaign => BLOCKS_CAMPAIGN,
    }
}
