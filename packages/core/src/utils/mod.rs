//! Utility functions
//!
//! - `style` - style merge engine (inline styles, class lists)
//! - `html` - escaping helpers
//! - `markdown` - text block body conversion
//! - `personalization` - campaign token substitution

pub mod html;
pub mod markdown;
pub mod personalization;
pub mod style;

pub use markdown::render_text;
pub use personalization::substitute_tokens;
pub use style::{build_block_classes, layout_declarations, merge_styles};
