//! Block Renderer System
//!
//! This module provides the trait-based renderer system for block types:
//!
//! - `BlockRenderer` trait - one method per output context
//! - `FnBlockRenderer` - closure-backed renderer for modules that register
//!   blocks without defining a type
//! - `BlockContext` - everything a renderer may read while rendering one node
//!
//! `page` and `email` are required methods, so every Rust renderer covers both
//! contexts at compile time. `campaign` defaults to the email output.

mod block_context;

pub use block_context::{BlockContext, ChildLayout};

use crate::models::ContextName;
use crate::services::error::BlockError;
use std::sync::Arc;

/// Result of rendering one block
pub type BlockResult = Result<String, BlockError>;

/// Context-specific markup generation for one block type
pub trait BlockRenderer: Send + Sync {
    /// Page output: classes, responsive layout, native media
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult;

    /// Email output: inline styles, table layout
    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult;

    /// Campaign output; same markup as email unless overridden
    fn render_campaign(&self, cx: &BlockContext<'_>) -> BlockResult {
        self.render_email(cx)
    }

    /// Whether this renderer produces output for `context`
    fn supports_context(&self, context: ContextName) -> bool {
        let _ = context;
        true
    }
}

type RenderFn = Arc<dyn Fn(&BlockContext<'_>) -> BlockResult + Send + Sync>;

/// Renderer assembled from closures.
///
/// Contexts without a closure are reported as unsupported; the pipeline then
/// falls back (campaign to email, anything else to a placeholder).
#[derive(Clone, Default)]
pub struct FnBlockRenderer {
    page: Option<RenderFn>,
    email: Option<RenderFn>,
    campaign: Option<RenderFn>,
}

impl FnBlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlockContext<'_>) -> BlockResult + Send + Sync + 'static,
    {
        self.page = Some(Arc::new(f));
        self
    }

    pub fn email<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlockContext<'_>) -> BlockResult + Send + Sync + 'static,
    {
        self.email = Some(Arc::new(f));
        self
    }

    pub fn campaign<F>(mut self, f: F) -> Self
    where
        F: Fn(&BlockContext<'_>) -> BlockResult + Send + Sync + 'static,
    {
        self.campaign = Some(Arc::new(f));
        self
    }

    fn call(&self, f: &Option<RenderFn>, cx: &BlockContext<'_>, context: ContextName) -> BlockResult {
        match f {
            Some(f) => f(cx),
            None => Err(BlockError::missing_context_renderer(cx.block_type(), context.as_str())),
        }
    }
}

impl BlockRenderer for FnBlockRenderer {
    fn render_page(&self, cx: &BlockContext<'_>) -> BlockResult {
        self.call(&self.page, cx, ContextName::Page)
    }

    fn render_email(&self, cx: &BlockContext<'_>) -> BlockResult {
        self.call(&self.email, cx, ContextName::Email)
    }

    fn render_campaign(&self, cx: &BlockContext<'_>) -> BlockResult {
        match &self.campaign {
            Some(f) => f(cx),
            None => self.call(&self.email, cx, ContextName::Campaign),
        }
    }

    fn supports_context(&self, context: ContextName) -> bool {
        match context {
            ContextName::Page => self.page.is_some(),
            ContextName::Email => self.email.is_some(),
            ContextName::Campaign => self.campaign.is_some() || self.email.is_some(),
        }
    }
}
