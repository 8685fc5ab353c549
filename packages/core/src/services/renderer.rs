//! Rendering Orchestrator
//!
//! Entry point of the pipeline: turns a [`Document`] into markup for one
//! render context.
//!
//! ## Pipeline
//!
//! ```text
//! Idle → Migrating → Rendering → Wrapping → Done
//! ```
//!
//! 1. `render.started` action, canvas settings built and passed through
//!    `canvas.settings`
//! 2. root block list resolved through `blocks.<context>`
//! 3. every node migrated to its definition's schema version (on a copy)
//! 4. every node rendered depth-first by the context adapter; each fragment
//!    goes through `html.block`
//! 5. fragments concatenated, post-processed by the adapter (campaign token
//!    substitution) and wrapped (`html.before_wrap` / `html.after_wrap`)
//! 6. `html.generated` over the final markup, then `render.finished`
//!
//! Nothing inside the tree walk is fatal. Unknown types, failing or panicking
//! renderers and missing context renderers each become a placeholder plus a
//! [`RenderDiagnostic`]; siblings render normally.
//!
//! ## Example
//!
//! ```rust
//! use larabuilder_core::blocks;
//! use larabuilder_core::hooks::HookDispatcher;
//! use larabuilder_core::models::Document;
//! use larabuilder_core::services::{BlockRegistry, Renderer};
//! use std::sync::Arc;
//!
//! let mut registry = BlockRegistry::new();
//! blocks::register_core_blocks(&mut registry).unwrap();
//! let renderer = Renderer::new(Arc::new(registry), Arc::new(HookDispatcher::new()));
//!
//! let document = Document::from_json_str(
//!     r#"{"blocks": [{"type": "heading", "props": {"text": "Hello", "level": 1}}]}"#,
//! )
//! .unwrap();
//!
//! let html = renderer.render(&document, "page").unwrap();
//! assert!(html.contains("<h1"));
//! assert!(html.contains("Hello"));
//! ```

use crate::adapters::{self, ContextAdapter};
use crate::behaviors::BlockContext;
use crate::config::RenderConfig;
use crate::hooks::{names, HookArgs, HookDispatcher, HookError};
use crate::models::definition::PROP_HIDDEN;
use crate::models::{
    BlockDefinition, BlockNode, BlockPath, BlockProps, CanvasSettings, Document, RenderContext,
};
use crate::services::block_registry::BlockRegistry;
use crate::services::collaborators::{
    BaseUrlMediaResolver, MediaResolver, TableTranslator, Translator,
};
use crate::services::error::{BlockError, RenderError};
use crate::services::migration::{self, MigratedProps};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Linear pipeline state, traced at debug level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPhase {
    Idle,
    Migrating,
    Rendering,
    Wrapping,
    Done,
}

impl RenderPhase {
    /// The phase after this one (`Done` is terminal)
    pub fn next(self) -> Self {
        match self {
            RenderPhase::Idle => RenderPhase::Migrating,
            RenderPhase::Migrating => RenderPhase::Rendering,
            RenderPhase::Rendering => RenderPhase::Wrapping,
            RenderPhase::Wrapping | RenderPhase::Done => RenderPhase::Done,
        }
    }

    fn advance(&mut self) {
        let next = self.next();
        tracing::debug!(from = %self, to = %next, "Render phase transition");
        *self = next;
    }
}

impl fmt::Display for RenderPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderPhase::Idle => "idle",
            RenderPhase::Migrating => "migrating",
            RenderPhase::Rendering => "rendering",
            RenderPhase::Wrapping => "wrapping",
            RenderPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Per-call render inputs that are not part of the document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Values for `{{ key }}` tokens (campaign context only)
    pub personalization: BTreeMap<String, String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one personalization value
    pub fn with_token(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.personalization.insert(key.into(), value.into());
        self
    }
}

/// Why a node degraded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Type is not registered; rendered as a placeholder
    UnknownType,
    /// Definition has no renderer for the context; rendered as a placeholder
    MissingContextRenderer { context: String },
    /// Renderer returned an error or panicked; rendered as a placeholder
    RendererFailed { reason: String },
    /// Migration chain stopped early; rendered best-effort
    MigrationIncomplete { reached: u32, target: u32 },
}

/// One degraded node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderDiagnostic {
    /// Dotted tree position, e.g. `0.2.1`
    pub path: String,
    pub block_type: String,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl RenderDiagnostic {
    /// Whether the node was replaced by a placeholder
    pub fn is_placeholder(&self) -> bool {
        !matches!(self.kind, DiagnosticKind::MigrationIncomplete { .. })
    }
}

impl fmt::Display for RenderDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.path, self.block_type)?;
        match &self.kind {
            DiagnosticKind::UnknownType => f.write_str("unknown block type"),
            DiagnosticKind::MissingContextRenderer { context } => {
                write!(f, "no {context} renderer")
            }
            DiagnosticKind::RendererFailed { reason } => write!(f, "renderer failed: {reason}"),
            DiagnosticKind::MigrationIncomplete { reached, target } => {
                write!(f, "migration stopped at v{reached} (schema v{target})")
            }
        }
    }
}

/// Markup plus everything that degraded while producing it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutput {
    pub html: String,
    pub diagnostics: Vec<RenderDiagnostic>,
}

/// A node paired with its definition and migrated props.
///
/// Built once per render before any markup is produced; borrows the stored
/// node and only owns props that a migration step actually rewrote.
#[derive(Debug)]
pub struct MigratedBlock<'a> {
    pub source: &'a BlockNode,
    pub path: BlockPath,
    /// `None` for unregistered types
    pub definition: Option<&'a BlockDefinition>,
    pub migrated: Option<MigratedProps<'a>>,
    pub children: Vec<MigratedBlock<'a>>,
}

impl MigratedBlock<'_> {
    /// Registered block whose `hidden` prop is `true`; renders nothing
    pub fn is_hidden(&self) -> bool {
        self.definition.is_some()
            && self
                .migrated
                .as_ref()
                .and_then(|m| m.props.get(PROP_HIDDEN))
                .and_then(Value::as_bool)
                .unwrap_or(false)
    }
}

fn migrate_nodes<'a>(
    registry: &'a BlockRegistry,
    nodes: &'a [BlockNode],
    parent: Option<&BlockPath>,
    diagnostics: &mut Vec<RenderDiagnostic>,
) -> Vec<MigratedBlock<'a>> {
    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let path = match parent {
                Some(parent) => parent.child(index),
                None => BlockPath::root(index),
            };
            let definition = registry.resolve(&node.block_type);
            let migrated = definition.map(|def| migration::migrate(def, node));

            if let Some(m) = migrated.as_ref().filter(|m| !m.is_current()) {
                diagnostics.push(RenderDiagnostic {
                    path: path.to_string(),
                    block_type: node.block_type.clone(),
                    kind: DiagnosticKind::MigrationIncomplete {
                        reached: m.version,
                        target: m.target_version,
                    },
                });
            }

            let children = migrate_nodes(registry, &node.children, Some(&path), diagnostics);
            MigratedBlock {
                source: node,
                path,
                definition,
                migrated,
                children,
            }
        })
        .collect()
}

/// State of one render call.
///
/// Lives on the stack of [`Renderer::render_with_report`]; block renderers
/// reach it through [`BlockContext`]. Interior mutability only covers data
/// collected during the walk (diagnostics, scoped page rules, the first hook
/// failure), so a session never leaves its thread.
pub struct RenderSession<'a> {
    registry: &'a BlockRegistry,
    hooks: &'a HookDispatcher,
    adapter: &'a dyn ContextAdapter,
    context: &'a RenderContext,
    canvas: &'a CanvasSettings,
    config: &'a RenderConfig,
    document: &'a Document,
    media: &'a dyn MediaResolver,
    translator: &'a dyn Translator,
    options: &'a RenderOptions,
    diagnostics: RefCell<Vec<RenderDiagnostic>>,
    scoped_rules: RefCell<Vec<String>>,
    hook_failure: RefCell<Option<HookError>>,
}

impl<'a> RenderSession<'a> {
    pub fn context(&self) -> &'a RenderContext {
        self.context
    }

    pub fn canvas(&self) -> &'a CanvasSettings {
        self.canvas
    }

    pub fn config(&self) -> &'a RenderConfig {
        self.config
    }

    pub fn document(&self) -> &'a Document {
        self.document
    }

    pub fn options(&self) -> &'a RenderOptions {
        self.options
    }

    pub fn adapter(&self) -> &'a dyn ContextAdapter {
        self.adapter
    }

    pub fn media(&self) -> &'a dyn MediaResolver {
        self.media
    }

    pub fn translator(&self) -> &'a dyn Translator {
        self.translator
    }

    /// Hook arguments carrying the document, context and canvas
    pub fn hook_args(&self) -> HookArgs<'a> {
        HookArgs {
            document: Some(self.document),
            node: None,
            context: Some(self.context),
            canvas: Some(self.canvas),
        }
    }

    /// Record a page CSS rule emitted into the canvas `<style>` block
    pub fn push_scoped_rule(&self, rule: String) {
        self.scoped_rules.borrow_mut().push(rule);
    }

    pub fn scoped_rules(&self) -> Vec<String> {
        self.scoped_rules.borrow().clone()
    }

    /// Run a filter inside the tree walk.
    ///
    /// A failure under the propagate policy is remembered and reported when
    /// the render finishes; the walk itself continues with the input value.
    pub fn apply_filter<T: Clone + 'static>(&self, name: &str, value: T, args: &HookArgs<'_>) -> T {
        if !self.hooks.has_filter(name) {
            return value;
        }
        let fallback = value.clone();
        match self
            .hooks
            .apply_filters_with(self.config.hook_error_policy, name, value, args)
        {
            Ok(filtered) => filtered,
            Err(e) => {
                self.record_hook_failure(e);
                fallback
            }
        }
    }

    fn do_action(&self, name: &str, args: &HookArgs<'_>) {
        if let Err(e) = self
            .hooks
            .do_action_with(self.config.hook_error_policy, name, args)
        {
            self.record_hook_failure(e);
        }
    }

    fn record_hook_failure(&self, error: HookError) {
        let mut slot = self.hook_failure.borrow_mut();
        if slot.is_none() {
            *slot = Some(error);
        }
    }

    /// Render nodes through the pipeline, preserving their order
    pub fn render_nodes(&self, nodes: &[MigratedBlock<'_>]) -> Vec<String> {
        nodes.iter().map(|block| self.render_node(block)).collect()
    }

    pub(crate) fn render_node(&self, block: &MigratedBlock<'_>) -> String {
        let args = HookArgs {
            node: Some(block.source),
            ..self.hook_args()
        };

        let html = match (block.definition, &block.migrated) {
            (Some(definition), Some(migrated)) => {
                if block.is_hidden() {
                    return String::new();
                }
                let props = definition.resolve_props(&migrated.props);

                let cx = BlockContext::new(self, block, definition, BlockProps::new(props));
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    self.adapter.render_block(self.registry, &cx)
                }));

                match outcome {
                    Ok(Ok(html)) => html,
                    Ok(Err(BlockError::MissingContextRenderer { context, .. })) => {
                        self.fallback(block, DiagnosticKind::MissingContextRenderer { context }, &args)
                    }
                    Ok(Err(e)) => self.fallback(
                        block,
                        DiagnosticKind::RendererFailed {
                            reason: e.to_string(),
                        },
                        &args,
                    ),
                    Err(_) => self.fallback(
                        block,
                        DiagnosticKind::RendererFailed {
                            reason: "renderer panicked".to_string(),
                        },
                        &args,
                    ),
                }
            }
            _ => self.fallback(block, DiagnosticKind::UnknownType, &args),
        };

        self.apply_filter(names::HTML_BLOCK, html, &args)
    }

    /// Placeholder for a node that could not render
    fn fallback(&self, block: &MigratedBlock<'_>, kind: DiagnosticKind, args: &HookArgs<'_>) -> String {
        let diagnostic = RenderDiagnostic {
            path: block.path.to_string(),
            block_type: block.source.block_type.clone(),
            kind,
        };
        tracing::warn!(
            block_type = diagnostic.block_type.as_str(),
            path = diagnostic.path.as_str(),
            context = self.context.name.as_str(),
            "Rendering placeholder: {}",
            diagnostic
        );
        self.diagnostics.borrow_mut().push(diagnostic);
        self.do_action(names::BLOCK_FALLBACK, args);

        self.adapter
            .placeholder(&block.source.block_type, &block.path, self.config, self.translator)
    }
}

/// Rendering orchestrator.
///
/// Holds the boot-time registry and hook dispatcher behind `Arc`s; a single
/// `Renderer` can serve concurrent renders from many threads.
pub struct Renderer {
    registry: Arc<BlockRegistry>,
    hooks: Arc<HookDispatcher>,
    config: RenderConfig,
    media: Arc<dyn MediaResolver>,
    custom_media: bool,
    translator: Arc<dyn Translator>,
}

impl Renderer {
    /// Create a renderer with the default configuration and collaborators.
    ///
    /// The hook error policy starts as the dispatcher's own.
    pub fn new(registry: Arc<BlockRegistry>, hooks: Arc<HookDispatcher>) -> Self {
        let config = RenderConfig {
            hook_error_policy: hooks.policy(),
            ..RenderConfig::default()
        };
        Self {
            registry,
            hooks,
            media: Arc::new(BaseUrlMediaResolver::new(&config.media_base_url)),
            custom_media: false,
            translator: Arc::new(TableTranslator::new()),
            config,
        }
    }

    /// Replace the configuration. Its `hook_error_policy` governs every hook
    /// this renderer calls, whatever policy the dispatcher was built with.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        if !self.custom_media {
            self.media = Arc::new(BaseUrlMediaResolver::new(&config.media_base_url));
        }
        self.config = config;
        self
    }

    pub fn with_media_resolver(mut self, media: Arc<dyn MediaResolver>) -> Self {
        self.media = media;
        self.custom_media = true;
        self
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &HookDispatcher {
        &self.hooks
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `document` for `context` (`page`, `email` or `campaign`)
    ///
    /// # Errors
    ///
    /// Only for an unknown context name, or a hook failure under the
    /// propagate policy. Block-level problems degrade to placeholders.
    pub fn render(&self, document: &Document, context: &str) -> Result<String, RenderError> {
        self.render_with(document, context, &RenderOptions::default())
    }

    /// Render with per-call options (campaign personalization)
    pub fn render_with(
        &self,
        document: &Document,
        context: &str,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        Ok(self.render_with_report(document, context, options)?.html)
    }

    /// Render a raw JSON document
    ///
    /// # Errors
    ///
    /// `RenderError::InvalidDocument` when the value is neither an object nor
    /// a legacy array of blocks.
    pub fn render_value(&self, document: &Value, context: &str) -> Result<String, RenderError> {
        let context: RenderContext = context.parse()?;
        let document = Document::from_value(document.clone())?;
        self.render(&document, context.name.as_str())
    }

    /// Render and return the diagnostics collected along the way
    pub fn render_with_report(
        &self,
        document: &Document,
        context: &str,
        options: &RenderOptions,
    ) -> Result<RenderOutput, RenderError> {
        let context: RenderContext = context.parse()?;
        let adapter = adapters::adapter_for(context.name);
        let mut phase = RenderPhase::Idle;
        let policy = self.config.hook_error_policy;

        let base_args = HookArgs {
            document: Some(document),
            context: Some(&context),
            ..HookArgs::default()
        };
        self.hooks.do_action_with(policy, names::RENDER_STARTED, &base_args)?;

        let mut canvas = CanvasSettings::from_props(
            &document.canvas_settings,
            self.config.default_email_width,
            self.config.max_email_width,
        );
        if !document.canvas_settings.contains_key("maxWidth") {
            canvas.max_width = self.config.page_max_width.clone();
        }
        let canvas = self.hooks.apply_filters_with(policy, names::CANVAS_SETTINGS, canvas, &base_args)?;
        let args = HookArgs {
            canvas: Some(&canvas),
            ..base_args
        };

        let blocks_filter = names::blocks_filter(context.name);
        let blocks: Cow<'_, [BlockNode]> = if self.hooks.has_filter(blocks_filter) {
            Cow::Owned(self.hooks.apply_filters_with(policy, blocks_filter, document.blocks.clone(), &args)?)
        } else {
            Cow::Borrowed(document.blocks.as_slice())
        };

        phase.advance();
        let mut diagnostics = Vec::new();
        let tree = migrate_nodes(&self.registry, &blocks, None, &mut diagnostics);

        let session = RenderSession {
            registry: &self.registry,
            hooks: &self.hooks,
            adapter,
            context: &context,
            canvas: &canvas,
            config: &self.config,
            document,
            media: self.media.as_ref(),
            translator: self.translator.as_ref(),
            options,
            diagnostics: RefCell::new(diagnostics),
            scoped_rules: RefCell::new(Vec::new()),
            hook_failure: RefCell::new(None),
        };

        phase.advance();
        let body = session.render_nodes(&tree).concat();
        let body = adapter.finish_blocks(body, &session);

        phase.advance();
        let wrapped = adapter.wrap(body, &session);

        if let Some(error) = session.hook_failure.into_inner() {
            return Err(error.into());
        }

        let html = self.hooks.apply_filters_with(policy, names::HTML_GENERATED, wrapped, &args)?;
        self.hooks.do_action_with(policy, names::RENDER_FINISHED, &args)?;
        phase.advance();

        let diagnostics = session.diagnostics.into_inner();
        tracing::debug!(
            context = context.name.as_str(),
            nodes = document.node_count(),
            degraded = diagnostics.len(),
            "Render complete"
        );

        Ok(RenderOutput { html, diagnostics })
    }
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod renderer_test;
