use crate::config::RenderConfig;
use crate::models::{BlockDefinition, BlockPath, BlockProps, CanvasSettings, RenderContext};
use crate::services::error::BlockError;
use crate::services::renderer::{MigratedBlock, RenderSession};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// How a container lays out its rendered children
#[derive(Debug, Clone, PartialEq)]
pub enum ChildLayout {
    /// Side by side; widths are percentages, one per child
    Columns { widths: Vec<f64>, gap: u32 },
    /// One below the other
    Stack { gap: u32 },
}

/// What a renderer sees while rendering one node.
///
/// Props are already migrated and resolved against the schema, so every
/// declared prop is present with its declared type.
pub struct BlockContext<'r> {
    session: &'r RenderSession<'r>,
    block: &'r MigratedBlock<'r>,
    definition: &'r BlockDefinition,
    props: BlockProps,
}

impl<'r> BlockContext<'r> {
    pub(crate) fn new(
        session: &'r RenderSession<'r>,
        block: &'r MigratedBlock<'r>,
        definition: &'r BlockDefinition,
        props: BlockProps,
    ) -> Self {
        Self {
            session,
            block,
            definition,
            props,
        }
    }

    pub(crate) fn session(&self) -> &'r RenderSession<'r> {
        self.session
    }

    pub fn block_type(&self) -> &str {
        &self.block.source.block_type
    }

    pub fn path(&self) -> &BlockPath {
        &self.block.path
    }

    pub fn props(&self) -> &BlockProps {
        &self.props
    }

    /// Decode the resolved props into a typed struct.
    ///
    /// Props the struct rejects fall back to their schema defaults.
    pub fn decode_props<T: DeserializeOwned>(&self) -> Result<T, BlockError> {
        Ok(self.props.decode_with_defaults(&self.definition.props_schema)?)
    }

    pub fn definition(&self) -> &BlockDefinition {
        self.definition
    }

    pub fn context(&self) -> &RenderContext {
        self.session.context()
    }

    pub fn canvas(&self) -> &CanvasSettings {
        self.session.canvas()
    }

    pub fn config(&self) -> &RenderConfig {
        self.session.config()
    }

    /// Child nodes (container types), in document order
    pub fn children(&self) -> &[MigratedBlock<'r>] {
        &self.block.children
    }

    /// Children that produce output, in document order
    pub fn visible_children(&self) -> impl Iterator<Item = &MigratedBlock<'r>> + '_ {
        self.block.children.iter().filter(|child| !child.is_hidden())
    }

    /// Render every visible child through the pipeline, in document order
    pub fn render_children(&self) -> Vec<String> {
        self.visible_children()
            .map(|child| self.session.render_node(child))
            .collect()
    }

    /// Render the children and lay them out the way the current context needs.
    ///
    /// Hidden children take no column; their widths are dropped with them.
    pub fn layout_children(&self, layout: &ChildLayout) -> String {
        let layout = match layout {
            ChildLayout::Columns { widths, gap } => ChildLayout::Columns {
                widths: self.visible_widths(widths),
                gap: *gap,
            },
            other => other.clone(),
        };
        self.arrange(self.render_children(), &layout)
    }

    /// Widths of the visible children; widths that do not line up one per
    /// child are discarded so the row splits evenly
    fn visible_widths(&self, widths: &[f64]) -> Vec<f64> {
        let children = &self.block.children;
        if widths.len() != children.len() {
            return Vec::new();
        }
        children
            .iter()
            .zip(widths)
            .filter(|(child, _)| !child.is_hidden())
            .map(|(_, width)| *width)
            .collect()
    }

    /// Lay out fragments the container built itself (e.g. titled sections)
    pub fn arrange(&self, items: Vec<String>, layout: &ChildLayout) -> String {
        self.session.adapter().layout_children(self, items, layout)
    }

    /// Attributes carrying this block's classes and styles, with a leading
    /// space (empty when there is nothing to emit).
    ///
    /// `block_styles` are the type's computed declarations; layout styles and
    /// `customCSS` are merged around them by the active adapter.
    pub fn element_attributes(&self, block_styles: &str) -> String {
        self.session.adapter().element_attributes(self, block_styles)
    }

    pub fn media_url(&self, reference: &Value) -> String {
        self.session.media().resolve_media_url(reference)
    }

    pub fn translate(&self, key: &str) -> String {
        self.session.translator().translate(key)
    }
}
