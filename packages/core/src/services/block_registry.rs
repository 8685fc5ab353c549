//! Block Schema Registry
//!
//! Maps block type identifiers to their [`BlockDefinition`]. Definitions are
//! registered once during boot (`&mut self`); the registry is then shared
//! read-only by every render.
//!
//! ## Example Usage
//!
//! ```rust
//! use larabuilder_core::blocks;
//! use larabuilder_core::models::ContextName;
//! use larabuilder_core::services::BlockRegistry;
//!
//! let mut registry = BlockRegistry::new();
//! blocks::register_core_blocks(&mut registry).unwrap();
//!
//! assert!(registry.resolve("heading").is_some());
//! assert!(registry.get_renderer("divider", ContextName::Email).is_some());
//! assert!(registry.resolve("carousel").is_none());
//! ```

use crate::behaviors::{BlockContext, BlockResult};
use crate::models::{BlockDefinition, ContextName};
use crate::services::error::RegistryError;
use std::collections::HashMap;

/// A definition's renderer bound to one context
#[derive(Clone, Copy)]
pub struct ContextRenderer<'a> {
    definition: &'a BlockDefinition,
    context: ContextName,
}

impl<'a> ContextRenderer<'a> {
    pub fn context(&self) -> ContextName {
        self.context
    }

    pub fn definition(&self) -> &'a BlockDefinition {
        self.definition
    }

    /// Invoke the renderer method for the bound context
    pub fn render(&self, cx: &BlockContext<'_>) -> BlockResult {
        let renderer = self.definition.renderer();
        match self.context {
            ContextName::Page => renderer.render_page(cx),
            ContextName::Email => renderer.render_email(cx),
            ContextName::Campaign => renderer.render_campaign(cx),
        }
    }
}

/// Registry of block definitions keyed by type
#[derive(Default)]
pub struct BlockRegistry {
    definitions: HashMap<String, BlockDefinition>,
}

impl BlockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new block type
    ///
    /// # Errors
    ///
    /// `RegistryError::DuplicateType` if the type is already registered; use
    /// [`BlockRegistry::replace`] to override a definition deliberately.
    pub fn register(&mut self, definition: BlockDefinition) -> Result<(), RegistryError> {
        if self.definitions.contains_key(&definition.block_type) {
            return Err(RegistryError::duplicate_type(&definition.block_type));
        }
        tracing::debug!(
            block_type = definition.block_type.as_str(),
            schema_version = definition.schema_version,
            "Registered block type"
        );
        self.definitions.insert(definition.block_type.clone(), definition);
        Ok(())
    }

    /// Register or override a block type, returning the previous definition
    pub fn replace(&mut self, definition: BlockDefinition) -> Option<BlockDefinition> {
        let previous = self.definitions.insert(definition.block_type.clone(), definition);
        if let Some(previous) = &previous {
            tracing::info!(block_type = previous.block_type.as_str(), "Replaced block definition");
        }
        previous
    }

    /// Remove a block type
    pub fn unregister(&mut self, block_type: &str) -> Option<BlockDefinition> {
        self.definitions.remove(block_type)
    }

    pub fn resolve(&self, block_type: &str) -> Option<&BlockDefinition> {
        self.definitions.get(block_type)
    }

    /// Renderer for `block_type` in `context`, if the type exists and its
    /// renderer covers that context
    pub fn get_renderer(&self, block_type: &str, context: ContextName) -> Option<ContextRenderer<'_>> {
        let definition = self.definitions.get(block_type)?;
        definition
            .renderer()
            .supports_context(context)
            .then_some(ContextRenderer { definition, context })
    }

    pub fn contains(&self, block_type: &str) -> bool {
        self.definitions.contains_key(block_type)
    }

    /// Registered types in sorted order
    pub fn block_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.definitions.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
