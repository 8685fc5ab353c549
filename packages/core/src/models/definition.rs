//! Block Definitions
//!
//! A `BlockDefinition` is the registry entry for one block type: its prop
//! schema, capability flags, current schema version, migrations and renderer.
//! Definitions are built once at boot and never persisted.
//!
//! # Example
//!
//! ```rust
//! use larabuilder_core::behaviors::FnBlockRenderer;
//! use larabuilder_core::models::{BlockDefinition, PropType};
//! use serde_json::json;
//!
//! let renderer = FnBlockRenderer::new()
//!     .page(|cx| Ok(format!("<p{}>{}</p>", cx.element_attributes(""), cx.props().str("text"))))
//!     .email(|cx| Ok(format!("<p{}>{}</p>", cx.element_attributes(""), cx.props().str("text"))));
//!
//! let definition = BlockDefinition::builder("note", renderer)
//!     .schema_version(2)
//!     .prop("text", PropType::String, json!(""))
//!     .supports("spacing")
//!     .migration(1, 2, |props| {
//!         let mut props = props.clone();
//!         if let Some(body) = props.remove("body") {
//!             props.insert("text".to_string(), body);
//!         }
//!         Ok(props)
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(definition.schema_version, 2);
//! assert!(definition.supports("spacing"));
//! ```

use crate::behaviors::BlockRenderer;
use crate::models::block::Props;
use crate::models::props::{PropField, PropType, PropsSchema};
use crate::services::error::{MigrationError, RegistryError};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Shared prop: margin/padding/alignment applied to every block
pub const PROP_LAYOUT_STYLES: &str = "layoutStyles";
/// Shared prop: free-text CSS appended after computed styles
pub const PROP_CUSTOM_CSS: &str = "customCSS";
/// Shared prop: extra class for page output
pub const PROP_CUSTOM_CLASS: &str = "customClass";
/// Shared prop: hidden blocks render nothing
pub const PROP_HIDDEN: &str = "hidden";

/// Capability flag for types that render children
pub const SUPPORTS_CHILDREN: &str = "children";

/// Pure transform upgrading props by one step
pub type MigrationTransform = fn(&Props) -> Result<Props, MigrationError>;

/// One registered migration step
#[derive(Clone)]
pub struct MigrationStep {
    pub from_version: u32,
    pub to_version: u32,
    pub transform: MigrationTransform,
}

impl fmt::Debug for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MigrationStep")
            .field("from_version", &self.from_version)
            .field("to_version", &self.to_version)
            .finish()
    }
}

/// Registry entry for a block type
#[derive(Clone)]
pub struct BlockDefinition {
    pub block_type: String,
    pub schema_version: u32,
    pub props_schema: PropsSchema,
    pub supports: BTreeSet<String>,
    pub migrations: Vec<MigrationStep>,
    renderer: Arc<dyn BlockRenderer>,
}

impl fmt::Debug for BlockDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockDefinition")
            .field("block_type", &self.block_type)
            .field("schema_version", &self.schema_version)
            .field("props_schema", &self.props_schema)
            .field("supports", &self.supports)
            .field("migrations", &self.migrations)
            .finish_non_exhaustive()
    }
}

impl BlockDefinition {
    /// Start building a definition for `block_type`
    pub fn builder(block_type: impl Into<String>, renderer: impl BlockRenderer + 'static) -> BlockDefinitionBuilder {
        BlockDefinitionBuilder {
            block_type: block_type.into(),
            schema_version: 1,
            props_schema: PropsSchema::new(),
            supports: BTreeSet::new(),
            migrations: Vec::new(),
            renderer: Arc::new(renderer),
        }
    }

    pub fn renderer(&self) -> &dyn BlockRenderer {
        self.renderer.as_ref()
    }

    pub fn supports(&self, flag: &str) -> bool {
        self.supports.contains(flag)
    }

    /// Canonical props for rendering (see [`PropsSchema::resolve`])
    pub fn resolve_props(&self, stored: &Props) -> Props {
        self.props_schema.resolve(stored)
    }
}

/// Fluent builder for [`BlockDefinition`]
pub struct BlockDefinitionBuilder {
    block_type: String,
    schema_version: u32,
    props_schema: PropsSchema,
    supports: BTreeSet<String>,
    migrations: Vec<MigrationStep>,
    renderer: Arc<dyn BlockRenderer>,
}

impl BlockDefinitionBuilder {
    pub fn schema_version(mut self, version: u32) -> Self {
        self.schema_version = version;
        self
    }

    /// Declare a prop with its type and default
    pub fn prop(mut self, name: impl Into<String>, prop_type: PropType, default: Value) -> Self {
        self.props_schema.insert(name, PropField::new(prop_type, default));
        self
    }

    /// Add a capability flag
    pub fn supports(mut self, flag: impl Into<String>) -> Self {
        self.supports.insert(flag.into());
        self
    }

    /// Register a migration step; steps are tried in registration order
    pub fn migration(mut self, from_version: u32, to_version: u32, transform: MigrationTransform) -> Self {
        self.migrations.push(MigrationStep {
            from_version,
            to_version,
            transform,
        });
        self
    }

    /// Validate and finish the definition.
    ///
    /// The shared props (`layoutStyles`, `customCSS`, `customClass`, `hidden`)
    /// are declared here unless the builder already declared them.
    ///
    /// # Errors
    ///
    /// `RegistryError::InvalidDefinition` for an empty type, a zero schema
    /// version, or a migration step that does not move forward.
    pub fn build(mut self) -> Result<BlockDefinition, RegistryError> {
        if self.block_type.trim().is_empty() {
            return Err(RegistryError::invalid_definition(&self.block_type, "block type is empty"));
        }
        if self.schema_version == 0 {
            return Err(RegistryError::invalid_definition(&self.block_type, "schema version must be at least 1"));
        }
        for step in &self.migrations {
            if step.to_version <= step.from_version {
                return Err(RegistryError::invalid_definition(
                    &self.block_type,
                    format!(
                        "migration {}→{} does not advance the version",
                        step.from_version, step.to_version
                    ),
                ));
            }
            if step.to_version > self.schema_version {
                return Err(RegistryError::invalid_definition(
                    &self.block_type,
                    format!(
                        "migration {}→{} targets a version above schema version {}",
                        step.from_version, step.to_version, self.schema_version
                    ),
                ));
            }
        }

        let shared = [
            (PROP_LAYOUT_STYLES, PropType::Object, json!({})),
            (PROP_CUSTOM_CSS, PropType::String, json!("")),
            (PROP_CUSTOM_CLASS, PropType::String, json!("")),
            (PROP_HIDDEN, PropType::Boolean, json!(false)),
        ];
        for (name, prop_type, default) in shared {
            if !self.props_schema.contains(name) {
                self.props_schema.insert(name, PropField::new(prop_type, default));
            }
        }

        Ok(BlockDefinition {
            block_type: self.block_type,
            schema_version: self.schema_version,
            props_schema: self.props_schema,
            supports: self.supports,
            migrations: self.migrations,
            renderer: self.renderer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::FnBlockRenderer;

    fn identity(props: &Props) -> Result<Props, MigrationError> {
        Ok(props.clone())
    }

    #[test]
    fn test_shared_props_declared() {
        let def = BlockDefinition::builder("x", FnBlockRenderer::new()).build().unwrap();
        assert!(def.props_schema.contains(PROP_LAYOUT_STYLES));
        assert!(def.props_schema.contains(PROP_CUSTOM_CSS));
        assert!(def.props_schema.contains(PROP_CUSTOM_CLASS));
        assert!(def.props_schema.contains(PROP_HIDDEN));
        assert_eq!(def.schema_version, 1);
    }

    #[test]
    fn test_rejects_empty_type() {
        let err = BlockDefinition::builder("  ", FnBlockRenderer::new()).build().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidDefinition { .. }));
    }

    #[test]
    fn test_rejects_backward_migration() {
        let err = BlockDefinition::builder("x", FnBlockRenderer::new())
            .schema_version(3)
            .migration(2, 1, identity)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("does not advance"));
    }

    #[test]
    fn test_rejects_migration_past_schema_version() {
        let err = BlockDefinition::builder("x", FnBlockRenderer::new())
            .schema_version(2)
            .migration(2, 3, identity)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("above schema version"));
    }

    #[test]
    fn test_resolve_props_applies_shared_defaults() {
        let def = BlockDefinition::builder("x", FnBlockRenderer::new()).build().unwrap();
        let resolved = def.resolve_props(&Props::new());
        assert_eq!(resolved[PROP_CUSTOM_CSS], "");
        assert_eq!(resolved[PROP_LAYOUT_STYLES], json!({}));
    }
}
