//! Block Migration Engine
//!
//! Upgrades a node's stored props to its definition's current schema version
//! before rendering, using the definition's registered migration steps.
//!
//! ## Behavior
//!
//! - **Current nodes**: returned as a borrow of the stored props (no copy)
//! - **Chaining**: steps whose `from_version` matches the node's version are
//!   applied in sequence (v1→v2→v3) until the schema version is reached
//! - **Gaps**: when no step matches, migration stops at the version reached
//!   and the node renders best-effort with schema defaults filling the gaps
//! - **Failures**: a transform error stops migration the same way
//! - **Newer nodes**: a node above the schema version is left untouched
//!
//! The engine never mutates the document: it works on a copy that exists only
//! for the render call.

use crate::models::{BlockDefinition, BlockNode, Props};
use std::borrow::Cow;

/// Result of migrating one node
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedProps<'a> {
    pub props: Cow<'a, Props>,
    /// Version the props reached
    pub version: u32,
    /// Schema version of the definition
    pub target_version: u32,
}

impl MigratedProps<'_> {
    /// Whether the props reached the definition's schema version (or beyond)
    pub fn is_current(&self) -> bool {
        self.version >= self.target_version
    }
}

/// Migrate `node`'s props to `definition.schema_version`
pub fn migrate<'a>(definition: &BlockDefinition, node: &'a BlockNode) -> MigratedProps<'a> {
    let target = definition.schema_version;
    if node.version >= target {
        return MigratedProps {
            props: Cow::Borrowed(&node.props),
            version: node.version,
            target_version: target,
        };
    }

    let mut props: Cow<'a, Props> = Cow::Borrowed(&node.props);
    let mut version = node.version;

    // Every step advances the version, so the chain is at most one pass long
    for _ in 0..definition.migrations.len() {
        if version >= target {
            break;
        }
        let Some(step) = definition.migrations.iter().find(|s| s.from_version == version) else {
            break;
        };

        match (step.transform)(&props) {
            Ok(next) => {
                tracing::debug!(
                    block_type = definition.block_type.as_str(),
                    "Migrated props v{}→v{}",
                    step.from_version,
                    step.to_version
                );
                props = Cow::Owned(next);
                version = step.to_version;
            }
            Err(e) => {
                let e = e.at_step(&definition.block_type, step.from_version, step.to_version);
                tracing::warn!(block_type = definition.block_type.as_str(), "{}", e);
                break;
            }
        }
    }

    if version < target {
        tracing::warn!(
            block_type = definition.block_type.as_str(),
            "Migration stopped at v{} (schema v{}); rendering best-effort",
            version,
            target
        );
    }

    MigratedProps {
        props,
        version,
        target_version: target,
    }
}

/// Whether every step from `from_version` to `to_version` is registered
pub fn has_migration_path(definition: &BlockDefinition, from_version: u32, to_version: u32) -> bool {
    let mut current = from_version;
    while current < to_version {
        match definition.migrations.iter().find(|s| s.from_version == current) {
            Some(step) if step.to_version <= to_version => current = step.to_version,
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviors::FnBlockRenderer;
    use crate::models::MigrationTransform;
    use crate::services::error::MigrationError;
    use serde_json::json;

    fn props(value: serde_json::Value) -> Props {
        value.as_object().cloned().unwrap_or_default()
    }

    // v1→v2: rename `size` to `level`
    fn v1_to_v2(props: &Props) -> Result<Props, MigrationError> {
        let mut props = props.clone();
        if let Some(size) = props.remove("size") {
            props.insert("level".to_string(), size);
        }
        Ok(props)
    }

    // v2→v3: add `anchor`
    fn v2_to_v3(props: &Props) -> Result<Props, MigrationError> {
        let mut props = props.clone();
        props.insert("anchor".to_string(), json!(""));
        Ok(props)
    }

    fn failing(_: &Props) -> Result<Props, MigrationError> {
        Err(MigrationError::new("unsupported layout"))
    }

    fn definition(steps: Vec<(u32, u32, MigrationTransform)>, schema_version: u32) -> BlockDefinition {
        let mut builder = BlockDefinition::builder("heading", FnBlockRenderer::new()).schema_version(schema_version);
        for (from, to, transform) in steps {
            builder = builder.migration(from, to, transform);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_chained_migration_converges() {
        let def = definition(vec![(1, 2, v1_to_v2 as MigrationTransform), (2, 3, v2_to_v3 as MigrationTransform)], 3);
        let node = BlockNode::new("heading", props(json!({"size": 2, "text": "Hi"})));

        let migrated = migrate(&def, &node);

        assert_eq!(migrated.version, 3);
        assert!(migrated.is_current());
        assert_eq!(migrated.props["level"], 2);
        assert_eq!(migrated.props["anchor"], "");
        assert_eq!(migrated.props["text"], "Hi");
        // Stored node untouched
        assert!(node.props.contains_key("size"));
        assert_eq!(node.version, 1);
    }

    #[test]
    fn test_current_node_is_borrowed() {
        let def = definition(vec![(1, 2, v1_to_v2 as MigrationTransform), (2, 3, v2_to_v3 as MigrationTransform)], 3);
        let node = BlockNode::new("heading", props(json!({"level": 1}))).with_version(3);

        let migrated = migrate(&def, &node);

        match migrated.props {
            Cow::Borrowed(p) => assert!(std::ptr::eq(p, &node.props)),
            Cow::Owned(_) => panic!("current node should not be copied"),
        }
    }

    #[test]
    fn test_gap_stops_at_reached_version() {
        let def = definition(vec![(1, 2, v1_to_v2 as MigrationTransform)], 3);
        let node = BlockNode::new("heading", props(json!({"size": 4})));

        let migrated = migrate(&def, &node);

        assert_eq!(migrated.version, 2);
        assert!(!migrated.is_current());
        assert_eq!(migrated.props["level"], 4);
    }

    #[test]
    fn test_failed_step_keeps_previous_props() {
        let def = definition(vec![(1, 2, v1_to_v2 as MigrationTransform), (2, 3, failing as MigrationTransform)], 3);
        let node = BlockNode::new("heading", props(json!({"size": 4})));

        let migrated = migrate(&def, &node);

        assert_eq!(migrated.version, 2);
        assert_eq!(migrated.props["level"], 4);
        assert!(migrated.props.get("anchor").is_none());
    }

    #[test]
    fn test_newer_node_left_alone() {
        let def = definition(vec![(1, 2, v1_to_v2 as MigrationTransform)], 2);
        let node = BlockNode::new("heading", props(json!({"level": 1}))).with_version(5);

        let migrated = migrate(&def, &node);
        assert_eq!(migrated.version, 5);
        assert!(matches!(migrated.props, Cow::Borrowed(_)));
    }

    #[test]
    fn test_skip_version_step() {
        let def = definition(vec![(1, 3, v2_to_v3 as MigrationTransform)], 3);
        let node = BlockNode::new("heading", Props::new());

        let migrated = migrate(&def, &node);
        assert_eq!(migrated.version, 3);
    }

    #[test]
    fn test_has_migration_path() {
        let def = definition(vec![(1, 2, v1_to_v2 as MigrationTransform), (2, 3, v2_to_v3 as MigrationTransform)], 4);
        assert!(has_migration_path(&def, 1, 2));
        assert!(has_migration_path(&def, 1, 3));
        assert!(!has_migration_path(&def, 1, 4));
        assert!(has_migration_path(&def, 2, 2));
    }
}
