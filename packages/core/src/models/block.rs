//! Block Node Data Structures
//!
//! A `BlockNode` is one typed unit of content in a LaraBuilder document tree.
//! Container types (columns, accordion) carry ordered `children`; every other
//! type leaves `children` empty.
//!
//! # Examples
//!
//! ```rust
//! use larabuilder_core::models::BlockNode;
//! use serde_json::json;
//!
//! let node: BlockNode = serde_json::from_value(json!({
//!     "type": "heading",
//!     "props": { "text": "Welcome", "level": 1 }
//! }))
//! .unwrap();
//!
//! // Legacy nodes without a version are treated as version 1
//! assert_eq!(node.version, 1);
//! assert!(node.children.is_empty());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Block configuration as stored in the document (free-form key/value map)
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Default schema version for nodes persisted before versioning existed
fn default_version() -> u32 {
    1
}

/// Accept any JSON for `props`; anything but an object becomes an empty map.
fn lenient_props<'de, D>(deserializer: D) -> Result<Props, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    })
}

/// Accept integers (or integer strings); anything else is version 1.
fn lenient_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let version = match &value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(version.filter(|v| *v > 0).unwrap_or_else(default_version))
}

/// Accept a `type` string; anything else becomes the empty (unresolvable) type.
fn lenient_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        _ => String::new(),
    })
}

/// Accept an array of nodes; anything else is an empty child list.
fn lenient_children<'de, D>(deserializer: D) -> Result<Vec<BlockNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items.into_iter().map(BlockNode::from_value).collect(),
        _ => Vec::new(),
    })
}

/// A node in the document tree.
///
/// Deserialization never fails for a JSON object: malformed fields degrade to
/// their defaults so that one bad node cannot prevent a document from loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockNode {
    /// Registry key (e.g. "heading", "columns")
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub block_type: String,

    /// Block configuration, validated against the registry schema at render time
    #[serde(default, deserialize_with = "lenient_props")]
    pub props: Props,

    /// Ordered children (container types only)
    #[serde(
        default,
        deserialize_with = "lenient_children",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<BlockNode>,

    /// Schema version the props were authored against
    #[serde(default = "default_version", deserialize_with = "lenient_version")]
    pub version: u32,
}

impl BlockNode {
    /// Create a version-1 node with the given type and props
    pub fn new(block_type: impl Into<String>, props: Props) -> Self {
        Self {
            block_type: block_type.into(),
            props,
            children: Vec::new(),
            version: default_version(),
        }
    }

    /// Set the schema version the props were authored against
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Append children (container types)
    pub fn with_children(mut self, children: Vec<BlockNode>) -> Self {
        self.children = children;
        self
    }

    /// Build a node from arbitrary JSON.
    ///
    /// Non-object values produce a node with an empty type, which renders as
    /// a placeholder.
    pub fn from_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => {
                serde_json::from_value(value).unwrap_or_else(|_| Self::new("", Props::new()))
            }
            _ => Self::new("", Props::new()),
        }
    }

    /// Whether this node has children to render
    pub fn is_container(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Position of a node in the tree, e.g. `0.2.1` for the second child of the
/// third child of the first root block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockPath(Vec<usize>);

impl BlockPath {
    pub fn root(index: usize) -> Self {
        Self(vec![index])
    }

    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Identifier safe for use in HTML `id` attributes (`lb-0-2-1`)
    pub fn dom_id(&self) -> String {
        let joined: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        format!("lb-{}", joined.join("-"))
    }
}

impl fmt::Display for BlockPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        f.write_str(&joined.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_version_defaults_to_one() {
        let node: BlockNode = serde_json::from_value(json!({"type": "text", "props": {}})).unwrap();
        assert_eq!(node.version, 1);
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let node: BlockNode = serde_json::from_value(json!({
            "type": 42,
            "props": "oops",
            "children": {"not": "a list"},
            "version": "three"
        }))
        .unwrap();

        assert_eq!(node.block_type, "");
        assert!(node.props.is_empty());
        assert!(node.children.is_empty());
        assert_eq!(node.version, 1);
    }

    #[test]
    fn test_string_version_is_parsed() {
        let node: BlockNode = serde_json::from_value(json!({"type": "text", "version": "3"})).unwrap();
        assert_eq!(node.version, 3);
    }

    #[test]
    fn test_children_order_preserved() {
        let node: BlockNode = serde_json::from_value(json!({
            "type": "columns",
            "children": [
                {"type": "text", "props": {"content": "a"}},
                "garbage",
                {"type": "image"}
            ]
        }))
        .unwrap();

        let types: Vec<&str> = node.children.iter().map(|c| c.block_type.as_str()).collect();
        assert_eq!(types, vec!["text", "", "image"]);
    }

    #[test]
    fn test_serialization_omits_empty_children() {
        let node = BlockNode::new("divider", Props::new());
        let value = serde_json::to_value(&node).unwrap();
        assert!(value.get("children").is_none());
        assert_eq!(value["type"], "divider");
    }

    #[test]
    fn test_block_path_formats() {
        let path = BlockPath::root(0).child(2).child(1);
        assert_eq!(path.to_string(), "0.2.1");
        assert_eq!(path.dom_id(), "lb-0-2-1");
        assert_eq!(path.depth(), 3);
    }
}
