//! Document Data Structures
//!
//! A `Document` is the persisted unit the CRUD layer stores as an opaque JSON
//! blob: `{ blocks, canvasSettings, formatVersion }`.
//!
//! Two input shapes are accepted:
//!
//! - **Current**: a JSON object with the fields above
//! - **Legacy**: a bare array of blocks (format version 1, empty canvas)
//!
//! Anything else is rejected with [`DocumentError::InvalidShape`]. This is one
//! of the few fatal conditions in the rendering pipeline.

use crate::models::block::{BlockNode, Props};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Latest document format this crate writes
pub const CURRENT_FORMAT_VERSION: u32 = 2;

fn default_format_version() -> u32 {
    1
}

fn lenient_blocks<'de, D>(deserializer: D) -> Result<Vec<BlockNode>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => items.into_iter().map(BlockNode::from_value).collect(),
        _ => Vec::new(),
    })
}

fn lenient_canvas<'de, D>(deserializer: D) -> Result<Props, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Object(map) => map,
        _ => Props::new(),
    })
}

fn lenient_format_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or_else(default_format_version))
}

/// Errors raised while loading a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Document must be a JSON object or an array of blocks, got {0}")]
    InvalidShape(String),

    #[error("Document is not valid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Top-level persisted unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Root-level blocks in display order
    #[serde(default, deserialize_with = "lenient_blocks")]
    pub blocks: Vec<BlockNode>,

    /// Document-level settings consumed while wrapping output
    #[serde(default, deserialize_with = "lenient_canvas")]
    pub canvas_settings: Props,

    #[serde(
        default = "default_format_version",
        deserialize_with = "lenient_format_version"
    )]
    pub format_version: u32,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            blocks: Vec::new(),
            canvas_settings: Props::new(),
            format_version: CURRENT_FORMAT_VERSION,
        }
    }
}

impl Document {
    /// Create a document in the current format
    pub fn new(blocks: Vec<BlockNode>, canvas_settings: Props) -> Self {
        Self {
            blocks,
            canvas_settings,
            format_version: CURRENT_FORMAT_VERSION,
        }
    }

    /// Load a document from a parsed JSON value
    ///
    /// # Errors
    ///
    /// Returns `DocumentError::InvalidShape` for scalars and `null`.
    pub fn from_value(value: serde_json::Value) -> Result<Self, DocumentError> {
        match value {
            serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            serde_json::Value::Array(items) => Ok(Self {
                blocks: items.into_iter().map(BlockNode::from_value).collect(),
                canvas_settings: Props::new(),
                format_version: default_format_version(),
            }),
            other => Err(DocumentError::InvalidShape(json_kind(&other).to_string())),
        }
    }

    /// Parse a document from its stored JSON text
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Total number of nodes in the tree (all depths)
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[BlockNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.blocks)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
