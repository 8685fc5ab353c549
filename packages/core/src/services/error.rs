//! Service Layer Error Types
//!
//! This module defines the error types of the rendering pipeline.
//!
//! Only [`RenderError`] ever reaches the caller of `render`. Everything else
//! is raised and absorbed inside the tree walk: a failing block or migration
//! degrades to a placeholder and a diagnostic, never to a failed render.

use crate::hooks::HookError;
use crate::models::{DocumentError, UnknownContextError};
use thiserror::Error;

/// Fatal render errors (orchestration-level misuse)
#[derive(Error, Debug)]
pub enum RenderError {
    /// Context name is not page, email or campaign
    #[error("Invalid render context: {0}")]
    InvalidContext(#[from] UnknownContextError),

    /// Input is not a document
    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] DocumentError),

    /// A hook callback failed under the `propagate` policy
    #[error("Hook failed: {0}")]
    Hook(#[from] HookError),
}

/// Block registration errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Type already registered and replacement was not requested
    #[error("Block type already registered: {block_type}")]
    DuplicateType { block_type: String },

    /// Definition failed validation
    #[error("Invalid block definition '{block_type}': {reason}")]
    InvalidDefinition { block_type: String, reason: String },
}

impl RegistryError {
    /// Create a duplicate type error
    pub fn duplicate_type(block_type: impl Into<String>) -> Self {
        Self::DuplicateType {
            block_type: block_type.into(),
        }
    }

    /// Create an invalid definition error
    pub fn invalid_definition(block_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            block_type: block_type.into(),
            reason: reason.into(),
        }
    }
}

/// Errors a block renderer may return; the orchestrator turns them into
/// placeholders.
#[derive(Error, Debug)]
pub enum BlockError {
    /// Props could not be decoded into the renderer's typed props
    #[error("Invalid props: {0}")]
    InvalidProps(#[from] serde_json::Error),

    /// Definition has no renderer for the requested context
    #[error("No {context} renderer for block type '{block_type}'")]
    MissingContextRenderer { block_type: String, context: String },

    /// Renderer-specific failure
    #[error("Render failed: {0}")]
    Failed(String),
}

impl BlockError {
    /// Create a missing context renderer error
    pub fn missing_context_renderer(block_type: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingContextRenderer {
            block_type: block_type.into(),
            context: context.into(),
        }
    }

    /// Create a generic render failure
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Migration transform failure
#[derive(Error, Debug)]
#[error("Migration {block_type} v{from_version}→v{to_version} failed: {reason}")]
pub struct MigrationError {
    pub block_type: String,
    pub from_version: u32,
    pub to_version: u32,
    pub reason: String,
}

impl MigrationError {
    /// Error raised from inside a transform; the engine fills in type and versions
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            block_type: String::new(),
            from_version: 0,
            to_version: 0,
            reason: reason.into(),
        }
    }

    pub(crate) fn at_step(mut self, block_type: &str, from_version: u32, to_version: u32) -> Self {
        self.block_type = block_type.to_string();
        self.from_version = from_version;
        self.to_version = to_version;
        self
    }
}
