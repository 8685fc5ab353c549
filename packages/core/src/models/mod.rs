//! Data Models
//!
//! This module contains the data structures of the block builder:
//!
//! - `BlockNode` / `Document` - the persisted JSON tree
//! - `BlockDefinition` / `PropsSchema` - registry entries built at boot
//! - `RenderContext` - output target and its feature set
//! - `CanvasSettings` - typed document-level settings

mod block;
mod canvas;
mod context;
pub mod definition;
mod document;
mod props;

pub use block::{BlockNode, BlockPath, Props};
pub use canvas::{CanvasSettings, DEFAULT_EMAIL_WIDTH};
pub use context::{ContextName, Feature, RenderContext, UnknownContextError};
pub use definition::{BlockDefinition, BlockDefinitionBuilder, MigrationStep, MigrationTransform};
pub use document::{Document, DocumentError, CURRENT_FORMAT_VERSION};
pub use props::{lenient, BlockProps, PropField, PropType, PropsSchema};
