//! LaraBuilder Core Rendering Layer
//!
//! This crate turns LaraBuilder documents (a JSON tree of typed content
//! blocks) into markup for three output contexts: web pages, email and
//! personalized email campaigns.
//!
//! # Architecture
//!
//! - **Explicit services**: the block registry and hook dispatcher are built at
//!   boot and injected into the [`services::Renderer`]; there is no global state
//! - **Versioned blocks**: stored props are migrated to the current schema on
//!   a copy before rendering, so old documents keep working
//! - **Trait-based renderers**: every block type implements
//!   [`behaviors::BlockRenderer`] with one method per context
//! - **Graceful degradation**: a broken block becomes a placeholder and a
//!   diagnostic, never a failed render
//!
//! # Modules
//!
//! - [`models`] - Documents, block nodes, definitions, render contexts
//! - [`behaviors`] - `BlockRenderer` trait and the per-node `BlockContext`
//! - [`hooks`] - Actions and filters for extension modules
//! - [`services`] - Registry, migrations, orchestrator
//! - [`adapters`] - Page, email and campaign output
//! - [`blocks`] - Core block library
//! - [`utils`] - Style merging, escaping, markdown, personalization tokens

pub mod adapters;
pub mod behaviors;
pub mod blocks;
pub mod config;
pub mod hooks;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use behaviors::{BlockContext, BlockRenderer, BlockResult, ChildLayout, FnBlockRenderer};
pub use config::RenderConfig;
pub use hooks::{HookArgs, HookDispatcher, HookError, HookErrorPolicy, HookId};
pub use models::*;
pub use services::*;
