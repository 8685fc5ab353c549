//! Rendering Services
//!
//! This module contains the stateful and orchestrating parts of the pipeline:
//!
//! - `BlockRegistry` - block type definitions, populated at boot
//! - `migration` - upgrades stored props to the current schema version
//! - `Renderer` - the render entry point and per-call `RenderSession`
//! - `collaborators` - media resolution and translation interfaces
//!
//! Services are built once and shared read-only; every render works on its
//! own migrated copy of the document.

pub mod block_registry;
pub mod collaborators;
pub mod error;
pub mod migration;
pub mod renderer;

pub use block_registry::{BlockRegistry, ContextRenderer};
pub use collaborators::{BaseUrlMediaResolver, MediaResolver, TableTranslator, Translator};
pub use error::{BlockError, MigrationError, RegistryError, RenderError};
pub use migration::{has_migration_path, migrate, MigratedProps};
pub use renderer::{
    DiagnosticKind, MigratedBlock, RenderDiagnostic, RenderOptions, RenderOutput, RenderPhase,
    RenderSession, Renderer,
};
