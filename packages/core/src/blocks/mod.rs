//! Core Block Library
//!
//! The block types every installation has. Each module defines the typed
//! props of one block, its renderer and its registry definition:
//!
//! | type        | schema | container | notes                                  |
//! |-------------|--------|-----------|----------------------------------------|
//! | `heading`   | v2     |           | v1 stored the level as `size`          |
//! | `text`      | v1     |           | html, markdown or plain content        |
//! | `image`     | v1     |           | media id or URL, optional link         |
//! | `button`    | v3     |           | v1 `link`, v2 `style`                  |
//! | `divider`   | v2     |           | v1 stored `borderWidth`                |
//! | `spacer`    | v1     |           |                                        |
//! | `columns`   | v1     | yes       | one child per column                   |
//! | `accordion` | v1     | yes       | one child per section                  |
//! | `video`     | v1     |           | thumbnail link in email                |
//! | `html`      | v1     |           | raw markup                             |
//!
//! Modules that ship their own blocks register them the same way, after
//! (or instead of) [`register_core_blocks`].

pub mod accordion;
pub mod button;
pub mod columns;
pub mod divider;
pub mod heading;
pub mod html;
pub mod image;
pub mod spacer;
pub mod text;
pub mod video;

use crate::models::BlockDefinition;
use crate::services::{BlockRegistry, RegistryError};
use serde_json::Value;

/// Register every core block type
///
/// # Errors
///
/// `RegistryError::DuplicateType` if one of the types is already registered.
pub fn register_core_blocks(registry: &mut BlockRegistry) -> Result<(), RegistryError> {
    let definitions: [fn() -> Result<BlockDefinition, RegistryError>; 10] = [
        heading::definition,
        text::definition,
        image::definition,
        button::definition,
        divider::definition,
        spacer::definition,
        columns::definition,
        accordion::definition,
        video::definition,
        html::definition,
    ];
    for definition in definitions {
        registry.register(definition()?)?;
    }
    tracing::debug!(count = registry.len(), "Registered core blocks");
    Ok(())
}

/// Media references are ids or URLs; anything else counts as empty
pub(crate) fn has_media(reference: &Value) -> bool {
    match reference {
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(_) => true,
        Value::Object(map) => map.contains_key("url") || map.contains_key("id"),
        _ => false,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_core_blocks() {
        let mut registry = BlockRegistry::new();
        register_core_blocks(&mut registry).unwrap();

        assert_eq!(
            registry.block_types(),
            vec![
                "accordion", "button", "columns", "divider", "heading", "html", "image", "spacer",
                "text", "video"
            ]
        );
        assert!(registry.resolve("columns").unwrap().supports("children"));

        // Registering twice is rejected
        assert!(register_core_blocks(&mut registry).is_err());
    }

    #[test]
    fn test_has_media() {
        assert!(has_media(&json!(12)));
        assert!(has_media(&json!("https://cdn.test/a.png")));
        assert!(has_media(&json!({"id": 3})));
        assert!(!has_media(&json!("  ")));
        assert!(!has_media(&json!(null)));
    }
}
