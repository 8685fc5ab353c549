//! External collaborators called from block renderers
//!
//! - `MediaResolver` turns a media id or URL stored in props into a URL
//! - `Translator` looks up UI strings authored by block code
//!
//! Both are synchronous and only ever called from inside `render_block`
//! implementations.

use serde_json::Value;
use std::collections::HashMap;

/// Resolve media references (`42`, `"42"`, `"https://…"`) to URLs
pub trait MediaResolver: Send + Sync {
    fn resolve_media_url(&self, reference: &Value) -> String;
}

/// Look up translated UI strings
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str) -> String;
}

/// Default resolver: URLs pass through, numeric ids map to `<base>/<id>`
#[derive(Debug, Clone)]
pub struct BaseUrlMediaResolver {
    base_url: String,
}

impl BaseUrlMediaResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl MediaResolver for BaseUrlMediaResolver {
    fn resolve_media_url(&self, reference: &Value) -> String {
        match reference {
            Value::Number(id) => format!("{}/{}", self.base_url, id),
            Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
                format!("{}/{}", self.base_url, s)
            }
            Value::String(s) => s.trim().to_string(),
            Value::Object(map) => map
                .get("url")
                .or_else(|| map.get("id"))
                .map(|inner| self.resolve_media_url(inner))
                .unwrap_or_default(),
            _ => String::new(),
        }
    }
}

/// Translator backed by a key/value table; unknown keys fall back to the
/// built-in English strings, then to the key itself.
#[derive(Debug, Clone, Default)]
pub struct TableTranslator {
    entries: HashMap<String, String>,
}

impl TableTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// English strings used by the core blocks
fn builtin_string(key: &str) -> Option<&'static str> {
    match key {
        "accordion.untitled" => Some("Section"),
        "video.play" => Some("Play video"),
        "video.unsupported" => Some("Your browser does not support embedded videos."),
        "image.missing" => Some("Image"),
        "button.default_label" => Some("Click here"),
        "placeholder.unavailable" => Some("This content is unavailable."),
        _ => None,
    }
}

impl Translator for TableTranslator {
    fn translate(&self, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .or_else(|| builtin_string(key).map(str::to_string))
            .unwrap_or_else(|| key.to_string())
    }
}
