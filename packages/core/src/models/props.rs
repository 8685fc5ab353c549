//! Prop Schemas and Resolved Props
//!
//! A block definition declares its props as `name -> { type, default }`.
//! [`PropsSchema::resolve`] turns whatever the document stored into the
//! canonical map renderers read: declared props always present and well
//! typed, undeclared props passed through untouched.

use crate::models::block::Props;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Declared type of a prop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Any,
}

impl PropType {
    /// Whether `value` is acceptable for this type (`null` never is)
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            PropType::String => value.is_string(),
            PropType::Number => value.is_number(),
            PropType::Integer => value.is_i64() || value.is_u64(),
            PropType::Boolean => value.is_boolean(),
            PropType::Object => value.is_object(),
            PropType::Array => value.is_array(),
            PropType::Any => !value.is_null(),
        }
    }
}

/// One declared prop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropField {
    #[serde(rename = "type")]
    pub prop_type: PropType,
    pub default: Value,
}

impl PropField {
    pub fn new(prop_type: PropType, default: Value) -> Self {
        Self { prop_type, default }
    }
}

/// Ordered prop declarations of a block type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropsSchema {
    fields: BTreeMap<String, PropField>,
}

impl PropsSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare (or redeclare) a prop
    pub fn insert(&mut self, name: impl Into<String>, field: PropField) {
        self.fields.insert(name.into(), field);
    }

    pub fn get(&self, name: &str) -> Option<&PropField> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &PropField)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Produce the canonical prop map for rendering.
    ///
    /// Missing or mistyped declared props take the schema default. Props the
    /// schema does not declare are kept as stored.
    pub fn resolve(&self, stored: &Props) -> Props {
        let mut resolved = stored.clone();
        for (name, field) in &self.fields {
            let keep = stored.get(name).is_some_and(|v| field.prop_type.accepts(v));
            if !keep {
                if stored.contains_key(name) {
                    tracing::debug!(prop = name.as_str(), "Replacing malformed prop with default");
                }
                resolved.insert(name.clone(), field.default.clone());
            }
        }
        resolved
    }
}

/// Read-only accessors over resolved props.
///
/// Getters never fail: a missing or mistyped value yields an empty/zero value.
/// Declared props are already defaulted by [`PropsSchema::resolve`], so the
/// fallback only matters for undeclared keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockProps {
    values: Props,
}

impl BlockProps {
    pub fn new(values: Props) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn str(&self, key: &str) -> &str {
        self.values.get(key).and_then(Value::as_str).unwrap_or("")
    }

    pub fn i64(&self, key: &str) -> i64 {
        self.values.get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn f64(&self, key: &str) -> f64 {
        self.values.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn bool(&self, key: &str) -> bool {
        self.values.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn object(&self, key: &str) -> Props {
        self.values
            .get(key)
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Props {
        &self.values
    }

    /// Decode into a typed props struct
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.values.clone()))
    }

    /// Decode into a typed props struct, resetting each declared prop the
    /// struct rejects to its schema default.
    ///
    /// A value can pass [`PropType::accepts`] and still be out of range for
    /// the struct field (`-5` for a `u32`). Each stored prop is tried on its
    /// own against the defaults, so only the rejected ones are reset. The
    /// original error is returned when resetting does not help.
    pub fn decode_with_defaults<T: DeserializeOwned>(
        &self,
        schema: &PropsSchema,
    ) -> Result<T, serde_json::Error> {
        let error = match self.decode() {
            Ok(decoded) => return Ok(decoded),
            Err(error) => error,
        };

        let mut defaults = self.values.clone();
        for (name, field) in schema.iter() {
            defaults.insert(name.clone(), field.default.clone());
        }

        let mut values = self.values.clone();
        for (name, field) in schema.iter() {
            let Some(stored) = self.values.get(name).filter(|v| **v != field.default) else {
                continue;
            };
            let mut candidate = defaults.clone();
            candidate.insert(name.clone(), stored.clone());
            if let Err(rejected) = serde_json::from_value::<T>(Value::Object(candidate)) {
                tracing::warn!(prop = name.as_str(), %rejected, "Prop rejected by renderer, using default");
                values.insert(name.clone(), field.default.clone());
            }
        }
        serde_json::from_value(Value::Object(values)).map_err(|_| error)
    }
}

/// Field deserializers for typed props structs that take any JSON value.
///
/// Use with `#[serde(deserialize_with = "...")]` on fields whose range is
/// narrower than what the schema type admits.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn to_int(value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|_| i64::MAX))
                .or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<f64>().ok().map(|f| f as i64),
            _ => None,
        }
    }

    fn to_float(value: &Value) -> Option<f64> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|f| f.is_finite())
    }

    /// Any number (or numeric string) as `i64`, saturating; anything else is 0
    pub fn int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(to_int(&Value::deserialize(deserializer)?).unwrap_or(0))
    }

    /// Numeric items of an array; other items are dropped
    pub fn numbers<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items.iter().filter_map(to_float).collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> PropsSchema {
        let mut schema = PropsSchema::new();
        schema.insert("text", PropField::new(PropType::String, json!("Untitled")));
        schema.insert("level", PropField::new(PropType::Integer, json!(2)));
        schema.insert("bold", PropField::new(PropType::Boolean, json!(false)));
        schema
    }

    #[test]
    fn test_missing_props_get_defaults() {
        let resolved = schema().resolve(&Props::new());
        assert_eq!(resolved["text"], "Untitled");
        assert_eq!(resolved["level"], 2);
        assert_eq!(resolved["bold"], false);
    }

    #[test]
    fn test_mistyped_props_get_defaults() {
        let stored = json!({"text": 12, "level": "three", "bold": null});
        let resolved = schema().resolve(stored.as_object().unwrap());
        assert_eq!(resolved["text"], "Untitled");
        assert_eq!(resolved["level"], 2);
        assert_eq!(resolved["bold"], false);
    }

    #[test]
    fn test_valid_and_unknown_props_kept() {
        let stored = json!({"text": "Hello", "level": 1, "dataTrack": "hero"});
        let resolved = schema().resolve(stored.as_object().unwrap());
        assert_eq!(resolved["text"], "Hello");
        assert_eq!(resolved["level"], 1);
        assert_eq!(resolved["dataTrack"], "hero");
    }

    #[test]
    fn test_integer_rejects_floats() {
        assert!(PropType::Integer.accepts(&json!(3)));
        assert!(!PropType::Integer.accepts(&json!(3.5)));
        assert!(PropType::Number.accepts(&json!(3.5)));
        assert!(!PropType::Any.accepts(&json!(null)));
    }

    #[derive(Debug, Deserialize)]
    struct Figure {
        alt: String,
        width: u32,
    }

    #[test]
    fn test_decode_with_defaults_resets_only_rejected_props() {
        let mut schema = PropsSchema::new();
        schema.insert("alt", PropField::new(PropType::String, json!("")));
        schema.insert("width", PropField::new(PropType::Integer, json!(0)));
        let props = BlockProps::new(json!({"alt": "Logo", "width": -1}).as_object().cloned().unwrap());

        assert!(props.decode::<Figure>().is_err());
        let decoded: Figure = props.decode_with_defaults(&schema).unwrap();
        assert_eq!(decoded.alt, "Logo");
        assert_eq!(decoded.width, 0);
    }

    #[derive(Debug, Deserialize)]
    struct Layout {
        #[serde(deserialize_with = "lenient::int")]
        gap: i64,
        #[serde(deserialize_with = "lenient::numbers")]
        widths: Vec<f64>,
    }

    #[test]
    fn test_lenient_fields() {
        let layout: Layout = serde_json::from_value(json!({
            "gap": 18446744073709551615u64,
            "widths": ["60", 40, "wide", null]
        }))
        .unwrap();
        assert_eq!(layout.gap, i64::MAX);
        assert_eq!(layout.widths, vec![60.0, 40.0]);

        let layout: Layout = serde_json::from_value(json!({"gap": -5, "widths": "50,50"})).unwrap();
        assert_eq!(layout.gap, -5);
        assert!(layout.widths.is_empty());
    }

    #[test]
    fn test_block_props_getters() {
        let props = BlockProps::new(json!({"a": "x", "n": 4, "f": true}).as_object().cloned().unwrap());
        assert_eq!(props.str("a"), "x");
        assert_eq!(props.str("missing"), "");
        assert_eq!(props.i64("n"), 4);
        assert!(props.bool("f"));
        assert!(props.object("a").is_empty());
    }
}
