//! `OptionValue`: the dynamically-typed tree backing every `use`/`auth`/
//! `header`/`body`/`render` option list.
//!
//! Modeled as a tagged sum over an order-preserving map.
//! `IndexMap` is used rather than a hand-rolled
//! insertion-ordered map — the pack consistently reaches for a crate over a
//! bespoke data structure for this kind of thing.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum OptionValue {
    String(String),
    Number(f64),
    Bool(bool),
    Map(IndexMap<String, OptionValue>),
    List(Vec<OptionValue>),
    /// A deferred lookup, e.g. `@env.PORT` lowers to `GlobalVariable { name:
    /// "env", path: ["PORT"] }`.
    GlobalVariable { name: String, path: Vec<String> },
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, OptionValue>> {
        match self {
            OptionValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[OptionValue]> {
        match self {
            OptionValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

/// An ordered `key -> OptionValue` option list, as attached to `use`,
/// `auth`, `header`, `body`, `response`, and `render` directives.
pub type OptionMap = IndexMap<String, OptionValue>;

/// Deterministically fingerprints an option mapping: serialize to JSON with
/// keys recursively sorted, strip whitespace, base64-encode. Used to
/// deduplicate generated DTOs that share an identical body schema. Stable
/// under key reordering.
pub fn option_hash(options: &OptionMap) -> String {
    let value = to_sorted_json(options);
    let compact = serde_json::to_string(&value).expect("OptionValue JSON is always representable");
    base64::Engine::encode(&base64::engine::general_purpose::STANDARD, compact.as_bytes())
}

fn to_sorted_json(options: &OptionMap) -> serde_json::Value {
    let mut keys: Vec<&String> = options.keys().collect();
    keys.sort();
    let mut map = serde_json::Map::new();
    for key in keys {
        map.insert(key.clone(), option_value_to_sorted_json(&options[key]));
    }
    serde_json::Value::Object(map)
}

fn option_value_to_sorted_json(value: &OptionValue) -> serde_json::Value {
    match value {
        OptionValue::String(s) => serde_json::Value::String(s.clone()),
        OptionValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        OptionValue::Bool(b) => serde_json::Value::Bool(*b),
        OptionValue::Map(m) => to_sorted_json(m),
        OptionValue::List(items) => {
            serde_json::Value::Array(items.iter().map(option_value_to_sorted_json).collect())
        }
        OptionValue::GlobalVariable { name, path } => {
            let mut map = serde_json::Map::new();
            map.insert("__global_name".to_string(), serde_json::Value::String(name.clone()));
            map.insert(
                "__global_path".to_string(),
                serde_json::Value::Array(path.iter().cloned().map(serde_json::Value::String).collect()),
            );
            serde_json::Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_stable_under_key_reordering() {
        let mut a = OptionMap::new();
        a.insert("a".to_string(), OptionValue::Number(1.0));
        a.insert("b".to_string(), OptionValue::Number(2.0));

        let mut b = OptionMap::new();
        b.insert("b".to_string(), OptionValue::Number(2.0));
        b.insert("a".to_string(), OptionValue::Number(1.0));

        assert_eq!(option_hash(&a), option_hash(&b));
    }

    #[test]
    fn hash_differs_on_value_change() {
        let mut a = OptionMap::new();
        a.insert("a".to_string(), OptionValue::Number(1.0));
        let mut b = OptionMap::new();
        b.insert("a".to_string(), OptionValue::Number(2.0));
        assert_ne!(option_hash(&a), option_hash(&b));
    }
}
