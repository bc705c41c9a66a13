//! Generic normalization of CBOR values into JSON.

use crate::cbor::GenericValue;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// CBOR tag Cardano uses to mark sets.
pub const SET_TAG: u64 = 258;

/// A field that is either in its Cardano shape or left as a generic value
/// because the input did not match that shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Normalized<T> {
    Known(T),
    Raw(JsonValue),
}

impl<T> Normalized<T> {
    /// Apply `shape`, falling back to generic normalization of `value`.
    pub fn shape(value: &GenericValue, shape: impl FnOnce(&GenericValue) -> Option<T>) -> Self {
        shape(value)
            .map(Normalized::Known)
            .unwrap_or_else(|| Normalized::Raw(format_value(value)))
    }

    /// The shaped value, if the input matched.
    pub fn known(&self) -> Option<&T> {
        match self {
            Normalized::Known(inner) => Some(inner),
            Normalized::Raw(_) => None,
        }
    }
}

/// Strip any number of nested set tags.
pub fn unwrap_set(value: &GenericValue) -> &GenericValue {
    match value {
        GenericValue::Tagged(SET_TAG, inner) => unwrap_set(inner),
        other => other,
    }
}

/// Normalize a value: bytes become lowercase hex, containers recurse,
/// set tags disappear and other tags become `{tag, value}` records.
pub fn format_value(value: &GenericValue) -> JsonValue {
    match unwrap_set(value) {
        GenericValue::UInt(n) => JsonValue::from(*n),
        GenericValue::NegInt(n) => JsonValue::from(*n),
        GenericValue::ByteString(bytes) => JsonValue::String(hex::encode(bytes)),
        GenericValue::TextString(text) => JsonValue::String(text.clone()),
        GenericValue::Array(items) => JsonValue::Array(items.iter().map(format_value).collect()),
        GenericValue::Map(entries) => JsonValue::Object(format_entries(entries)),
        GenericValue::Tagged(tag, inner) => serde_json::json!({
            "tag": tag,
            "value": format_value(inner)
        }),
        GenericValue::Bool(b) => JsonValue::Bool(*b),
        GenericValue::Null => JsonValue::Null,
        // NaN and infinities have no JSON form
        GenericValue::Float(x) => serde_json::Number::from_f64(*x)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
    }
}

/// Normalize map entries into a JSON object.
pub fn format_entries(entries: &[(GenericValue, GenericValue)]) -> Map<String, JsonValue> {
    keyed_entries(entries)
        .into_iter()
        .map(|(key, value)| (key, format_value(value)))
        .collect()
}

/// Deterministic string form of a map key.
pub fn map_key(key: &GenericValue) -> String {
    match key {
        GenericValue::UInt(n) => n.to_string(),
        GenericValue::NegInt(n) => n.to_string(),
        GenericValue::ByteString(bytes) => hex::encode(bytes),
        GenericValue::TextString(text) => text.clone(),
        GenericValue::Bool(b) => b.to_string(),
        GenericValue::Null => "null".to_string(),
        GenericValue::Float(x) => x.to_string(),
        GenericValue::Array(_) | GenericValue::Map(_) | GenericValue::Tagged(_, _) => {
            format_value(key).to_string()
        }
    }
}

/// Stringify keys, collapsing duplicates so the last value wins while the
/// key keeps the position of its first occurrence.
pub fn keyed_entries(entries: &[(GenericValue, GenericValue)]) -> Vec<(String, &GenericValue)> {
    keyed_pairs(entries)
        .into_iter()
        .map(|(key, _, value)| (key, value))
        .collect()
}

/// Like `keyed_entries`, but each entry also carries the raw key of the
/// winning occurrence.
pub fn keyed_pairs(
    entries: &[(GenericValue, GenericValue)],
) -> Vec<(String, &GenericValue, &GenericValue)> {
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut keyed: Vec<(String, &GenericValue, &GenericValue)> = Vec::with_capacity(entries.len());
    for (raw_key, value) in entries {
        let key = map_key(raw_key);
        match slots.get(&key) {
            Some(&slot) => {
                keyed[slot].1 = raw_key;
                keyed[slot].2 = value;
            }
            None => {
                slots.insert(key.clone(), keyed.len());
                keyed.push((key, raw_key, value));
            }
        }
    }
    keyed
}

/// First entry under any of `names` whose value is not null.
pub fn lookup<'a>(entries: &[(String, &'a GenericValue)], names: &[&str]) -> Option<&'a GenericValue> {
    names.iter().find_map(|name| {
        entries
            .iter()
            .find(|(key, value)| key == name && !value.is_null())
            .map(|(_, value)| *value)
    })
}

/// Hex form of a byte-like value: bytes are encoded, text that already is
/// hex is kept.
pub fn format_hex(value: &GenericValue) -> Option<String> {
    match unwrap_set(value) {
        GenericValue::ByteString(bytes) => Some(hex::encode(bytes)),
        GenericValue::TextString(text) if is_hex(text) => Some(text.to_lowercase()),
        _ => None,
    }
}

fn is_hex(text: &str) -> bool {
    text.len() % 2 == 0 && text.chars().all(|c| c.is_ascii_hexdigit())
}
