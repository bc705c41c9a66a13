//! Raw CBOR diagnostic notation output.

use crate::error::{Error, Result};
use crate::query::{QueryResult, QueryValue};
use serde_json::Value as JsonValue;

/// Format a query result in diagnostic notation.
///
/// The full transaction prints the parsed CBOR tree; query results only have
/// their normalized JSON, so hex strings are shown as byte strings.
pub fn format_raw(result: &QueryResult) -> Result<String> {
    match result {
        QueryResult::FullTransaction(full) => match &full.cbor {
            Some(cbor) => Ok(cbor.to_string()),
            None => serde_json::to_string_pretty(&full.json)
                .map_err(|e| Error::FormatError(e.to_string())),
        },
        QueryResult::Single(value) => Ok(format_value_raw(value)),
        QueryResult::Multiple(values) => Ok(values
            .iter()
            .map(format_value_raw)
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

fn looks_like_bytes(s: &str) -> bool {
    s.len() >= 2 && s.len() % 2 == 0 && s.chars().all(|c| c.is_ascii_hexdigit())
}

fn format_string_raw(s: &str) -> String {
    if looks_like_bytes(s) {
        format!("h'{}'", s)
    } else {
        format!("{:?}", s)
    }
}

/// Format a single value in raw mode.
fn format_value_raw(value: &QueryValue) -> String {
    match value {
        QueryValue::Null => "null".to_string(),
        QueryValue::Bool(b) => b.to_string(),
        QueryValue::Number(n) => n.to_string(),
        QueryValue::String(s) => format_string_raw(s),
        QueryValue::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value_raw).collect();
            format!("[{}]", items.join(", "))
        }
        QueryValue::Object(map) => format_object_raw(map),
    }
}

fn format_json_raw(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => format_string_raw(s),
        JsonValue::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_json_raw).collect();
            format!("[{}]", items.join(", "))
        }
        JsonValue::Object(map) => format_object_raw(map),
    }
}

fn format_object_raw(map: &serde_json::Map<String, JsonValue>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{:?}: {}", k, format_json_raw(v)))
        .collect();
    format!("{{{}}}", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::query::execute_query;

    #[test]
    fn test_format_hex_string() {
        let value = QueryValue::String("84a400".to_string());
        assert_eq!(format_value_raw(&value), "h'84a400'");
    }

    #[test]
    fn test_format_text_string() {
        let value = QueryValue::String("hello world".to_string());
        assert_eq!(format_value_raw(&value), "\"hello world\"");
    }

    #[test]
    fn test_format_nested_object() {
        let value = QueryValue::from(serde_json::json!({ "type": "KeyHash", "hash": "abcd" }));
        assert_eq!(
            format_value_raw(&value),
            "{\"type\": \"KeyHash\", \"hash\": h'abcd'}"
        );
    }

    #[test]
    fn test_full_transaction_diagnostic() {
        // [{2: 100}, {}, true, null]
        let payload = "84a1021864a0f5f6";
        let result = execute_query(&decode(payload), payload, "").unwrap();
        assert_eq!(format_raw(&result).unwrap(), "[{2: 100}, {}, true, null]");
    }

    #[test]
    fn test_set_tag_kept_in_diagnostic() {
        // 258([h'01'])
        let payload = "d90102814101";
        let result = execute_query(&decode(payload), payload, "").unwrap();
        assert_eq!(format_raw(&result).unwrap(), "258([h'01'])");
    }
}
