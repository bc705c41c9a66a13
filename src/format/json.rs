//! JSON output formatting.

use crate::error::{Error, Result};
use crate::query::QueryResult;

/// Format a query result as pretty-printed JSON.
pub fn format_json(result: &QueryResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(|e| Error::FormatError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use crate::query::{QueryValue, execute_query};

    #[test]
    fn test_format_single_value() {
        let result = QueryResult::Single(QueryValue::String("171993".to_string()));
        let output = format_json(&result).unwrap();
        assert_eq!(output.trim(), "\"171993\"");
    }

    #[test]
    fn test_format_multiple() {
        let result = QueryResult::Multiple(vec![
            QueryValue::String("a".to_string()),
            QueryValue::Null,
        ]);
        let output: serde_json::Value = serde_json::from_str(&format_json(&result).unwrap()).unwrap();
        assert_eq!(output, serde_json::json!(["a", null]));
    }

    #[test]
    fn test_full_transaction_is_the_decoded_record() {
        let result = execute_query(&decode("80"), "80", "").unwrap();
        let output: serde_json::Value = serde_json::from_str(&format_json(&result).unwrap()).unwrap();
        assert_eq!(
            output,
            serde_json::json!({ "body": null, "witness_set": null, "is_valid": null, "raw": [] })
        );
    }
}
