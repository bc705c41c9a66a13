//! Query execution engine.

use crate::cbor::{GenericValue, parse_hex};
use crate::decode::CardanoDecodedTransaction;
use crate::error::{Error, Result};
use crate::hash::body_hash;
use crate::query::path::{PathSegment, QueryPath};
use crate::query::shortcuts::{expand_shortcut, is_hash_query};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

/// The whole decoded transaction, plus what the renderers need besides JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct FullTransaction {
    pub json: JsonValue,
    /// Body hash, when the payload is a transaction.
    #[serde(skip)]
    pub hash: Option<String>,
    /// Parsed tree, for diagnostic output.
    #[serde(skip)]
    pub cbor: Option<GenericValue>,
}

/// Result of a query execution.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QueryResult {
    /// The full transaction.
    FullTransaction(FullTransaction),
    /// A single value.
    Single(QueryValue),
    /// Multiple values (from wildcard expansion).
    Multiple(Vec<QueryValue>),
}

/// A queryable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<QueryValue>),
    Object(serde_json::Map<String, JsonValue>),
}

impl From<JsonValue> for QueryValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => QueryValue::Null,
            JsonValue::Bool(b) => QueryValue::Bool(b),
            JsonValue::Number(n) => QueryValue::Number(n),
            JsonValue::String(s) => QueryValue::String(s),
            JsonValue::Array(arr) => {
                QueryValue::Array(arr.into_iter().map(QueryValue::from).collect())
            }
            JsonValue::Object(map) => QueryValue::Object(map),
        }
    }
}

/// Execute a query against a decoded transaction.
///
/// `payload` is the hex the transaction was decoded from; it is re-parsed
/// for the body hash and the diagnostic tree.
pub fn execute_query(
    tx: &CardanoDecodedTransaction,
    payload: &str,
    query: &str,
) -> Result<QueryResult> {
    if let Some(failure) = tx.failure() {
        return Err(Error::DecodeFailed(failure.message.clone()));
    }

    let expanded = expand_shortcut(query);
    debug!(query, %expanded, "executing query");

    if is_hash_query(&expanded) {
        return Ok(QueryResult::Single(QueryValue::String(body_hash(payload)?)));
    }

    let path = QueryPath::parse(&expanded)?;
    debug!(%path, segments = path.segments.len(), "parsed query path");
    let tx_json = tx.to_json();

    if path.is_empty() {
        let hash = match tx.decoded() {
            Some(_) => Some(body_hash(payload)?),
            None => None,
        };
        return Ok(QueryResult::FullTransaction(FullTransaction {
            json: tx_json,
            hash,
            cbor: parse_hex(payload).ok(),
        }));
    }

    if path.has_wildcard() {
        let results = execute_path_recursive(&tx_json, &path.segments)?;
        Ok(QueryResult::Multiple(results))
    } else {
        let result = execute_path(&tx_json, &path.segments)?;
        Ok(QueryResult::Single(result))
    }
}

/// Take one non-wildcard step into `value`.
fn step<'a>(value: &'a JsonValue, segment: &PathSegment) -> Result<&'a JsonValue> {
    match (segment, value) {
        (PathSegment::Field(name), _) => value
            .get(name)
            .ok_or_else(|| Error::FieldNotFound(name.clone())),
        // Normalized CBOR maps keep their integer keys as strings
        (PathSegment::Index(idx), JsonValue::Object(map)) => map
            .get(&idx.to_string())
            .ok_or_else(|| Error::FieldNotFound(idx.to_string())),
        (PathSegment::Index(idx), _) => value.get(*idx).ok_or(Error::IndexOutOfBounds(*idx)),
        (PathSegment::Wildcard, _) => Err(Error::InvalidQuery(
            "Unexpected wildcard in non-wildcard path".to_string(),
        )),
    }
}

/// Execute a path query without wildcards.
fn execute_path(value: &JsonValue, segments: &[PathSegment]) -> Result<QueryValue> {
    let mut current = value;
    for segment in segments {
        current = step(current, segment)?;
    }
    Ok(QueryValue::from(current.clone()))
}

/// Recursively execute path with wildcard expansion.
fn execute_path_recursive(value: &JsonValue, segments: &[PathSegment]) -> Result<Vec<QueryValue>> {
    let Some((current_segment, rest)) = segments.split_first() else {
        return Ok(vec![QueryValue::from(value.clone())]);
    };

    if *current_segment != PathSegment::Wildcard {
        return execute_path_recursive(step(value, current_segment)?, rest);
    }

    let items: Vec<&JsonValue> = match value {
        JsonValue::Array(items) => items.iter().collect(),
        JsonValue::Object(map) => map.values().collect(),
        _ => {
            return Err(Error::InvalidQuery(
                "Wildcard on a value that is neither an array nor a map".to_string(),
            ));
        }
    };

    let mut results = Vec::new();
    for item in items {
        results.extend(execute_path_recursive(item, rest)?);
    }
    Ok(results)
}
