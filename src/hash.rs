//! Transaction body hashing.
//!
//! The body is re-encoded from the parsed tree with `ciborium` and hashed with
//! Blake2b-256. The re-encoding is canonical for definite-length input, so the
//! hash matches the on-chain transaction id whenever the original body used
//! the shortest encodings.

use crate::cbor::{GenericValue, parse_hex};
use crate::error::{Error, Result};
use ciborium::value::{Integer, Value as CborValue};
use cryptoxide::blake2b::Blake2b;
use cryptoxide::digest::Digest as _;
use tracing::debug;

pub type Hash32 = [u8; 32];

/// Blake2b-256 digest of `data`.
pub fn blake2b_256(data: &[u8]) -> Hash32 {
    let mut hasher = Blake2b::new(32);
    hasher.input(data);

    let mut hash = [0; 32];
    hasher.result(&mut hash);
    hash
}

/// Convert the parsed tree into a `ciborium` value.
pub fn to_ciborium(value: &GenericValue) -> CborValue {
    match value {
        GenericValue::UInt(n) => CborValue::Integer(Integer::from(*n)),
        GenericValue::NegInt(n) => CborValue::Integer(Integer::from(*n)),
        GenericValue::ByteString(bytes) => CborValue::Bytes(bytes.clone()),
        GenericValue::TextString(text) => CborValue::Text(text.clone()),
        GenericValue::Array(items) => CborValue::Array(items.iter().map(to_ciborium).collect()),
        GenericValue::Map(entries) => CborValue::Map(
            entries
                .iter()
                .map(|(k, v)| (to_ciborium(k), to_ciborium(v)))
                .collect(),
        ),
        GenericValue::Tagged(tag, inner) => CborValue::Tag(*tag, Box::new(to_ciborium(inner))),
        GenericValue::Bool(b) => CborValue::Bool(*b),
        GenericValue::Null => CborValue::Null,
        GenericValue::Float(x) => CborValue::Float(*x),
    }
}

/// Encode a value back to CBOR bytes.
pub fn encode(value: &GenericValue) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    ciborium::into_writer(&to_ciborium(value), &mut bytes)
        .map_err(|e| Error::EncodeFailed(e.to_string()))?;
    Ok(bytes)
}

/// The body of a transaction array, or the whole value otherwise.
fn body_of(value: &GenericValue) -> &GenericValue {
    match value {
        GenericValue::Array(items) if !items.is_empty() => &items[0],
        other => other,
    }
}

/// Hex Blake2b-256 hash of the re-encoded transaction body.
pub fn body_hash(hex: &str) -> Result<String> {
    let value = parse_hex(hex)?;
    let bytes = encode(body_of(&value))?;
    debug!(len = bytes.len(), "hashing re-encoded body");
    Ok(hex::encode(blake2b_256(&bytes)))
}
