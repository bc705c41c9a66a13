//! Transaction assembly: `[body, witness_set, is_valid, auxiliary_data]`.

use crate::cbor::{GenericValue, parse_bytes, parse_hex};
use crate::decode::body::{TransactionBody, format_body};
use crate::decode::value::format_value;
use crate::error::DecodeError;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

/// Label of the error envelope.
pub const DESERIALIZATION_FAILED: &str = "Deserialization failed";

/// A transaction array decoded into its four slots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedTransaction {
    pub body: Option<TransactionBody>,
    pub witness_set: JsonValue,
    pub is_valid: bool,
    pub auxiliary_data: JsonValue,
}

/// A payload that parsed but is not a transaction array.
#[derive(Debug, Clone, PartialEq)]
pub struct Unrecognized {
    pub raw: JsonValue,
}

impl Serialize for Unrecognized {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Unrecognized", 4)?;
        state.serialize_field("body", &JsonValue::Null)?;
        state.serialize_field("witness_set", &JsonValue::Null)?;
        state.serialize_field("is_valid", &JsonValue::Null)?;
        state.serialize_field("raw", &self.raw)?;
        state.end()
    }
}

/// Error envelope: the cause plus the input echoed back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeFailure {
    pub error: String,
    pub message: String,
    pub raw: String,
}

/// Outcome of decoding. Decoding never fails; failures become an envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CardanoDecodedTransaction {
    Decoded(DecodedTransaction),
    Unrecognized(Unrecognized),
    Failed(DecodeFailure),
}

impl CardanoDecodedTransaction {
    /// The decoded transaction, if the payload was a transaction array.
    pub fn decoded(&self) -> Option<&DecodedTransaction> {
        match self {
            CardanoDecodedTransaction::Decoded(tx) => Some(tx),
            _ => None,
        }
    }

    /// The error envelope, if decoding failed.
    pub fn failure(&self) -> Option<&DecodeFailure> {
        match self {
            CardanoDecodedTransaction::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// JSON form of the result.
    pub fn to_json(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or(JsonValue::Null)
    }

    fn failed(error: DecodeError, raw: String) -> Self {
        warn!(error = %error, "transaction could not be deserialized");
        CardanoDecodedTransaction::Failed(DecodeFailure {
            error: DESERIALIZATION_FAILED.to_string(),
            message: error.to_string(),
            raw,
        })
    }
}

/// Assemble a parsed top-level value.
pub fn assemble(value: &GenericValue) -> CardanoDecodedTransaction {
    let items = match value {
        GenericValue::Array(items) if !items.is_empty() => items,
        other => {
            debug!(kind = other.kind(), "payload is not a transaction array");
            return CardanoDecodedTransaction::Unrecognized(Unrecognized {
                raw: format_value(value),
            });
        }
    };

    let body = format_body(&items[0]);
    if body.is_none() {
        debug!(kind = items[0].kind(), "transaction body is not a map");
    }

    let is_valid = match items.get(2) {
        Some(GenericValue::Bool(flag)) => *flag,
        _ => true,
    };

    let slot = |index: usize| items.get(index).map(format_value).unwrap_or(JsonValue::Null);

    CardanoDecodedTransaction::Decoded(DecodedTransaction {
        body,
        witness_set: slot(1),
        is_valid,
        auxiliary_data: slot(3),
    })
}

/// Decode a hex-encoded transaction.
pub fn decode(hex: &str) -> CardanoDecodedTransaction {
    match parse_hex(hex) {
        Ok(value) => assemble(&value),
        Err(e) => CardanoDecodedTransaction::failed(e, hex.to_string()),
    }
}

/// Decode a binary transaction. The envelope echoes the bytes as hex.
pub fn decode_bytes(bytes: &[u8]) -> CardanoDecodedTransaction {
    match parse_bytes(bytes) {
        Ok(value) => assemble(&value),
        Err(e) => CardanoDecodedTransaction::failed(e, hex::encode(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// `[{0: [[h'00..00', 0]], 1: [[h'61 00..00', 5000000]], 2: 171993}, {}, true, null]`
    fn simple_tx() -> String {
        format!(
            "84a3008182582000{}00018182581d61{}1a004c4b40021a00029fd9a0f5f6",
            "00".repeat(31),
            "00".repeat(28)
        )
    }

    #[test]
    fn test_empty_array_passes_through() {
        let tx = decode("80");
        assert_eq!(
            tx.to_json(),
            json!({ "body": null, "witness_set": null, "is_valid": null, "raw": [] })
        );
        assert!(tx.decoded().is_none());
        assert!(tx.failure().is_none());
    }

    #[test]
    fn test_scalar_passes_through() {
        assert_eq!(decode("01").to_json()["raw"], 1);
    }

    #[test]
    fn test_set_tagged_top_level_passes_through() {
        // 258([{}])
        let tx = decode("d9010281a0");
        assert!(tx.decoded().is_none());
        assert!(tx.failure().is_none());
        assert_eq!(tx.to_json()["body"], JsonValue::Null);
    }

    #[test]
    fn test_wide_witness_map_decodes() {
        // [{}, {0: null, 1: null, ... 59999: null}]
        let mut payload = String::from("82a0b9ea60");
        for n in 0..60_000u32 {
            payload.push_str(&match n {
                0..=23 => format!("{:02x}", n),
                24..=0xff => format!("18{:02x}", n),
                _ => format!("19{:04x}", n),
            });
            payload.push_str("f6");
        }

        let tx = decode(&payload);
        let witnesses = tx.decoded().unwrap().witness_set.as_object().unwrap();
        assert_eq!(witnesses.len(), 60_000);
        let keys: Vec<&String> = witnesses.keys().take(11).collect();
        assert_eq!(keys[2], "2");
        assert_eq!(keys[10], "10");
    }

    #[test]
    fn test_truncated_input_yields_envelope() {
        let tx = decode("1a0001");
        let failure = tx.failure().unwrap();
        assert_eq!(failure.error, DESERIALIZATION_FAILED);
        assert_eq!(
            failure.message,
            DecodeError::UnexpectedEof.to_string()
        );
        assert_eq!(failure.raw, "1a0001");
    }

    #[test]
    fn test_malformed_hex_yields_envelope() {
        let json = decode("zz").to_json();
        assert_eq!(json["error"], "Deserialization failed");
        assert_eq!(json["raw"], "zz");
        assert_eq!(json.as_object().unwrap().len(), 3);

        assert!(decode("").failure().is_some());
        assert!(decode("abc").failure().is_some());
    }

    #[test]
    fn test_simple_transaction() {
        let tx = decode(&simple_tx());
        let decoded = tx.decoded().unwrap();
        assert!(decoded.is_valid);
        assert_eq!(decoded.witness_set, json!({}));
        assert_eq!(decoded.auxiliary_data, JsonValue::Null);

        let json = tx.to_json();
        assert_eq!(json["body"]["fee"], "171993");
        assert_eq!(json["body"]["inputs"][0]["index"], 0);
        assert_eq!(json["body"]["outputs"][0]["amount"]["coin"], "5000000");
        assert!(
            json["body"]["outputs"][0]["address"]
                .as_str()
                .unwrap()
                .starts_with("addr1v")
        );
        assert!(json["body"].get("ttl").is_none());
    }

    #[test]
    fn test_is_valid_defaults_to_true() {
        // [{}, null, 0]
        let tx = decode("83a0f600");
        assert!(tx.decoded().unwrap().is_valid);

        // [{}, {}, false]
        let tx = decode("83a0a0f4");
        assert!(!tx.decoded().unwrap().is_valid);
    }

    #[test]
    fn test_non_map_body_is_null() {
        let json = decode("8101").to_json();
        assert_eq!(json["body"], JsonValue::Null);
        assert_eq!(json["witness_set"], JsonValue::Null);
        assert_eq!(json["is_valid"], true);
        assert_eq!(json["auxiliary_data"], JsonValue::Null);
    }

    #[test]
    fn test_decode_bytes_matches_hex() {
        let hex = simple_tx();
        let bytes = hex::decode(&hex).unwrap();
        assert_eq!(decode_bytes(&bytes), decode(&hex));
    }

    #[test]
    fn test_decode_bytes_envelope_echoes_hex() {
        let tx = decode_bytes(&[0x1a, 0x00, 0x01]);
        assert_eq!(tx.failure().unwrap().raw, "1a0001");
    }
}
