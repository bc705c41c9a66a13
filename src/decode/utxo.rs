//! Transaction inputs, outputs and their amounts.

use crate::cbor::GenericValue;
use crate::decode::address::format_address;
use crate::decode::coin::format_coin;
use crate::decode::value::{Normalized, format_hex, format_value, keyed_entries, lookup, unwrap_set};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Keys of the map output form that are consumed by named fields.
const RESERVED_OUTPUT_KEYS: &[&str] = &[
    "0",
    "1",
    "2",
    "3",
    "4",
    "address",
    "amount",
    "plutus_data",
    "script_ref",
    "payment_credential_hash",
];

/// Reference to an output of an earlier transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionInput {
    pub transaction_id: Option<String>,
    pub index: Option<i64>,
}

/// Value carried by an output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub coin: Option<String>,
    pub multiasset: JsonValue,
}

impl Amount {
    fn new(coin: Option<&GenericValue>, multiasset: Option<&GenericValue>) -> Self {
        Amount {
            coin: coin.and_then(format_coin),
            multiasset: multiasset.map(format_value).unwrap_or(JsonValue::Null),
        }
    }
}

/// A transaction output, in either the legacy array or the keyed map form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionOutput {
    pub address: Option<String>,
    pub amount: Option<Amount>,
    pub plutus_data: JsonValue,
    pub script_ref: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_credential_hash: Option<JsonValue>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

fn format_index(value: &GenericValue) -> Option<i64> {
    match unwrap_set(value) {
        GenericValue::UInt(n) => i64::try_from(*n).ok(),
        GenericValue::NegInt(n) => Some(*n),
        GenericValue::TextString(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn format_input(value: &GenericValue) -> Option<TransactionInput> {
    let items = unwrap_set(value).as_array()?;
    if items.len() < 2 {
        return None;
    }

    let transaction_id = match unwrap_set(&items[0]) {
        GenericValue::TextString(text) => Some(text.clone()),
        GenericValue::ByteString(bytes) => Some(hex::encode(bytes)),
        _ => None,
    };

    Some(TransactionInput {
        transaction_id,
        index: format_index(&items[1]),
    })
}

/// Normalize an input list (inputs, collateral or reference inputs).
pub fn format_inputs(value: &GenericValue) -> Normalized<Vec<Normalized<TransactionInput>>> {
    Normalized::shape(value, |value| {
        let items = unwrap_set(value).as_array()?;
        Some(
            items
                .iter()
                .map(|item| Normalized::shape(item, format_input))
                .collect(),
        )
    })
}

/// Interpret an amount: a bare coin, `[coin, multiasset]` or a keyed map.
pub fn format_amount(value: &GenericValue) -> Amount {
    match unwrap_set(value) {
        GenericValue::Array(items) => Amount::new(items.first(), items.get(1).filter(|v| !v.is_null())),
        GenericValue::Map(entries) => {
            let keyed = keyed_entries(entries);
            Amount::new(lookup(&keyed, &["0", "coin"]), lookup(&keyed, &["1", "multiasset"]))
        }
        other => Amount::new(Some(other), None),
    }
}

fn optional_value(value: Option<&GenericValue>) -> JsonValue {
    value
        .filter(|v| !v.is_null())
        .map(format_value)
        .unwrap_or(JsonValue::Null)
}

fn output_from_array(items: &[GenericValue]) -> TransactionOutput {
    TransactionOutput {
        address: items.first().and_then(format_address),
        amount: Some(items.get(1).map(format_amount).unwrap_or(Amount::new(None, None))),
        plutus_data: optional_value(items.get(2)),
        script_ref: optional_value(items.get(3)),
        payment_credential_hash: None,
        extra: Map::new(),
    }
}

fn output_from_map(entries: &[(GenericValue, GenericValue)]) -> TransactionOutput {
    let keyed = keyed_entries(entries);

    let extra = keyed
        .iter()
        .filter(|(key, _)| !RESERVED_OUTPUT_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), format_value(value)))
        .collect();

    TransactionOutput {
        address: lookup(&keyed, &["0", "address"]).and_then(format_address),
        amount: lookup(&keyed, &["1", "amount"]).map(format_amount),
        plutus_data: optional_value(lookup(&keyed, &["2", "plutus_data"])),
        script_ref: optional_value(lookup(&keyed, &["3", "script_ref"])),
        payment_credential_hash: lookup(&keyed, &["payment_credential_hash", "4"]).map(format_value),
        extra,
    }
}

/// Normalize one output. Values that are neither arrays nor maps stay generic.
pub fn format_output(value: &GenericValue) -> Normalized<TransactionOutput> {
    Normalized::shape(value, |value| match unwrap_set(value) {
        GenericValue::Array(items) => Some(output_from_array(items)),
        GenericValue::Map(entries) => Some(output_from_map(entries)),
        _ => None,
    })
}

/// Normalize an output list.
pub fn format_outputs(value: &GenericValue) -> Normalized<Vec<Normalized<TransactionOutput>>> {
    Normalized::shape(value, |value| {
        let items = unwrap_set(value).as_array()?;
        Some(items.iter().map(format_output).collect())
    })
}

/// Hex strings of a required-signer list; entries that are not byte-like are dropped.
pub fn format_required_signers(value: &GenericValue) -> Normalized<Vec<String>> {
    Normalized::shape(value, |value| {
        let items = unwrap_set(value).as_array()?;
        Some(items.iter().filter_map(format_hex).collect())
    })
}
