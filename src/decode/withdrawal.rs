//! Reward withdrawal normalization.

use crate::cbor::GenericValue;
use crate::decode::address::encode_reward_address;
use crate::decode::coin::{format_coin, lovelace_to_ada, parse_lovelace};
use crate::decode::value::{Normalized, format_hex, keyed_pairs, unwrap_set};
use num_bigint::BigUint;
use serde::Serialize;

/// One withdrawn reward account.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Withdrawal {
    pub reward_address: String,
    pub amount: Option<String>,
}

/// All withdrawals of a transaction with their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Withdrawals {
    pub total_amount: String,
    pub total_amount_ada: String,
    pub entries: Vec<Withdrawal>,
}

fn reward_address(key: &str, raw: &GenericValue) -> String {
    let bytes = match unwrap_set(raw) {
        GenericValue::ByteString(bytes) => Some(bytes.clone()),
        other => format_hex(other).and_then(|text| hex::decode(text).ok()),
    };
    bytes
        .and_then(|bytes| encode_reward_address(&bytes))
        .unwrap_or_else(|| key.to_string())
}

fn shape_withdrawals(value: &GenericValue) -> Option<Withdrawals> {
    let raw_entries = unwrap_set(value).as_map()?;
    if raw_entries.is_empty() {
        return None;
    }

    let mut total = BigUint::default();
    let mut entries = Vec::with_capacity(raw_entries.len());
    for (key, raw_key, amount) in keyed_pairs(raw_entries) {
        let amount = format_coin(amount);
        if let Some(lovelace) = amount.as_deref().and_then(parse_lovelace) {
            total += lovelace;
        }

        entries.push(Withdrawal {
            reward_address: reward_address(&key, raw_key),
            amount,
        });
    }

    Some(Withdrawals {
        total_amount: total.to_string(),
        total_amount_ada: lovelace_to_ada(&total),
        entries,
    })
}

/// Normalize the withdrawals map. An empty map normalizes to null.
pub fn format_withdrawals(value: &GenericValue) -> Normalized<Withdrawals> {
    match unwrap_set(value).as_map() {
        Some([]) => Normalized::Raw(serde_json::Value::Null),
        _ => Normalized::shape(value, shape_withdrawals),
    }
}
