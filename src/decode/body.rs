//! Transaction body normalization.

use crate::cbor::GenericValue;
use crate::decode::certificate::{Certificate, format_certificates};
use crate::decode::coin::format_coin;
use crate::decode::utxo::{
    TransactionInput, TransactionOutput, format_inputs, format_output, format_outputs,
    format_required_signers,
};
use crate::decode::value::{Normalized, format_hex, format_value, keyed_entries, unwrap_set};
use crate::decode::withdrawal::{Withdrawals, format_withdrawals};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

/// Cardano body field numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyField {
    Inputs,
    Outputs,
    Fee,
    Ttl,
    Certs,
    Withdrawals,
    Update,
    AuxiliaryDataHash,
    ValidityStartInterval,
    Mint,
    ScriptDataHash,
    Collateral,
    RequiredSigners,
    NetworkId,
    CollateralReturn,
    TotalCollateral,
    ReferenceInputs,
    VotingProcedures,
    VotingProposals,
    Donation,
    CurrentTreasuryValue,
}

impl BodyField {
    /// Every field, in key order.
    pub const ALL: [BodyField; 21] = [
        BodyField::Inputs,
        BodyField::Outputs,
        BodyField::Fee,
        BodyField::Ttl,
        BodyField::Certs,
        BodyField::Withdrawals,
        BodyField::Update,
        BodyField::AuxiliaryDataHash,
        BodyField::ValidityStartInterval,
        BodyField::Mint,
        BodyField::ScriptDataHash,
        BodyField::Collateral,
        BodyField::RequiredSigners,
        BodyField::NetworkId,
        BodyField::CollateralReturn,
        BodyField::TotalCollateral,
        BodyField::ReferenceInputs,
        BodyField::VotingProcedures,
        BodyField::VotingProposals,
        BodyField::Donation,
        BodyField::CurrentTreasuryValue,
    ];

    /// Field for a stringified map key. Only canonical decimal keys match.
    pub fn from_key(key: &str) -> Option<Self> {
        let index: usize = key.parse().ok()?;
        if index.to_string() != key {
            return None;
        }
        Self::ALL.get(index).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            BodyField::Inputs => "inputs",
            BodyField::Outputs => "outputs",
            BodyField::Fee => "fee",
            BodyField::Ttl => "ttl",
            BodyField::Certs => "certs",
            BodyField::Withdrawals => "withdrawals",
            BodyField::Update => "update",
            BodyField::AuxiliaryDataHash => "auxiliary_data_hash",
            BodyField::ValidityStartInterval => "validity_start_interval",
            BodyField::Mint => "mint",
            BodyField::ScriptDataHash => "script_data_hash",
            BodyField::Collateral => "collateral",
            BodyField::RequiredSigners => "required_signers",
            BodyField::NetworkId => "network_id",
            BodyField::CollateralReturn => "collateral_return",
            BodyField::TotalCollateral => "total_collateral",
            BodyField::ReferenceInputs => "reference_inputs",
            BodyField::VotingProcedures => "voting_procedures",
            BodyField::VotingProposals => "voting_proposals",
            BodyField::Donation => "donation",
            BodyField::CurrentTreasuryValue => "current_treasury_value",
        }
    }
}

type Inputs = Normalized<Vec<Normalized<TransactionInput>>>;

/// Normalized transaction body. Fields absent from the input stay absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Inputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Normalized<Vec<Normalized<TransactionOutput>>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Normalized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certs: Option<Normalized<Vec<Certificate>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdrawals: Option<Normalized<Withdrawals>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auxiliary_data_hash: Option<Normalized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_start_interval: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_data_hash: Option<Normalized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral: Option<Inputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_signers: Option<Normalized<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collateral_return: Option<Normalized<TransactionOutput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_collateral: Option<Normalized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_inputs: Option<Inputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_procedures: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voting_proposals: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub donation: Option<Normalized<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_treasury_value: Option<Normalized<String>>,
    /// Keys outside the known numbering, as `field_<key>`.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// Human label for a network id.
pub fn format_network_id(value: &GenericValue) -> String {
    match unwrap_set(value) {
        GenericValue::UInt(0) => "Testnet".to_string(),
        GenericValue::UInt(1) => "Mainnet".to_string(),
        GenericValue::TextString(text) => text.clone(),
        other => match format_value(other) {
            JsonValue::String(s) => s,
            json => json.to_string(),
        },
    }
}

fn coin(value: &GenericValue) -> Normalized<String> {
    Normalized::shape(value, format_coin)
}

fn hash(value: &GenericValue) -> Normalized<String> {
    Normalized::shape(value, format_hex)
}

impl TransactionBody {
    fn set(&mut self, field: BodyField, value: &GenericValue) {
        match field {
            BodyField::Inputs => self.inputs = Some(format_inputs(value)),
            BodyField::Outputs => self.outputs = Some(format_outputs(value)),
            BodyField::Fee => self.fee = Some(coin(value)),
            BodyField::Ttl => self.ttl = Some(format_value(value)),
            BodyField::Certs => self.certs = Some(format_certificates(value)),
            BodyField::Withdrawals => self.withdrawals = Some(format_withdrawals(value)),
            BodyField::Update => self.update = Some(format_value(value)),
            BodyField::AuxiliaryDataHash => self.auxiliary_data_hash = Some(hash(value)),
            BodyField::ValidityStartInterval => {
                self.validity_start_interval = Some(format_value(value))
            }
            BodyField::Mint => self.mint = Some(format_value(value)),
            BodyField::ScriptDataHash => self.script_data_hash = Some(hash(value)),
            BodyField::Collateral => self.collateral = Some(format_inputs(value)),
            BodyField::RequiredSigners => {
                self.required_signers = Some(format_required_signers(value))
            }
            BodyField::NetworkId => self.network_id = Some(format_network_id(value)),
            BodyField::CollateralReturn => self.collateral_return = Some(format_output(value)),
            BodyField::TotalCollateral => self.total_collateral = Some(coin(value)),
            BodyField::ReferenceInputs => self.reference_inputs = Some(format_inputs(value)),
            BodyField::VotingProcedures => self.voting_procedures = Some(format_value(value)),
            BodyField::VotingProposals => self.voting_proposals = Some(format_value(value)),
            BodyField::Donation => self.donation = Some(coin(value)),
            BodyField::CurrentTreasuryValue => {
                self.current_treasury_value = Some(coin(value))
            }
        }
    }
}

/// Normalize a body map. Returns `None` when the value is not a map.
pub fn format_body(value: &GenericValue) -> Option<TransactionBody> {
    let entries = unwrap_set(value).as_map()?;
    let mut body = TransactionBody::default();

    for (key, value) in keyed_entries(entries) {
        match BodyField::from_key(&key) {
            Some(field) => {
                trace!(field = field.name(), "formatting body field");
                body.set(field, value);
            }
            None => {
                trace!(%key, "keeping unrecognized body field");
                body.extra.insert(format!("field_{}", key), format_value(value));
            }
        }
    }

    Some(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(entries: Vec<(GenericValue, GenericValue)>) -> JsonValue {
        serde_json::to_value(format_body(&GenericValue::Map(entries)).unwrap()).unwrap()
    }

    #[test]
    fn test_field_table() {
        assert_eq!(BodyField::from_key("0"), Some(BodyField::Inputs));
        assert_eq!(BodyField::from_key("13"), Some(BodyField::NetworkId));
        assert_eq!(BodyField::from_key("20"), Some(BodyField::CurrentTreasuryValue));
        assert_eq!(BodyField::from_key("21"), None);
        assert_eq!(BodyField::from_key("02"), None);
        assert_eq!(BodyField::from_key("fee"), None);

        for (index, field) in BodyField::ALL.iter().enumerate() {
            assert_eq!(BodyField::from_key(&index.to_string()), Some(*field));
        }
    }

    #[test]
    fn test_absent_fields_omitted() {
        let json = body(vec![(GenericValue::UInt(2), GenericValue::UInt(171_617))]);
        assert_eq!(json, json!({ "fee": "171617" }));
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(body(vec![]), json!({}));
    }

    #[test]
    fn test_network_id_labels() {
        assert_eq!(
            body(vec![(GenericValue::UInt(13), GenericValue::UInt(1))]),
            json!({ "network_id": "Mainnet" })
        );
        assert_eq!(format_network_id(&GenericValue::UInt(0)), "Testnet");
        assert_eq!(format_network_id(&GenericValue::UInt(7)), "7");
    }

    #[test]
    fn test_unknown_key_retained() {
        let json = body(vec![
            (GenericValue::UInt(99), GenericValue::ByteString(vec![0x01])),
            (GenericValue::UInt(3), GenericValue::UInt(1000)),
        ]);
        assert_eq!(json, json!({ "ttl": 1000, "field_99": "01" }));
    }

    #[test]
    fn test_hash_fields_hex() {
        let json = body(vec![
            (GenericValue::UInt(7), GenericValue::ByteString(vec![0xab; 32])),
            (GenericValue::UInt(10), GenericValue::UInt(5)),
        ]);
        assert_eq!(json["auxiliary_data_hash"], "ab".repeat(32));
        assert_eq!(json["script_data_hash"], 5);
    }

    #[test]
    fn test_required_signers_and_treasury() {
        let json = body(vec![
            (
                GenericValue::UInt(12),
                GenericValue::Tagged(
                    258,
                    Box::new(GenericValue::Array(vec![GenericValue::ByteString(vec![0x0f])])),
                ),
            ),
            (GenericValue::UInt(20), GenericValue::UInt(42)),
        ]);
        assert_eq!(json["required_signers"], json!(["0f"]));
        assert_eq!(json["current_treasury_value"], "42");
    }

    #[test]
    fn test_non_map_body() {
        assert!(format_body(&GenericValue::Array(vec![])).is_none());
    }
}
