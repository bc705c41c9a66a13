//! Certificate, stake credential and DRep normalization.

use crate::cbor::GenericValue;
use crate::decode::address::{drep_id, pool_id};
use crate::decode::coin::format_coin;
use crate::decode::value::{Normalized, format_hex, format_value, unwrap_set};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::debug;

/// A stake credential in its recognized shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum StakeCredential {
    KeyHash { hash: String },
}

/// A delegated representative.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum DRep {
    KeyHash {
        hash: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        drep_id: Option<String>,
    },
    AlwaysAbstain,
    AlwaysNoConfidence,
}

/// A recognized certificate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Certificate {
    StakeRegistration {
        stake_credential: Normalized<StakeCredential>,
    },
    StakeDeregistration {
        stake_credential: Normalized<StakeCredential>,
    },
    StakeDelegation {
        stake_credential: Normalized<StakeCredential>,
        pool_keyhash: JsonValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        pool_id: Option<String>,
    },
    Registration {
        stake_credential: Normalized<StakeCredential>,
        deposit: Option<String>,
    },
    Unregistration {
        stake_credential: Normalized<StakeCredential>,
        deposit: Option<String>,
    },
    VoteDelegation {
        stake_credential: Normalized<StakeCredential>,
        #[serde(skip_serializing_if = "Option::is_none")]
        drep: Option<DRep>,
    },
    StakeVoteDelegation {
        stake_credential: Normalized<StakeCredential>,
        pool_keyhash: JsonValue,
        #[serde(skip_serializing_if = "Option::is_none")]
        pool_id: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        drep: Option<DRep>,
    },
}

impl Certificate {
    /// Variant name, as serialized in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            Certificate::StakeRegistration { .. } => "StakeRegistration",
            Certificate::StakeDeregistration { .. } => "StakeDeregistration",
            Certificate::StakeDelegation { .. } => "StakeDelegation",
            Certificate::Registration { .. } => "Registration",
            Certificate::Unregistration { .. } => "Unregistration",
            Certificate::VoteDelegation { .. } => "VoteDelegation",
            Certificate::StakeVoteDelegation { .. } => "StakeVoteDelegation",
        }
    }
}

/// Interpret `[0, hash]` as a key-hash credential.
fn key_hash_credential(value: &GenericValue) -> Option<StakeCredential> {
    match unwrap_set(value).as_array()? {
        [GenericValue::UInt(0), hash] => format_hex(hash).map(|hash| StakeCredential::KeyHash { hash }),
        _ => None,
    }
}

/// Normalize a stake credential; unrecognized shapes stay generic.
pub fn format_stake_credential(value: &GenericValue) -> Normalized<StakeCredential> {
    Normalized::shape(value, key_hash_credential)
}

/// Interpret a DRep argument. Unknown kinds yield `None`.
pub fn format_drep(value: &GenericValue) -> Option<DRep> {
    let items = unwrap_set(value).as_array()?;
    match items.first()?.as_uint()? {
        0 => {
            let hash = items.get(1)?;
            let drep_id = hash.as_bytes().and_then(drep_id);
            Some(DRep::KeyHash {
                hash: format_hex(hash)?,
                drep_id,
            })
        }
        1 => Some(DRep::AlwaysAbstain),
        2 => Some(DRep::AlwaysNoConfidence),
        kind => {
            debug!(kind, "dropping unrecognized drep");
            None
        }
    }
}

fn pool_fields(value: Option<&GenericValue>) -> (JsonValue, Option<String>) {
    match value.map(unwrap_set) {
        Some(GenericValue::ByteString(hash)) => (JsonValue::String(hex::encode(hash)), pool_id(hash)),
        Some(other) => (format_value(other), None),
        None => (JsonValue::Null, None),
    }
}

/// Normalize one certificate. Unrecognized codes yield `None`.
pub fn format_certificate(value: &GenericValue) -> Option<Certificate> {
    let items = unwrap_set(value).as_array()?;
    let code = items.first()?.as_uint()?;

    let stake_credential = items
        .get(1)
        .map(format_stake_credential)
        .unwrap_or(Normalized::Raw(JsonValue::Null));
    let deposit = || items.get(2).and_then(format_coin);
    let drep = |idx: usize| items.get(idx).and_then(format_drep);

    let certificate = match code {
        0 => Certificate::StakeRegistration { stake_credential },
        1 => Certificate::StakeDeregistration { stake_credential },
        2 => {
            let (pool_keyhash, pool_id) = pool_fields(items.get(2));
            Certificate::StakeDelegation {
                stake_credential,
                pool_keyhash,
                pool_id,
            }
        }
        7 => Certificate::Registration {
            stake_credential,
            deposit: deposit(),
        },
        8 => Certificate::Unregistration {
            stake_credential,
            deposit: deposit(),
        },
        9 | 15 => Certificate::VoteDelegation {
            stake_credential,
            drep: drep(2),
        },
        10 => {
            let (pool_keyhash, pool_id) = pool_fields(items.get(2));
            Certificate::StakeVoteDelegation {
                stake_credential,
                pool_keyhash,
                pool_id,
                drep: drep(3),
            }
        }
        _ => {
            debug!(code, "dropping unrecognized certificate");
            return None;
        }
    };

    Some(certificate)
}

/// Normalize a certificate list, dropping entries that are not recognized.
pub fn format_certificates(value: &GenericValue) -> Normalized<Vec<Certificate>> {
    Normalized::shape(value, |value| {
        let items = unwrap_set(value).as_array()?;
        Some(items.iter().filter_map(format_certificate).collect())
    })
}
