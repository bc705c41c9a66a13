//! Cardano address encoding (bech32) and standalone address inspection.

use crate::cbor::GenericValue;
use crate::decode::value::unwrap_set;
use crate::error::{DecodeError, Error, Result};
use bech32::{FromBase32, ToBase32, Variant};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Size of a key or script hash.
const HASH_LEN: usize = 28;

/// CIP-0129 header for a key-hash DRep credential.
const DREP_KEY_HASH_HEADER: u8 = 0x22;

/// Bech32-encode `bytes` under `hrp`.
pub fn encode_bech32(hrp: &str, bytes: &[u8]) -> std::result::Result<String, DecodeError> {
    bech32::encode(hrp, bytes.to_base32(), Variant::Bech32)
        .map_err(|e| DecodeError::EncodingFailure(e.to_string()))
}

fn is_mainnet(header: u8) -> bool {
    header & 0x0f == 1
}

fn is_reward_kind(header: u8) -> bool {
    matches!(header >> 4, 14 | 15)
}

/// Human-readable prefix selected by an address header byte.
pub fn address_prefix(header: u8) -> &'static str {
    match (is_reward_kind(header), is_mainnet(header)) {
        (true, true) => "stake",
        (true, false) => "stake_test",
        (false, true) => "addr",
        (false, false) => "addr_test",
    }
}

/// Bech32 form of raw address bytes, or `None` when encoding fails.
pub fn encode_address(bytes: &[u8]) -> Option<String> {
    let header = *bytes.first()?;
    encode_bech32(address_prefix(header), bytes)
        .map_err(|e| debug!(error = %e, "address falls back to hex"))
        .ok()
}

/// Bech32 form of a reward account, always under a `stake` prefix.
pub fn encode_reward_address(bytes: &[u8]) -> Option<String> {
    let header = *bytes.first()?;
    let hrp = if is_mainnet(header) { "stake" } else { "stake_test" };
    encode_bech32(hrp, bytes)
        .map_err(|e| debug!(error = %e, "reward address falls back to hex"))
        .ok()
}

/// Format an address field: bytes become bech32 (hex on failure), text is
/// assumed to be formatted already.
pub fn format_address(value: &GenericValue) -> Option<String> {
    match unwrap_set(value) {
        GenericValue::TextString(text) => Some(text.clone()),
        GenericValue::ByteString(bytes) => {
            Some(encode_address(bytes).unwrap_or_else(|| hex::encode(bytes)))
        }
        _ => None,
    }
}

/// Bech32 pool id of a pool key hash.
pub fn pool_id(hash: &[u8]) -> Option<String> {
    if !matches!(hash.len(), 28 | 29) {
        return None;
    }
    encode_bech32("pool", hash).ok()
}

/// CIP-0129 bech32 id of a key-hash DRep.
pub fn drep_id(hash: &[u8]) -> Option<String> {
    if hash.len() != HASH_LEN {
        return None;
    }
    let mut payload = Vec::with_capacity(HASH_LEN + 1);
    payload.push(DREP_KEY_HASH_HEADER);
    payload.extend_from_slice(hash);
    encode_bech32("drep", &payload).ok()
}

/// Decoded address with all components.
pub struct DecodedAddress {
    /// The original bech32 string.
    pub bech32: String,
    /// The address type.
    pub address_type: AddressType,
    /// Network (mainnet or testnet).
    pub network: Network,
    /// Payment credential (if applicable).
    pub payment_credential: Option<DecodedCredential>,
    /// Stake credential (if applicable).
    pub stake_credential: Option<DecodedCredential>,
    /// Pointer info for pointer addresses.
    pub pointer: Option<Pointer>,
}

/// Shelley address kinds (CIP-19).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    Base,
    Enterprise,
    Reward,
    Pointer,
}

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressType::Base => "base",
            AddressType::Enterprise => "enterprise",
            AddressType::Reward => "reward",
            AddressType::Pointer => "pointer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AddressType::Base => "Base (Shelley)",
            AddressType::Enterprise => "Enterprise (Shelley, no staking)",
            AddressType::Reward => "Reward/Stake",
            AddressType::Pointer => "Pointer (Shelley)",
        }
    }
}

/// Network enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
    Unknown,
}

impl Network {
    fn from_header(header: u8) -> Self {
        match header & 0x0f {
            0 => Network::Testnet,
            1 => Network::Mainnet,
            _ => Network::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Unknown => "unknown",
        }
    }
}

/// Decoded credential.
pub struct DecodedCredential {
    pub cred_type: CredentialType,
    /// Hash in hex.
    pub hash: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialType {
    KeyHash,
    ScriptHash,
}

impl CredentialType {
    fn from_bit(is_script: bool) -> Self {
        if is_script {
            CredentialType::ScriptHash
        } else {
            CredentialType::KeyHash
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::KeyHash => "keyhash",
            CredentialType::ScriptHash => "scripthash",
        }
    }
}

/// Pointer info for pointer addresses.
pub struct Pointer {
    pub slot: u64,
    pub tx_index: u64,
    pub cert_index: u64,
}

fn credential(bytes: &[u8], is_script: bool) -> DecodedCredential {
    DecodedCredential {
        cred_type: CredentialType::from_bit(is_script),
        hash: hex::encode(bytes),
    }
}

/// Read a base-128 variable-length natural (pointer address component).
fn read_varint(bytes: &[u8], pos: &mut usize) -> Option<u64> {
    let mut value: u64 = 0;
    loop {
        let byte = *bytes.get(*pos)?;
        *pos += 1;
        value = value.checked_mul(128)? | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
}

/// Decode a bech32 Shelley address into its components.
pub fn decode_address(addr_str: &str) -> Result<DecodedAddress> {
    let invalid = |reason: &str| Error::InvalidAddress(format!("{}: {}", addr_str, reason));

    let (_hrp, data, _variant) =
        bech32::decode(addr_str).map_err(|e| invalid(&e.to_string()))?;
    let bytes = Vec::<u8>::from_base32(&data).map_err(|e| invalid(&e.to_string()))?;

    let header = *bytes.first().ok_or_else(|| invalid("empty payload"))?;
    let network = Network::from_header(header);
    let kind = header >> 4;
    let first_is_script = header & 0x10 != 0;
    let second_is_script = header & 0x20 != 0;
    let first = bytes.get(1..1 + HASH_LEN);

    let (address_type, payment_credential, stake_credential, pointer) = match kind {
        0..=3 => {
            if bytes.len() != 1 + 2 * HASH_LEN {
                return Err(invalid("base address must be 57 bytes"));
            }
            (
                AddressType::Base,
                Some(credential(&bytes[1..1 + HASH_LEN], first_is_script)),
                Some(credential(&bytes[1 + HASH_LEN..], second_is_script)),
                None,
            )
        }
        4 | 5 => {
            let payment = first.ok_or_else(|| invalid("pointer address too short"))?;
            let mut pos = 1 + HASH_LEN;
            let mut next = || read_varint(&bytes, &mut pos);
            let (slot, tx_index, cert_index) = match (next(), next(), next()) {
                (Some(slot), Some(tx_index), Some(cert_index)) => (slot, tx_index, cert_index),
                _ => return Err(invalid("truncated pointer")),
            };
            (
                AddressType::Pointer,
                Some(credential(payment, first_is_script)),
                None,
                Some(Pointer {
                    slot,
                    tx_index,
                    cert_index,
                }),
            )
        }
        6 | 7 | 14 | 15 => {
            if bytes.len() != 1 + HASH_LEN {
                return Err(invalid("address must be 29 bytes"));
            }
            let cred = Some(credential(&bytes[1..], first_is_script));
            if kind >= 14 {
                (AddressType::Reward, None, cred, None)
            } else {
                (AddressType::Enterprise, cred, None, None)
            }
        }
        _ => return Err(invalid("not a Shelley address")),
    };

    Ok(DecodedAddress {
        bech32: addr_str.to_string(),
        address_type,
        network,
        payment_credential,
        stake_credential,
        pointer,
    })
}

impl DecodedAddress {
    /// Convert to JSON.
    pub fn to_json(&self) -> JsonValue {
        let mut json = serde_json::json!({
            "address": self.bech32,
            "type": self.address_type.as_str(),
            "network": self.network.as_str()
        });

        if let Some(ref payment) = self.payment_credential {
            json["payment_credential"] = serde_json::json!({
                "type": payment.cred_type.as_str(),
                "hash": payment.hash
            });
        }

        if let Some(ref stake) = self.stake_credential {
            json["stake_credential"] = serde_json::json!({
                "type": stake.cred_type.as_str(),
                "hash": stake.hash
            });
        }

        if let Some(ref ptr) = self.pointer {
            json["pointer"] = serde_json::json!({
                "slot": ptr.slot,
                "tx_index": ptr.tx_index,
                "cert_index": ptr.cert_index
            });
        }

        json
    }

    /// Format as pretty string for terminal output.
    pub fn to_pretty(&self) -> String {
        use colored::Colorize;

        let mut output = format!("{}\n", "Address Details".bold().cyan());
        output.push_str(&format!("  {}: {}\n", "Address".bold(), self.bech32));
        output.push_str(&format!(
            "  {}: {}\n",
            "Type".bold(),
            self.address_type.description().green()
        ));

        let network = match self.network {
            Network::Mainnet => self.network.as_str().yellow(),
            _ => self.network.as_str().blue(),
        };
        output.push_str(&format!("  {}: {}\n", "Network".bold(), network));

        for (label, cred) in [
            ("Payment", &self.payment_credential),
            ("Stake", &self.stake_credential),
        ] {
            if let Some(cred) = cred {
                output.push_str(&format!(
                    "  {}: {} {}\n",
                    label.bold(),
                    cred.cred_type.as_str().cyan(),
                    cred.hash.dimmed()
                ));
            }
        }

        if let Some(ref ptr) = self.pointer {
            output.push_str(&format!(
                "  {}: slot={}, tx={}, cert={}\n",
                "Pointer".bold(),
                ptr.slot,
                ptr.tx_index,
                ptr.cert_index
            ));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reward_account(header: u8) -> Vec<u8> {
        let mut bytes = vec![header];
        bytes.extend_from_slice(&[0x11; HASH_LEN]);
        bytes
    }

    #[test]
    fn test_address_prefixes() {
        assert_eq!(address_prefix(0x01), "addr");
        assert_eq!(address_prefix(0x60), "addr_test");
        assert_eq!(address_prefix(0xe1), "stake");
        assert_eq!(address_prefix(0xf0), "stake_test");
    }

    #[test]
    fn test_encode_address_enterprise_mainnet() {
        let addr = encode_address(&reward_account(0x61)).unwrap();
        assert!(addr.starts_with("addr1v"), "{}", addr);
    }

    #[test]
    fn test_encode_reward_address() {
        let addr = encode_reward_address(&reward_account(0xe1)).unwrap();
        assert!(addr.starts_with("stake1u"), "{}", addr);

        let addr = encode_reward_address(&reward_account(0xe0)).unwrap();
        assert!(addr.starts_with("stake_test1u"), "{}", addr);
    }

    #[test]
    fn test_format_address_is_idempotent() {
        let bytes = GenericValue::ByteString(reward_account(0x61));
        let once = format_address(&bytes).unwrap();
        let twice = format_address(&GenericValue::TextString(once.clone())).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_format_address_empty_bytes_falls_back_to_hex() {
        assert_eq!(
            format_address(&GenericValue::ByteString(vec![])),
            Some(String::new())
        );
        assert_eq!(format_address(&GenericValue::UInt(3)), None);
    }

    #[test]
    fn test_pool_id() {
        let id = pool_id(&[0x42; 28]).unwrap();
        assert!(id.starts_with("pool1"));
        assert!(pool_id(&[0x42; 27]).is_none());
    }

    #[test]
    fn test_drep_id_has_cip129_header() {
        let id = drep_id(&[0x00; 28]).unwrap();
        assert!(id.starts_with("drep1y"), "{}", id);

        let (_, data, _) = bech32::decode(&id).unwrap();
        let payload = Vec::<u8>::from_base32(&data).unwrap();
        assert_eq!(payload[0], DREP_KEY_HASH_HEADER);
        assert_eq!(payload.len(), 29);
        assert!(drep_id(&[0x00; 20]).is_none());
    }

    #[test]
    fn test_decode_round_trip_reward() {
        let addr = encode_reward_address(&reward_account(0xe1)).unwrap();
        let decoded = decode_address(&addr).unwrap();
        assert_eq!(decoded.address_type, AddressType::Reward);
        assert_eq!(decoded.network, Network::Mainnet);
        assert!(decoded.payment_credential.is_none());
        let stake = decoded.stake_credential.unwrap();
        assert_eq!(stake.cred_type, CredentialType::KeyHash);
        assert_eq!(stake.hash, "11".repeat(28));
    }

    #[test]
    fn test_decode_base_address() {
        let mut bytes = vec![0x30];
        bytes.extend_from_slice(&[0xaa; HASH_LEN]);
        bytes.extend_from_slice(&[0xbb; HASH_LEN]);
        let addr = encode_address(&bytes).unwrap();

        let decoded = decode_address(&addr).unwrap();
        assert_eq!(decoded.address_type, AddressType::Base);
        assert_eq!(decoded.network, Network::Testnet);
        let payment = decoded.payment_credential.unwrap();
        let stake = decoded.stake_credential.unwrap();
        assert_eq!(payment.cred_type, CredentialType::ScriptHash);
        assert_eq!(stake.cred_type, CredentialType::ScriptHash);
        assert_eq!(stake.hash, "bb".repeat(28));

        let json = decoded_json(&addr);
        assert_eq!(json["type"], "base");
        assert_eq!(json["network"], "testnet");
    }

    #[test]
    fn test_decode_pointer_address() {
        let mut bytes = vec![0x41];
        bytes.extend_from_slice(&[0xcc; HASH_LEN]);
        // slot 300 = 0x82 0x2c, tx 2, cert 0
        bytes.extend_from_slice(&[0x82, 0x2c, 0x02, 0x00]);
        let addr = encode_address(&bytes).unwrap();

        let decoded = decode_address(&addr).unwrap();
        assert_eq!(decoded.address_type, AddressType::Pointer);
        let ptr = decoded.pointer.unwrap();
        assert_eq!((ptr.slot, ptr.tx_index, ptr.cert_index), (300, 2, 0));
    }

    #[test]
    fn test_decode_invalid_address() {
        assert!(matches!(
            decode_address("not-an-address"),
            Err(Error::InvalidAddress(_))
        ));

        let addr = encode_bech32("addr", &[0x61, 0x01]).unwrap();
        assert!(matches!(
            decode_address(&addr),
            Err(Error::InvalidAddress(_))
        ));
    }

    fn decoded_json(addr: &str) -> JsonValue {
        decode_address(addr).unwrap().to_json()
    }
}
