//! Coin (lovelace) normalization.

use crate::cbor::GenericValue;
use crate::decode::value::unwrap_set;
use num_bigint::BigUint;

/// CBOR tag for positive bignums.
const POSITIVE_BIGNUM_TAG: u64 = 2;

/// Lovelace per ADA.
const LOVELACE_PER_ADA: u32 = 1_000_000;

/// Decimal string form of a coin, whatever its CBOR encoding.
///
/// Integers and floats print in decimal, byte strings (bare or as tag-2
/// bignums) are read as big-endian magnitudes, text is kept as-is.
pub fn format_coin(value: &GenericValue) -> Option<String> {
    match unwrap_set(value) {
        GenericValue::UInt(n) => Some(n.to_string()),
        GenericValue::NegInt(n) => Some(n.to_string()),
        GenericValue::Float(x) if x.is_finite() => Some(x.to_string()),
        GenericValue::ByteString(bytes) => Some(BigUint::from_bytes_be(bytes).to_string()),
        GenericValue::Tagged(POSITIVE_BIGNUM_TAG, inner) => match inner.as_ref() {
            GenericValue::ByteString(bytes) => Some(BigUint::from_bytes_be(bytes).to_string()),
            _ => None,
        },
        GenericValue::TextString(text) => Some(text.clone()),
        _ => None,
    }
}

/// Parse a decimal lovelace amount.
pub fn parse_lovelace(amount: &str) -> Option<BigUint> {
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    amount.parse().ok()
}

/// ADA representation of a lovelace amount: six decimals at most, trailing
/// zeros trimmed.
pub fn lovelace_to_ada(lovelace: &BigUint) -> String {
    let per_ada = BigUint::from(LOVELACE_PER_ADA);
    let whole = lovelace / &per_ada;
    let fraction = format!("{:0>6}", (lovelace % &per_ada).to_string());
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coin_encodings() {
        assert_eq!(
            format_coin(&GenericValue::UInt(171_617)),
            Some("171617".to_string())
        );
        assert_eq!(
            format_coin(&GenericValue::ByteString(vec![0x01, 0x00])),
            Some("256".to_string())
        );
        assert_eq!(
            format_coin(&GenericValue::Tagged(
                2,
                Box::new(GenericValue::ByteString(vec![
                    0x01, 0, 0, 0, 0, 0, 0, 0, 0
                ]))
            )),
            Some("18446744073709551616".to_string())
        );
        assert_eq!(
            format_coin(&GenericValue::TextString("42".into())),
            Some("42".to_string())
        );
        assert_eq!(format_coin(&GenericValue::Array(vec![])), None);
    }

    #[test]
    fn test_parse_lovelace() {
        assert_eq!(parse_lovelace("5000000"), Some(BigUint::from(5_000_000u32)));
        assert_eq!(parse_lovelace(""), None);
        assert_eq!(parse_lovelace("-1"), None);
        assert_eq!(parse_lovelace("12abc"), None);
    }

    #[test]
    fn test_lovelace_to_ada() {
        assert_eq!(lovelace_to_ada(&BigUint::from(5_000_000u32)), "5");
        assert_eq!(lovelace_to_ada(&BigUint::from(1_500_000u32)), "1.5");
        assert_eq!(lovelace_to_ada(&BigUint::from(171_617u32)), "0.171617");
        assert_eq!(lovelace_to_ada(&BigUint::from(1u32)), "0.000001");
        assert_eq!(lovelace_to_ada(&BigUint::from(0u32)), "0");
    }
}
