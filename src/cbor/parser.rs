//! Recursive-descent CBOR parser.
//!
//! Only definite-length items are understood. Every array element, map entry
//! and tagged payload recurses into [`read_value`], one stack frame per level
//! of nesting.

use crate::cbor::reader::ByteCursor;
use crate::cbor::value::GenericValue;
use crate::error::DecodeError;

/// The eight CBOR major types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MajorType {
    UnsignedInt,
    NegativeInt,
    ByteString,
    TextString,
    Array,
    Map,
    Tag,
    Simple,
}

impl MajorType {
    fn from_header(byte: u8) -> Self {
        match byte >> 5 {
            0 => MajorType::UnsignedInt,
            1 => MajorType::NegativeInt,
            2 => MajorType::ByteString,
            3 => MajorType::TextString,
            4 => MajorType::Array,
            5 => MajorType::Map,
            6 => MajorType::Tag,
            _ => MajorType::Simple,
        }
    }
}

/// Read the argument encoded by the additional-info bits of a header.
fn read_length(cursor: &mut ByteCursor, additional_info: u8) -> Result<u64, DecodeError> {
    match additional_info {
        0..=23 => Ok(u64::from(additional_info)),
        24 => cursor.read_byte().map(u64::from),
        25 => cursor.read_u16().map(u64::from),
        26 => cursor.read_u32().map(u64::from),
        27 => cursor.read_u64(),
        _ => Err(DecodeError::UnsupportedEncoding(format!(
            "Unsupported length encoding: {}",
            additional_info
        ))),
    }
}

/// Length prefix of a byte or text string, as a slice length.
fn read_size(cursor: &mut ByteCursor, additional_info: u8) -> Result<usize, DecodeError> {
    let length = read_length(cursor, additional_info)?;
    usize::try_from(length).map_err(|_| DecodeError::IntegerOverflow)
}

/// Read one data item, recursing into containers.
pub fn read_value(cursor: &mut ByteCursor) -> Result<GenericValue, DecodeError> {
    let header = cursor.read_byte()?;
    let major_type = MajorType::from_header(header);
    let additional_info = header & 0x1f;

    match major_type {
        MajorType::UnsignedInt => read_length(cursor, additional_info).map(GenericValue::UInt),
        MajorType::NegativeInt => {
            let n = read_length(cursor, additional_info)?;
            // n <= 2^53 - 1, so -1 - n always fits.
            Ok(GenericValue::NegInt(-1 - n as i64))
        }
        MajorType::ByteString => {
            let size = read_size(cursor, additional_info)?;
            Ok(GenericValue::ByteString(cursor.read_bytes(size)?.to_vec()))
        }
        MajorType::TextString => {
            let size = read_size(cursor, additional_info)?;
            let bytes = cursor.read_bytes(size)?;
            Ok(GenericValue::TextString(
                String::from_utf8_lossy(bytes).into_owned(),
            ))
        }
        MajorType::Array => {
            let length = read_length(cursor, additional_info)?;
            // Cap the pre-allocation: a bogus length must fail on EOF, not on allocation.
            let mut items = Vec::with_capacity(length.min(cursor.remaining() as u64) as usize);
            for _ in 0..length {
                items.push(read_value(cursor)?);
            }
            Ok(GenericValue::Array(items))
        }
        MajorType::Map => {
            let length = read_length(cursor, additional_info)?;
            let mut entries = Vec::with_capacity(length.min(cursor.remaining() as u64) as usize);
            for _ in 0..length {
                let key = read_value(cursor)?;
                let value = read_value(cursor)?;
                entries.push((key, value));
            }
            Ok(GenericValue::Map(entries))
        }
        MajorType::Tag => {
            let tag = read_length(cursor, additional_info)?;
            let inner = read_value(cursor)?;
            Ok(GenericValue::Tagged(tag, Box::new(inner)))
        }
        MajorType::Simple => read_simple(cursor, additional_info),
    }
}

fn read_simple(cursor: &mut ByteCursor, additional_info: u8) -> Result<GenericValue, DecodeError> {
    match additional_info {
        20 => Ok(GenericValue::Bool(false)),
        21 => Ok(GenericValue::Bool(true)),
        22 | 23 => Ok(GenericValue::Null),
        24 => {
            cursor.read_byte()?;
            Ok(GenericValue::Null)
        }
        25 => cursor
            .read_u16()
            .map(|bits| GenericValue::Float(half_to_f64(bits))),
        26 => cursor
            .read_u32()
            .map(|bits| GenericValue::Float(f64::from(f32::from_bits(bits)))),
        27 => {
            let mut bits = [0u8; 8];
            bits.copy_from_slice(cursor.read_bytes(8)?);
            Ok(GenericValue::Float(f64::from_be_bytes(bits)))
        }
        _ => Err(DecodeError::UnsupportedEncoding(format!(
            "Unsupported special value: {}",
            additional_info
        ))),
    }
}

/// Decode an IEEE-754 binary16 value.
fn half_to_f64(half: u16) -> f64 {
    let sign = if half & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = i32::from((half & 0x7c00) >> 10);
    let fraction = f64::from(half & 0x03ff);

    match exponent {
        0 if fraction == 0.0 => sign * 0.0,
        // subnormal
        0 => sign * 2f64.powi(-14) * (fraction / 1024.0),
        0x1f if fraction == 0.0 => sign * f64::INFINITY,
        0x1f => f64::NAN,
        _ => sign * 2f64.powi(exponent - 15) * (1.0 + fraction / 1024.0),
    }
}

/// Parse the first data item of a hex payload.
///
/// Bytes after the first item are ignored.
pub fn parse_hex(text: &str) -> Result<GenericValue, DecodeError> {
    let mut cursor = ByteCursor::from_hex(text)?;
    read_value(&mut cursor)
}

/// Parse the first data item of a byte payload.
pub fn parse_bytes(bytes: &[u8]) -> Result<GenericValue, DecodeError> {
    let mut cursor = ByteCursor::new(bytes.to_vec());
    read_value(&mut cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(hex: &str) -> Result<GenericValue, DecodeError> {
        parse_hex(hex)
    }

    #[test]
    fn test_unsigned_integers() {
        assert_eq!(parse("00").unwrap(), GenericValue::UInt(0));
        assert_eq!(parse("17").unwrap(), GenericValue::UInt(23));
        assert_eq!(parse("1818").unwrap(), GenericValue::UInt(24));
        assert_eq!(parse("190100").unwrap(), GenericValue::UInt(256));
        assert_eq!(parse("1a004c4b40").unwrap(), GenericValue::UInt(5_000_000));
        assert_eq!(
            parse("1b000000e8d4a51000").unwrap(),
            GenericValue::UInt(1_000_000_000_000)
        );
    }

    #[test]
    fn test_negative_integers() {
        assert_eq!(parse("20").unwrap(), GenericValue::NegInt(-1));
        assert_eq!(parse("3863").unwrap(), GenericValue::NegInt(-100));
    }

    #[test]
    fn test_integer_overflow() {
        assert_eq!(parse("1bffffffffffffffff"), Err(DecodeError::IntegerOverflow));
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            parse("43010203").unwrap(),
            GenericValue::ByteString(vec![1, 2, 3])
        );
        assert_eq!(parse("40").unwrap(), GenericValue::ByteString(vec![]));
        assert_eq!(
            parse("6449455446").unwrap(),
            GenericValue::TextString("IETF".into())
        );
    }

    #[test]
    fn test_containers() {
        assert_eq!(
            parse("83010203").unwrap(),
            GenericValue::Array(vec![
                GenericValue::UInt(1),
                GenericValue::UInt(2),
                GenericValue::UInt(3)
            ])
        );
        assert_eq!(
            parse("a201020304").unwrap(),
            GenericValue::Map(vec![
                (GenericValue::UInt(1), GenericValue::UInt(2)),
                (GenericValue::UInt(3), GenericValue::UInt(4)),
            ])
        );
    }

    #[test]
    fn test_map_keeps_duplicate_keys() {
        let value = parse("a201020103").unwrap();
        assert_eq!(value.as_map().unwrap().len(), 2);
    }

    #[test]
    fn test_tagged() {
        assert_eq!(
            parse("d9010280").unwrap(),
            GenericValue::Tagged(258, Box::new(GenericValue::Array(vec![])))
        );
    }

    #[test]
    fn test_simple_values() {
        assert_eq!(parse("f4").unwrap(), GenericValue::Bool(false));
        assert_eq!(parse("f5").unwrap(), GenericValue::Bool(true));
        assert_eq!(parse("f6").unwrap(), GenericValue::Null);
        assert_eq!(parse("f7").unwrap(), GenericValue::Null);
        assert_eq!(parse("f8ff").unwrap(), GenericValue::Null);
        assert!(matches!(
            parse("f0"),
            Err(DecodeError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_half_precision_floats() {
        assert_eq!(parse("f93c00").unwrap(), GenericValue::Float(1.0));
        assert_eq!(parse("f93e00").unwrap(), GenericValue::Float(1.5));
        assert_eq!(parse("f9c400").unwrap(), GenericValue::Float(-4.0));
        assert_eq!(parse("f97bff").unwrap(), GenericValue::Float(65504.0));
        assert_eq!(
            parse("f90001").unwrap(),
            GenericValue::Float(5.960464477539063e-8)
        );
        assert_eq!(parse("f97c00").unwrap(), GenericValue::Float(f64::INFINITY));
        assert_eq!(
            parse("f9fc00").unwrap(),
            GenericValue::Float(f64::NEG_INFINITY)
        );
        match parse("f97e00").unwrap() {
            GenericValue::Float(x) => assert!(x.is_nan()),
            other => panic!("Expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_single_and_double_floats() {
        assert_eq!(parse("fa47c35000").unwrap(), GenericValue::Float(100000.0));
        assert_eq!(
            parse("fb3ff199999999999a").unwrap(),
            GenericValue::Float(1.1)
        );
    }

    #[test]
    fn test_indefinite_length_unsupported() {
        assert!(matches!(
            parse("9f01ff"),
            Err(DecodeError::UnsupportedEncoding(_))
        ));
        assert!(matches!(
            parse("5f4101ff"),
            Err(DecodeError::UnsupportedEncoding(_))
        ));
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(parse("1a0001"), Err(DecodeError::UnexpectedEof));
        assert_eq!(parse("8301"), Err(DecodeError::UnexpectedEof));
        assert_eq!(parse("45010203"), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_huge_declared_length_fails_cleanly() {
        assert_eq!(parse("9a7fffffff"), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn test_parse_bytes_matches_hex() {
        assert_eq!(
            parse_bytes(&[0x82, 0x01, 0x02]).unwrap(),
            parse_hex("820102").unwrap()
        );
    }
}
