//! The generic CBOR value tree.

use std::fmt;

/// A decoded CBOR data item.
///
/// Maps keep their entries in source order, duplicates included; collapsing
/// duplicate keys is left to the consumers that stringify them.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericValue {
    UInt(u64),
    NegInt(i64),
    ByteString(Vec<u8>),
    TextString(String),
    Array(Vec<GenericValue>),
    Map(Vec<(GenericValue, GenericValue)>),
    Tagged(u64, Box<GenericValue>),
    Bool(bool),
    Null,
    Float(f64),
}

impl GenericValue {
    /// The unsigned integer, if this is one.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            GenericValue::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// The raw bytes, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            GenericValue::ByteString(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[GenericValue]> {
        match self {
            GenericValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The entries, if this is a map.
    pub fn as_map(&self) -> Option<&[(GenericValue, GenericValue)]> {
        match self {
            GenericValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, GenericValue::Null)
    }

    /// Short name of the variant, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            GenericValue::UInt(_) => "uint",
            GenericValue::NegInt(_) => "negint",
            GenericValue::ByteString(_) => "bytes",
            GenericValue::TextString(_) => "text",
            GenericValue::Array(_) => "array",
            GenericValue::Map(_) => "map",
            GenericValue::Tagged(_, _) => "tag",
            GenericValue::Bool(_) => "bool",
            GenericValue::Null => "null",
            GenericValue::Float(_) => "float",
        }
    }
}

/// CBOR diagnostic notation (RFC 8949, section 8).
impl fmt::Display for GenericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenericValue::UInt(n) => write!(f, "{}", n),
            GenericValue::NegInt(n) => write!(f, "{}", n),
            GenericValue::ByteString(bytes) => write!(f, "h'{}'", hex::encode(bytes)),
            GenericValue::TextString(text) => write!(f, "{:?}", text),
            GenericValue::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            GenericValue::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
            GenericValue::Tagged(tag, inner) => write!(f, "{}({})", tag, inner),
            GenericValue::Bool(b) => write!(f, "{}", b),
            GenericValue::Null => f.write_str("null"),
            GenericValue::Float(x) if x.is_nan() => f.write_str("NaN"),
            GenericValue::Float(x) if x.is_infinite() => {
                f.write_str(if *x > 0.0 { "Infinity" } else { "-Infinity" })
            }
            GenericValue::Float(x) => write!(f, "{:?}", x),
        }
    }
}
