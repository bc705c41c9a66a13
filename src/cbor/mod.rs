//! Hand-written CBOR reader and value parser.

mod parser;
mod reader;
mod value;

pub use parser::{parse_bytes, parse_hex, read_value};
pub use reader::{ByteCursor, MAX_SAFE_INTEGER};
pub use value::GenericValue;
