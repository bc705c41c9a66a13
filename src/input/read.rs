//! Input reading implementation.

use crate::cli::InputSpec;
use crate::error::{Error, Result};
use crate::input::InputSource;
use crate::input::detect::{is_hex_text, strip_hex_prefix};
use std::fs;
use std::io::{self, Read};
use tracing::debug;

/// Read the input and return it as a lowercase hex payload.
pub fn read_input(spec: &InputSpec) -> Result<String> {
    let source = InputSource::from_spec(spec)?;

    match source {
        InputSource::Hex(hex) => Ok(hex),

        InputSource::File(path) => {
            let buffer = fs::read(&path).map_err(|e| Error::IoError {
                path: Some(path.clone()),
                source: e,
            })?;
            debug!(path = %path.display(), len = buffer.len(), "read input file");
            payload_from_bytes(buffer)
        }

        InputSource::Stdin => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .map_err(|e| Error::IoError {
                    path: None,
                    source: e,
                })?;
            debug!(len = buffer.len(), "read stdin");
            payload_from_bytes(buffer)
        }
    }
}

/// Hex text is used as-is, anything else is binary CBOR.
fn payload_from_bytes(buffer: Vec<u8>) -> Result<String> {
    let Ok(text) = std::str::from_utf8(&buffer) else {
        return Ok(hex::encode(&buffer));
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::NoInput);
    }

    if is_hex_text(trimmed) {
        Ok(strip_hex_prefix(trimmed).to_lowercase())
    } else {
        Ok(hex::encode(&buffer))
    }
}
