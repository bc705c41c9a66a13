//! Input source detection.

use crate::cli::InputSpec;
use crate::error::{Error, Result};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Resolved input source ready for reading.
#[derive(Debug)]
pub enum InputSource {
    /// Read from a file path.
    File(PathBuf),
    /// Validated hex payload, prefix stripped.
    Hex(String),
    /// Read from stdin.
    Stdin,
}

impl InputSource {
    /// Create an InputSource from an InputSpec.
    pub fn from_spec(spec: &InputSpec) -> Result<Self> {
        match spec {
            InputSpec::Stdin => {
                // Nothing piped in
                if std::io::stdin().is_terminal() {
                    return Err(Error::NoInput);
                }
                Ok(InputSource::Stdin)
            }

            InputSpec::File(path) => {
                if !path.exists() {
                    return Err(Error::FileNotFound(path.clone()));
                }
                Ok(InputSource::File(path.clone()))
            }

            InputSpec::Hex(hex_str) => {
                let hex_str = strip_hex_prefix(hex_str.trim());
                hex::decode(hex_str)?;
                Ok(InputSource::Hex(hex_str.to_lowercase()))
            }
        }
    }
}

/// Drop an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(text: &str) -> &str {
    text.strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text)
}

/// Whether `text` is a non-empty run of hex digits (prefix allowed).
pub fn is_hex_text(text: &str) -> bool {
    let digits = strip_hex_prefix(text);
    digits.len() >= 2 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_input() {
        let spec = InputSpec::Hex("0x84A400".to_string());
        let source = InputSource::from_spec(&spec).unwrap();
        match source {
            InputSource::Hex(h) => assert_eq!(h, "84a400"),
            _ => panic!("Expected Hex"),
        }
    }

    #[test]
    fn test_invalid_hex() {
        let spec = InputSpec::Hex("not_hex".to_string());
        assert!(matches!(
            InputSource::from_spec(&spec),
            Err(Error::InvalidHex(_))
        ));

        let odd = InputSpec::Hex("84a".to_string());
        assert!(InputSource::from_spec(&odd).is_err());
    }

    #[test]
    fn test_file_not_found() {
        let spec = InputSpec::File(PathBuf::from("/nonexistent/file.cbor"));
        let result = InputSource::from_spec(&spec);
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[test]
    fn test_is_hex_text() {
        assert!(is_hex_text("80"));
        assert!(is_hex_text("0x84a0"));
        assert!(!is_hex_text("8"));
        assert!(!is_hex_text("0x"));
        assert!(!is_hex_text("tx.cbor"));
    }
}
