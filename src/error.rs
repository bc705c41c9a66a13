//! Error types for cdx.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for cdx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading and parsing a CBOR payload.
///
/// These never escape [`crate::decode::decode`]: the assembler turns them
/// into the error envelope. They do surface from lower-level entry points
/// such as [`crate::cbor::parse_hex`] and [`crate::hash::body_hash`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Empty, odd-length or non-hex input text.
    #[error("{0}")]
    MalformedInput(String),

    /// The cursor ran out of bytes in the middle of a read.
    #[error("Unexpected end of input while reading transaction")]
    UnexpectedEof,

    /// Indefinite lengths, reserved additional info or unknown simple values.
    #[error("{0}")]
    UnsupportedEncoding(String),

    /// A 64-bit length or value above the safe integer range.
    #[error("Encountered integer larger than MAX_SAFE_INTEGER")]
    IntegerOverflow,

    /// Bech32 encoding of an address, pool id or DRep id failed.
    #[error("Bech32 encoding failed: {0}")]
    EncodingFailure(String),
}

/// Errors that can occur in cdx.
#[derive(Error, Debug)]
pub enum Error {
    /// No input was provided (no file, no stdin, no hex).
    #[error("No input provided. Use: cdx <file>, cdx <hex>, or pipe CBOR to stdin")]
    NoInput,

    /// The specified file was not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// An I/O error occurred.
    #[error("IO error{}: {source}", path.as_ref().map(|p| format!(" reading {}", p.display())).unwrap_or_default())]
    IoError {
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    /// Invalid hex input.
    #[error("Invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Low-level CBOR failure outside the decode envelope.
    #[error("Failed to parse CBOR: {0}")]
    Cbor(#[from] DecodeError),

    /// The transaction decoded to the error envelope.
    #[error("Failed to decode transaction: {0}")]
    DecodeFailed(String),

    /// Re-encoding a value for hashing failed.
    #[error("Failed to encode CBOR: {0}")]
    EncodeFailed(String),

    /// Invalid query syntax.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Requested field was not found.
    #[error("Field not found: '{0}'")]
    FieldNotFound(String),

    /// Array index out of bounds.
    #[error("Index {0} out of bounds")]
    IndexOutOfBounds(usize),

    /// Output formatting error.
    #[error("Format error: {0}")]
    FormatError(String),

    /// A bech32 string that is not a Shelley-era Cardano address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Error {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            // Validation failure (--check mode)
            Error::DecodeFailed(_) | Error::Cbor(_) | Error::EncodeFailed(_) => 1,
            // Parse errors
            Error::InvalidHex(_) | Error::InvalidAddress(_) => 2,
            // I/O errors
            Error::NoInput | Error::FileNotFound(_) | Error::IoError { .. } => 3,
            // Query errors
            Error::InvalidQuery(_) | Error::FieldNotFound(_) | Error::IndexOutOfBounds(_) => 4,
            // Format errors
            Error::FormatError(_) => 5,
        }
    }
}
