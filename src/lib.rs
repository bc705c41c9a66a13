//! cdx - Cardano transaction decoder.
//!
//! Turns hex or binary CBOR Cardano transactions into a normalized,
//! JSON-serializable structure: byte strings become hex, addresses become
//! bech32, certificates and withdrawals get readable shapes.
//!
//! # Layers
//!
//! - [`cbor`]: byte cursor and a recursive CBOR parser producing [`cbor::GenericValue`]
//! - [`decode`]: Cardano-aware normalization and the transaction assembler
//! - [`hash`]: Blake2b-256 body hash over the re-encoded body
//! - [`query`], [`format`]: dot-path queries and terminal/JSON/diagnostic output
//!
//! Decoding never fails: malformed payloads produce an error envelope.
//!
//! ```
//! let tx = cdx::decode::decode("80");
//! assert_eq!(tx.to_json()["raw"], serde_json::json!([]));
//! ```

pub mod cbor;
pub mod cli;
pub mod decode;
pub mod error;
pub mod format;
pub mod hash;
pub mod input;
pub mod logging;
pub mod query;

pub use cli::Args;
pub use decode::{CardanoDecodedTransaction, decode, decode_bytes};
pub use error::{Error, Result};

use cli::Command;
use decode::decode_address;
use format::format_output;
use input::read_input;
use query::execute_query;
use tracing::info;

/// Run cdx with the given arguments.
pub fn run(args: &Args) -> Result<()> {
    if let Some(Command::Address { address, json }) = &args.command {
        let decoded = decode_address(address)?;
        let output = if *json || args.json {
            serde_json::to_string_pretty(&decoded.to_json())
                .map_err(|e| Error::FormatError(e.to_string()))?
        } else {
            decoded.to_pretty()
        };
        println!("{}", output);
        return Ok(());
    }

    let (query_opt, input_spec) = args.resolve();

    let payload = read_input(&input_spec)?;
    info!(len = payload.len() / 2, "decoding transaction");

    let tx = decode(&payload);

    // Check mode: just validate and exit
    if args.check {
        return match tx.failure() {
            Some(failure) => Err(Error::DecodeFailed(failure.message.clone())),
            None => Ok(()),
        };
    }

    let query = query_opt.unwrap_or("");
    let result = execute_query(&tx, &payload, query)?;

    let output = format_output(&result, args)?;
    println!("{}", output);

    Ok(())
}
