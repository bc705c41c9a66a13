//! CLI argument parsing for cdx.

use crate::input::is_hex_text;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Cardano transaction decoder.
///
/// Decodes hex or binary CBOR transactions into normalized JSON, with
/// bech32 addresses, readable certificates and summed withdrawals.
#[derive(Parser, Debug)]
#[command(
    name = "cdx",
    version,
    about = "Decode Cardano CBOR transactions",
    after_help = r#"EXAMPLES:
    cdx tx.cbor                    Show full transaction (pretty)
    cdx 84a400...                  Decode a hex argument
    cat tx.hex | cdx               Read from stdin
    cdx fee tx.cbor                Query specific field
    cdx fee tx.cbor --ada          Show fee in ADA
    cdx outputs.0.address tx.cbor  Nested field access
    cdx outputs.*.address tx.cbor  Wildcard (all addresses)
    cdx witnesses.0 tx.cbor        Numeric map key (vkey witnesses)
    cdx tx.cbor --json             JSON output
    cdx tx.cbor --raw              CBOR diagnostic notation
    cdx tx.cbor --check            Validate only (exit code)
    cdx addr addr1q8mnd...         Decode any Cardano address

QUERY SHORTCUTS:
    fee        → body.fee
    inputs     → body.inputs
    outputs    → body.outputs
    metadata   → auxiliary_data
    witnesses  → witness_set
    hash       → (blake2b-256 of the body)"#
)]
pub struct Args {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Query path or input (file path / hex string).
    /// If one argument: treated as input.
    /// If two arguments: first is query, second is input.
    #[arg(value_name = "QUERY_OR_INPUT")]
    pub first: Option<String>,

    /// Input file or hex string when query is provided.
    #[arg(value_name = "INPUT")]
    pub second: Option<String>,

    /// Output as JSON.
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Output raw CBOR diagnostic notation.
    #[arg(long, short = 'r')]
    pub raw: bool,

    /// Display ADA amounts instead of lovelace.
    #[arg(long, short = 'a', env = "CDX_ADA")]
    pub ada: bool,

    /// Validate only (exit code indicates result: 0=valid, 1=invalid).
    #[arg(long, short = 'c')]
    pub check: bool,

    /// Disable colored output.
    #[arg(long, env = "CDX_NO_COLOR")]
    pub no_color: bool,

    /// Increase log verbosity on stderr (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode and display a Cardano address.
    ///
    /// Parses a bech32 Shelley address and shows its type (base,
    /// enterprise, reward, pointer), network and credentials.
    #[command(name = "addr")]
    Address {
        /// The bech32 address to decode (e.g., addr1..., stake1..., addr_test1...).
        address: String,

        /// Output as JSON.
        #[arg(long, short = 'j')]
        json: bool,
    },
}

/// Specifies how to obtain the input payload.
#[derive(Debug, Clone)]
pub enum InputSpec {
    /// Read from stdin.
    Stdin,
    /// Read from a file path.
    File(PathBuf),
    /// Hex string given on the command line.
    Hex(String),
}

impl Args {
    /// Resolve the query and input from positional arguments.
    ///
    /// Returns (optional query path, input specification).
    pub fn resolve(&self) -> (Option<&str>, InputSpec) {
        match (&self.first, &self.second) {
            (None, _) => (None, InputSpec::Stdin),

            // One argument: could be query (with stdin) or input
            (Some(first), None) => {
                if Self::looks_like_query(first) {
                    (Some(first.as_str()), InputSpec::Stdin)
                } else {
                    (None, InputSpec::detect(first))
                }
            }

            (Some(query), Some(input)) => (Some(query.as_str()), InputSpec::detect(input)),
        }
    }

    /// Heuristic to determine if a string looks like a query path.
    fn looks_like_query(s: &str) -> bool {
        if crate::query::is_shortcut(s) {
            return true;
        }

        let file_extensions = [".cbor", ".bin", ".hex", ".raw", ".tx", ".json"];
        if file_extensions.iter().any(|ext| s.ends_with(ext)) {
            return false;
        }

        if s.contains(['.', '*', '[']) {
            return true;
        }

        s.starts_with("body") || s.starts_with("auxiliary") || s.starts_with("witness")
    }
}

impl InputSpec {
    /// Detect input type from a string argument.
    ///
    /// Existing paths are files; otherwise hex digits (with an optional
    /// `0x` prefix) are a hex payload.
    pub fn detect(s: &str) -> Self {
        if !Path::new(s).exists() && is_hex_text(s) {
            return InputSpec::Hex(s.to_string());
        }

        InputSpec::File(PathBuf::from(s))
    }
}
