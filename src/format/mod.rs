//! Rendering of query results: terminal tables, JSON, or CBOR diagnostic
//! notation.

mod json;
mod pretty;
mod raw;

use crate::cli::Args;
use crate::error::Result;
use crate::query::QueryResult;

pub use json::format_json;
pub use pretty::format_pretty;
pub use raw::format_raw;

/// How a result is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Pretty,
    Json,
    /// Diagnostic notation of the parsed CBOR.
    Raw,
}

impl OutputMode {
    /// `--json` wins over `--raw`.
    pub fn from_args(args: &Args) -> Self {
        if args.json {
            OutputMode::Json
        } else if args.raw {
            OutputMode::Raw
        } else {
            OutputMode::Pretty
        }
    }
}

pub fn format_output(result: &QueryResult, args: &Args) -> Result<String> {
    match OutputMode::from_args(args) {
        OutputMode::Json => format_json(result),
        OutputMode::Raw => format_raw(result),
        OutputMode::Pretty => format_pretty(result, args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn mode(argv: &[&str]) -> OutputMode {
        let args = Args::parse_from(std::iter::once("cdx").chain(argv.iter().copied()));
        OutputMode::from_args(&args)
    }

    #[test]
    fn test_output_mode_flags() {
        assert_eq!(mode(&["80"]), OutputMode::Pretty);
        assert_eq!(mode(&["80", "--raw"]), OutputMode::Raw);
        assert_eq!(mode(&["80", "--json"]), OutputMode::Json);
        assert_eq!(mode(&["80", "--json", "--raw"]), OutputMode::Json);
    }
}
