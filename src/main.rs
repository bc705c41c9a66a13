//! cdx - Cardano transaction decoder.

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = cdx::Args::parse();

    cdx::logging::init(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    match cdx::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "error".red(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}
