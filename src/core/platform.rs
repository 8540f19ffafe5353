//! Process-level entry helpers and error reporting.

use crate::core::errors::error_chain;

/// Report a fatal error and exit with code 1.
pub fn handle_error(error: anyhow::Error) -> ! {
    eprintln!();
    eprintln!("iconforge failed:");
    eprintln!("{}", error_chain(&error));
    eprintln!();
    eprintln!("Try running with --help for usage information.");
    std::process::exit(1);
}

/// Parse and validate the command line.
///
/// Invalid arguments print clap's usage message and exit.
pub fn get_cli_args() -> crate::core::cli::CliArgs {
    use clap::Parser;
    let args = crate::core::cli::CliArgs::parse();
    if let Err(message) = args.validate() {
        eprintln!("{message}");
        std::process::exit(2);
    }
    args
}
