//! chainkit CLI - Main entry point
//!
//! Derives addresses, signs legacy Ethereum transactions and computes
//! digests from the command line.

use chainkit_cli::{commands::run_cli, commands::Cli};
use clap::Parser;
use std::process;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    if let Err(e) = run_cli(cli) {
        chainkit_cli::utils::print_error(&e.to_string());
        process::exit(1);
    }
}
