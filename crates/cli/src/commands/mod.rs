//! CLI command definitions and handlers.
//!
//! This module defines all available CLI commands using clap's derive macros.
//! Each subcommand has its own module with implementation details.

pub mod derive;
pub mod hash;
pub mod keys;
pub mod tx;

use chainkit_config::{Config, LoggingConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::utils::{CliResult, OutputFormat};

/// chainkit - multi-chain address derivation and transaction signing
#[derive(Parser, Debug)]
#[command(name = "chainkit")]
#[command(author = "chainkit contributors")]
#[command(version)]
#[command(about = "Multi-chain address derivation and legacy transaction signing", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Global output format for command results
    #[arg(global = true, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(global = true, short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors; reports and notices are still printed
    #[arg(global = true, short, long)]
    pub quiet: bool,

    /// Configuration file (default: ~/.chainkit/chainkit.toml if present)
    #[arg(global = true, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Derive addresses from a private key
    #[command(subcommand)]
    Derive(derive::DeriveCommands),

    /// Legacy (EIP-155) transaction tools
    #[command(subcommand)]
    Tx(tx::TxCommands),

    /// Compute a digest
    #[command(subcommand)]
    Hash(hash::HashCommands),

    /// Key generation
    #[command(subcommand)]
    Keys(keys::KeysCommands),

    /// Show version information
    Version,
}

/// Execute the CLI with parsed arguments
pub fn run_cli(cli: Cli) -> CliResult<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;

    init_logging(cli.verbose, cli.quiet, &config.logging);
    debug!(output = ?cli.output, "configuration ready");

    match cli.command {
        Commands::Derive(cmd) => derive::execute(cmd, &config, cli.output),
        Commands::Tx(cmd) => tx::execute(cmd, &config, cli.output),
        Commands::Hash(cmd) => hash::execute(cmd, cli.output),
        Commands::Keys(cmd) => keys::execute(cmd, &config, cli.output),
        Commands::Version => execute_version(cli.output),
    }
}

/// Log filter directive for the given flags.
///
/// `RUST_LOG` still takes precedence when set.
pub fn log_directive(verbose: u8, quiet: bool, logging: &LoggingConfig) -> String {
    match (quiet, verbose) {
        (true, _) => "error".to_string(),
        (_, 0) => logging.level.to_lowercase(),
        (_, 1) => "debug".to_string(),
        (_, _) => "trace".to_string(),
    }
}

/// Install the global tracing subscriber. Logs go to stderr.
pub fn init_logging(verbose: u8, quiet: bool, logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(verbose, quiet, logging)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2);

    // A second install (tests, embedding) keeps the first subscriber.
    let _ = if logging.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Execute the version command
fn execute_version(output_format: OutputFormat) -> CliResult<()> {
    let version_info = VersionInfo::new();

    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&version_info)?);
        }
        OutputFormat::Text => {
            println!("chainkit CLI");
            println!("  Version:     {}", version_info.version);
            println!("  Git Commit:  {}", version_info.git_commit);
            println!("  Rust:        {}", version_info.rust_version);
            println!("  Target:      {}", version_info.target);
        }
    }

    Ok(())
}

/// Version information structure
#[derive(Debug, serde::Serialize)]
struct VersionInfo {
    version: String,
    git_commit: String,
    rust_version: String,
    target: String,
}

impl VersionInfo {
    fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            git_commit: option_env!("GIT_COMMIT").unwrap_or("unknown").to_string(),
            rust_version: option_env!("RUSTC_VERSION")
                .unwrap_or(env!("CARGO_PKG_RUST_VERSION"))
                .to_string(),
            target: std::env::consts::ARCH.to_string() + "-" + std::env::consts::OS,
        }
    }
}
