//! Key commands.
//!
//! Keys are never written to disk; `generate` prints the secret once and
//! the caller decides where it goes.

use chainkit_config::Config;
use chainkit_crypto::{PrivateKey, Secp256k1};
use chainkit_wallet::{derive_all, parse_private_key, Networks, PublicKeys};
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use tracing::info;

use super::derive::{bitcoin_network, cosmos_hrp, multichain_report};
use crate::utils::{hex0x, print_report, print_warning, CliResult, OutputFormat};

/// Key subcommands
#[derive(Subcommand, Debug)]
pub enum KeysCommands {
    /// Generate a random private key and show its addresses
    Generate(GenerateArgs),

    /// Show both public key encodings of a private key
    Public(PublicArgs),
}

/// Arguments for key generation
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Bitcoin network preset overriding the config file
    #[arg(long)]
    pub network: Option<String>,

    /// Cosmos prefix overriding the config file
    #[arg(long)]
    pub hrp: Option<String>,
}

/// Arguments for public key display
#[derive(Args, Debug)]
pub struct PublicArgs {
    /// Hex-encoded 32-byte private key (0x optional)
    #[arg(long)]
    pub key: String,
}

/// Execute keys commands
pub fn execute(cmd: KeysCommands, config: &Config, output_format: OutputFormat) -> CliResult<()> {
    match cmd {
        KeysCommands::Generate(args) => execute_generate(args, config, output_format),
        KeysCommands::Public(args) => execute_public(args, output_format),
    }
}

/// Execute key generation
fn execute_generate(args: GenerateArgs, config: &Config, output_format: OutputFormat) -> CliResult<()> {
    let networks = Networks {
        bitcoin: bitcoin_network(config, args.network.as_deref())?,
        cosmos_hrp: cosmos_hrp(config, args.hrp.as_deref()),
    };

    let key = PrivateKey::random();
    let derivation = derive_all(&Secp256k1::new(), &key, &networks)?;
    info!(address = %derivation.ethereum.checksum_address, "generated key");

    let mut report = multichain_report(&derivation);
    if let Value::Object(map) = &mut report {
        map.insert("privateKey".to_string(), Value::String(hex0x(key.as_bytes())));
    }

    print_report(output_format, "New key", &report)?;
    if output_format == OutputFormat::Text {
        print_warning("The private key above is shown once. Store it securely.");
    }
    Ok(())
}

/// Execute public key display
fn execute_public(args: PublicArgs, output_format: OutputFormat) -> CliResult<()> {
    let key = parse_private_key(&args.key)?;
    let keys = PublicKeys::derive(&Secp256k1::new(), &key)?;
    print_report(output_format, "Public key", &public_keys_report(&keys))
}

/// Report for both public key encodings.
pub fn public_keys_report(keys: &PublicKeys) -> Value {
    json!({
        "compressed": hex0x(keys.compressed),
        "uncompressed": hex0x(keys.uncompressed),
    })
}
