//! Address derivation commands.
//!
//! Each subcommand runs one derivation pipeline (or all three) for a
//! private key and prints every intermediate value.

use chainkit_config::Config;
use chainkit_crypto::Secp256k1;
use chainkit_wallet::{
    bitcoin, cosmos, derive_all, ethereum, parse_private_key, BitcoinDerivation, BitcoinNetwork,
    CosmosDerivation, EthereumDerivation, MultichainDerivation, Networks,
};
use clap::{Args, Subcommand};
use serde_json::{json, Value};

use crate::utils::{hex0x, print_report, CliResult, OutputFormat};

/// Derivation subcommands
#[derive(Subcommand, Debug)]
pub enum DeriveCommands {
    /// Keccak-256 address with EIP-55 checksum
    Ethereum(KeyArgs),

    /// P2PKH, P2SH-P2WPKH and P2WPKH addresses
    Bitcoin(BitcoinArgs),

    /// Bech32 account address
    Cosmos(CosmosArgs),

    /// All of the above from one key
    All(AllArgs),
}

/// Private key input
#[derive(Args, Debug)]
pub struct KeyArgs {
    /// Hex-encoded 32-byte private key (0x optional)
    #[arg(long)]
    pub key: String,
}

/// Arguments for Bitcoin derivation
#[derive(Args, Debug)]
pub struct BitcoinArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Network preset overriding the config file: mainnet, testnet, regtest
    #[arg(long)]
    pub network: Option<String>,
}

/// Arguments for Cosmos derivation
#[derive(Args, Debug)]
pub struct CosmosArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Bech32 prefix overriding the config file (e.g. osmo, juno)
    #[arg(long)]
    pub hrp: Option<String>,
}

/// Arguments for deriving every chain
#[derive(Args, Debug)]
pub struct AllArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Bitcoin network preset overriding the config file
    #[arg(long)]
    pub network: Option<String>,

    /// Cosmos prefix overriding the config file
    #[arg(long)]
    pub hrp: Option<String>,
}

/// Execute derive commands
pub fn execute(cmd: DeriveCommands, config: &Config, output_format: OutputFormat) -> CliResult<()> {
    let provider = Secp256k1::new();

    match cmd {
        DeriveCommands::Ethereum(args) => {
            let key = parse_private_key(&args.key)?;
            let derivation = ethereum::derive(&provider, &key)?;
            print_report(output_format, "Ethereum", &ethereum_report(&derivation))
        }
        DeriveCommands::Bitcoin(args) => {
            let network = bitcoin_network(config, args.network.as_deref())?;
            let key = parse_private_key(&args.key.key)?;
            let derivation = bitcoin::derive(&provider, &network, &key)?;
            print_report(output_format, "Bitcoin", &bitcoin_report(&derivation))
        }
        DeriveCommands::Cosmos(args) => {
            let hrp = cosmos_hrp(config, args.hrp.as_deref());
            let key = parse_private_key(&args.key.key)?;
            let derivation = cosmos::derive(&provider, &hrp, &key)?;
            print_report(output_format, "Cosmos", &cosmos_report(&derivation))
        }
        DeriveCommands::All(args) => {
            let networks = Networks {
                bitcoin: bitcoin_network(config, args.network.as_deref())?,
                cosmos_hrp: cosmos_hrp(config, args.hrp.as_deref()),
            };
            let key = parse_private_key(&args.key.key)?;
            let derivation = derive_all(&provider, &key, &networks)?;
            print_report(output_format, "Addresses", &multichain_report(&derivation))
        }
    }
}

/// Bitcoin parameters from the config file, with `network` replacing the
/// configured preset when given.
pub fn bitcoin_network(config: &Config, network: Option<&str>) -> CliResult<BitcoinNetwork> {
    let mut section = config.bitcoin.clone();
    if let Some(network) = network {
        section.network = network.to_string();
    }
    section.validate()?;
    let params = section.resolve()?;
    Ok(BitcoinNetwork {
        p2pkh_version: params.p2pkh_version,
        p2sh_version: params.p2sh_version,
        hrp: params.bech32_hrp,
    })
}

/// Cosmos HRP from the flag, else the config file.
pub fn cosmos_hrp(config: &Config, hrp: Option<&str>) -> String {
    hrp.map(str::to_string)
        .unwrap_or_else(|| config.cosmos.bech32_hrp.clone())
}

/// Report for an Ethereum derivation.
pub fn ethereum_report(derivation: &EthereumDerivation) -> Value {
    json!({
        "publicKey": hex0x(derivation.public_key),
        "keccak256": hex0x(derivation.hash),
        "address": hex0x(derivation.address.as_bytes()),
        "checksumAddress": derivation.checksum_address,
    })
}

/// Report for a Bitcoin derivation.
pub fn bitcoin_report(derivation: &BitcoinDerivation) -> Value {
    json!({
        "publicKey": hex0x(derivation.keys.compressed),
        "hash160": hex::encode(derivation.hash160),
        "p2pkh": derivation.addresses.p2pkh,
        "p2shP2wpkh": derivation.addresses.p2sh_p2wpkh,
        "p2wpkh": derivation.addresses.p2wpkh,
    })
}

/// Report for a Cosmos derivation.
pub fn cosmos_report(derivation: &CosmosDerivation) -> Value {
    json!({
        "publicKey": hex0x(derivation.keys.compressed),
        "hash160": hex::encode(derivation.hash160),
        "address": derivation.address,
    })
}

/// Report for all three chains.
pub fn multichain_report(derivation: &MultichainDerivation) -> Value {
    json!({
        "ethereum": ethereum_report(&derivation.ethereum),
        "bitcoin": bitcoin_report(&derivation.bitcoin),
        "cosmos": cosmos_report(&derivation.cosmos),
    })
}
