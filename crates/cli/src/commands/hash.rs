//! Digest commands.

use chainkit_crypto::{hash160, keccak256, ripemd160, sha256};
use chainkit_types::parse::decode_hex;
use clap::{Args, Subcommand, ValueEnum};
use serde_json::json;

use crate::utils::{print_report, CliResult, OutputFormat};

/// Digest subcommands
#[derive(Subcommand, Debug)]
pub enum HashCommands {
    /// RIPEMD-160 (20 bytes)
    Ripemd160(HashArgs),

    /// SHA-256 (32 bytes)
    Sha256(HashArgs),

    /// Keccak-256 as used by Ethereum (32 bytes)
    Keccak256(HashArgs),

    /// RIPEMD160(SHA256(x)) (20 bytes)
    Hash160(HashArgs),
}

/// Digest input
#[derive(Args, Debug)]
pub struct HashArgs {
    /// Input data, UTF-8 text unless --hex is given
    pub input: String,

    /// Treat the input as hex (0x optional)
    #[arg(long)]
    pub hex: bool,
}

impl HashArgs {
    /// The bytes to digest.
    pub fn bytes(&self) -> CliResult<Vec<u8>> {
        if self.hex {
            Ok(decode_hex(&self.input)?)
        } else {
            Ok(self.input.as_bytes().to_vec())
        }
    }
}

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// RIPEMD-160
    Ripemd160,
    /// SHA-256
    Sha256,
    /// Keccak-256
    Keccak256,
    /// RIPEMD160(SHA256(x))
    Hash160,
}

impl Algorithm {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Ripemd160 => "ripemd160",
            Algorithm::Sha256 => "sha256",
            Algorithm::Keccak256 => "keccak256",
            Algorithm::Hash160 => "hash160",
        }
    }

    /// Digest `data`.
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Algorithm::Ripemd160 => ripemd160(data).to_vec(),
            Algorithm::Sha256 => sha256(data).to_vec(),
            Algorithm::Keccak256 => keccak256(data).to_vec(),
            Algorithm::Hash160 => hash160(data).to_vec(),
        }
    }
}

impl HashCommands {
    /// Split into algorithm and input.
    pub fn into_parts(self) -> (Algorithm, HashArgs) {
        match self {
            HashCommands::Ripemd160(args) => (Algorithm::Ripemd160, args),
            HashCommands::Sha256(args) => (Algorithm::Sha256, args),
            HashCommands::Keccak256(args) => (Algorithm::Keccak256, args),
            HashCommands::Hash160(args) => (Algorithm::Hash160, args),
        }
    }
}

/// Execute hash commands
pub fn execute(cmd: HashCommands, output_format: OutputFormat) -> CliResult<()> {
    let (algorithm, args) = cmd.into_parts();
    let data = args.bytes()?;
    let digest = algorithm.digest(&data);

    match output_format {
        OutputFormat::Text => println!("{}", hex::encode(digest)),
        OutputFormat::Json => print_report(
            output_format,
            algorithm.name(),
            &json!({
                "algorithm": algorithm.name(),
                "inputLength": data.len(),
                "digest": hex::encode(digest),
            }),
        )?,
    }
    Ok(())
}
