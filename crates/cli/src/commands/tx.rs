//! Legacy transaction commands.
//!
//! Fields come from flags, a JSON file in the camelCase field format, or
//! both (flags win over the file). Fields missing from both fall back to
//! their defaults, with the chain id taken from `ethereum.chain_id` in the
//! config file.

use chainkit_config::Config;
use chainkit_crypto::Secp256k1;
use chainkit_types::{SignedLegacyTransaction, TxFields};
use chainkit_wallet::{parse_private_key, LegacyTxPipeline};
use clap::{Args, Subcommand};
use serde_json::{json, Value};
use std::path::PathBuf;

use crate::utils::{hex0x, print_report, print_success, read_file, CliResult, OutputFormat};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TxCommands {
    /// Show the unsigned RLP and the signing hash
    Encode(TxArgs),

    /// Sign and print the raw transaction
    Sign(SignArgs),

    /// Decode a raw signed transaction and recover its sender
    Decode(DecodeArgs),
}

/// Transaction fields
#[derive(Args, Debug, Default)]
pub struct TxArgs {
    /// JSON file with transaction fields
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Sender nonce
    #[arg(long)]
    pub nonce: Option<String>,

    /// Gas price in wei
    #[arg(long)]
    pub gas_price: Option<String>,

    /// Gas limit
    #[arg(long)]
    pub gas_limit: Option<String>,

    /// Recipient; omit for contract creation
    #[arg(long)]
    pub to: Option<String>,

    /// Value in wei
    #[arg(long)]
    pub value: Option<String>,

    /// Call data or init code as hex
    #[arg(long)]
    pub data: Option<String>,

    /// EIP-155 chain id
    #[arg(long)]
    pub chain_id: Option<String>,
}

impl TxArgs {
    /// Merge the file (if any), the config chain id and the flags.
    pub fn to_fields(&self, config: &Config) -> CliResult<TxFields> {
        let mut fields = TxFields {
            chain_id: config.ethereum.chain_id.to_string(),
            ..TxFields::default()
        };
        if let Some(path) = &self.file {
            fields = overlay_file(&fields, &read_file(path)?)?;
        }

        let overrides = [
            (&self.nonce, &mut fields.nonce),
            (&self.gas_price, &mut fields.gas_price),
            (&self.gas_limit, &mut fields.gas_limit),
            (&self.to, &mut fields.to),
            (&self.value, &mut fields.value),
            (&self.data, &mut fields.data),
            (&self.chain_id, &mut fields.chain_id),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value.clone();
            }
        }
        Ok(fields)
    }
}

/// Keys present in the JSON document replace the matching fields of `base`;
/// absent keys keep their value.
fn overlay_file(base: &TxFields, contents: &str) -> CliResult<TxFields> {
    let file: Value = serde_json::from_str(contents)?;
    let merged = match (serde_json::to_value(base)?, file) {
        (Value::Object(mut target), Value::Object(file)) => {
            target.extend(file);
            Value::Object(target)
        }
        // Not an object: let deserialization report the type mismatch.
        (_, other) => other,
    };
    Ok(serde_json::from_value(merged)?)
}

/// Arguments for signing
#[derive(Args, Debug)]
pub struct SignArgs {
    #[command(flatten)]
    pub tx: TxArgs,

    /// Hex-encoded 32-byte private key (0x optional)
    #[arg(long)]
    pub key: Option<String>,
}

/// Arguments for decoding
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Raw signed transaction as hex
    pub raw: String,
}

/// Execute tx commands
pub fn execute(cmd: TxCommands, config: &Config, output_format: OutputFormat) -> CliResult<()> {
    match cmd {
        TxCommands::Encode(args) => {
            let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), args.to_fields(config)?);
            let unsigned_rlp = pipeline.encode()?;
            let hash = pipeline.hash()?;
            let report = json!({
                "unsignedRlp": hex0x(unsigned_rlp),
                "signingHash": hex0x(hash),
            });
            print_report(output_format, "Unsigned transaction", &report)
        }
        TxCommands::Sign(args) => {
            let key = args.key.as_deref().map(parse_private_key).transpose()?;
            let mut pipeline = LegacyTxPipeline::new(Secp256k1::new(), args.tx.to_fields(config)?);
            let signed = pipeline.run(key.as_ref())?;
            print_report(output_format, "Signed transaction", &signed_report(&signed)?)?;
            if output_format == OutputFormat::Text {
                print_success("Transaction signed. Broadcasting is left to the caller.");
            }
            Ok(())
        }
        TxCommands::Decode(args) => {
            let signed = SignedLegacyTransaction::decode_raw(&args.raw)?;
            print_report(output_format, "Decoded transaction", &signed_report(&signed)?)
        }
    }
}

/// Report for a signed transaction, including the recovered sender.
pub fn signed_report(signed: &SignedLegacyTransaction) -> CliResult<Value> {
    let fields = TxFields::from(&signed.transaction);
    let sender = signed.recover_sender()?;
    Ok(json!({
        "raw": signed.raw(),
        "hash": hex0x(signed.hash()),
        "from": sender.to_checksum_string(),
        "fields": fields,
        "v": signed.signature.v.to_string(),
        "r": hex0x(signed.signature.r),
        "s": hex0x(signed.signature.s),
    }))
}
