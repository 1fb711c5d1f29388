//! Tests for commands/mod.rs CLI parsing

use chainkit_cli::commands::{
    derive::DeriveCommands, hash::HashCommands, keys::KeysCommands, log_directive, tx::TxCommands,
    Cli, Commands,
};
use chainkit_cli::OutputFormat;
use chainkit_config::LoggingConfig;
use clap::{CommandFactory, Parser};

#[test]
fn verify_cli() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_derive_ethereum() {
    let cli = Cli::parse_from(["chainkit", "derive", "ethereum", "--key", "0x01"]);
    match cli.command {
        Commands::Derive(DeriveCommands::Ethereum(args)) => assert_eq!(args.key, "0x01"),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_derive_bitcoin_network() {
    let cli = Cli::parse_from([
        "chainkit", "derive", "bitcoin", "--key", "0x01", "--network", "testnet",
    ]);
    match cli.command {
        Commands::Derive(DeriveCommands::Bitcoin(args)) => {
            assert_eq!(args.network.as_deref(), Some("testnet"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_derive_all() {
    let cli = Cli::parse_from(["chainkit", "derive", "all", "--key", "0x01", "--hrp", "osmo"]);
    match cli.command {
        Commands::Derive(DeriveCommands::All(args)) => {
            assert_eq!(args.hrp.as_deref(), Some("osmo"));
            assert!(args.network.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_derive_requires_key() {
    assert!(Cli::try_parse_from(["chainkit", "derive", "cosmos"]).is_err());
}

#[test]
fn test_parse_tx_sign() {
    let cli = Cli::parse_from([
        "chainkit", "tx", "sign", "--nonce", "9", "--to", "0x3535353535353535353535353535353535353535",
        "--key", "0x46",
    ]);
    match cli.command {
        Commands::Tx(TxCommands::Sign(args)) => {
            assert_eq!(args.tx.nonce.as_deref(), Some("9"));
            assert_eq!(args.key.as_deref(), Some("0x46"));
            assert!(args.tx.gas_price.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_tx_sign_without_key() {
    let cli = Cli::parse_from(["chainkit", "tx", "sign"]);
    assert!(matches!(
        cli.command,
        Commands::Tx(TxCommands::Sign(ref args)) if args.key.is_none()
    ));
}

#[test]
fn test_parse_tx_decode() {
    let cli = Cli::parse_from(["chainkit", "tx", "decode", "0xf86c"]);
    assert!(matches!(cli.command, Commands::Tx(TxCommands::Decode(_))));
}

#[test]
fn test_parse_hash() {
    let cli = Cli::parse_from(["chainkit", "hash", "hash160", "--hex", "0x02"]);
    match cli.command {
        Commands::Hash(HashCommands::Hash160(args)) => {
            assert!(args.hex);
            assert_eq!(args.input, "0x02");
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_keys_generate() {
    let cli = Cli::parse_from(["chainkit", "keys", "generate"]);
    assert!(matches!(cli.command, Commands::Keys(KeysCommands::Generate(_))));
}

#[test]
fn test_output_format() {
    let cli = Cli::parse_from(["chainkit", "--output", "json", "version"]);
    assert_eq!(cli.output, OutputFormat::Json);

    let cli = Cli::parse_from(["chainkit", "version", "--output", "json"]);
    assert_eq!(cli.output, OutputFormat::Json);
}

#[test]
fn test_verbose_flags() {
    let cli = Cli::parse_from(["chainkit", "-vv", "version"]);
    assert_eq!(cli.verbose, 2);
    assert!(!cli.quiet);
}

#[test]
fn test_config_flag() {
    let cli = Cli::parse_from(["chainkit", "--config", "/tmp/chainkit.toml", "version"]);
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/chainkit.toml"))
    );
}

#[test]
fn test_log_directive() {
    let logging = LoggingConfig {
        level: "INFO".to_string(),
        format: "text".to_string(),
    };
    assert_eq!(log_directive(0, false, &logging), "info");
    assert_eq!(log_directive(1, false, &logging), "debug");
    assert_eq!(log_directive(3, false, &logging), "trace");
    assert_eq!(log_directive(2, true, &logging), "error");
}

#[test]
fn test_quiet_flag_only_lowers_logging() {
    let cli = Cli::parse_from(["chainkit", "-q", "version"]);
    assert!(cli.quiet);
    assert_eq!(log_directive(cli.verbose, cli.quiet, &LoggingConfig::default()), "error");

    let command = Cli::command();
    let quiet = command
        .get_arguments()
        .find(|arg| arg.get_id() == "quiet")
        .unwrap();
    let help = quiet.get_help().unwrap().to_string();
    assert!(help.starts_with("Only log errors"), "{help}");
}
