//! Tests for Config module

use chainkit_config::{
    BitcoinConfig, BitcoinParams, Config, ConfigError, CosmosConfig, EthereumConfig, LoggingConfig,
};

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.ethereum.chain_id, 1);
    assert_eq!(config.bitcoin.network, "mainnet");
    assert_eq!(config.cosmos.bech32_hrp, "cosmos");
    assert_eq!(config.logging.format, "text");
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_file_gives_defaults() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_chain_id() {
    let config = EthereumConfig { chain_id: 0 };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidChainId)));
}

#[test]
fn test_bitcoin_presets() {
    let mainnet = BitcoinConfig::default().resolve().unwrap();
    assert_eq!(
        mainnet,
        BitcoinParams {
            p2pkh_version: 0x00,
            p2sh_version: 0x05,
            bech32_hrp: "bc".to_string(),
        }
    );

    let testnet = BitcoinConfig {
        network: "testnet".to_string(),
        ..Default::default()
    };
    let params = testnet.resolve().unwrap();
    assert_eq!((params.p2pkh_version, params.p2sh_version), (0x6f, 0xc4));
    assert_eq!(params.bech32_hrp, "tb");

    let regtest = BitcoinConfig {
        network: "Regtest".to_string(),
        ..Default::default()
    };
    assert_eq!(regtest.resolve().unwrap().bech32_hrp, "bcrt");
}

#[test]
fn test_bitcoin_overrides_apply_on_top_of_preset() {
    let config = Config::from_str(
        r#"
        [bitcoin]
        network = "testnet"
        bech32_hrp = "custom"
        "#,
    )
    .unwrap();
    let params = config.bitcoin.resolve().unwrap();
    assert_eq!(params.p2pkh_version, 0x6f);
    assert_eq!(params.bech32_hrp, "custom");
}

#[test]
fn test_unknown_bitcoin_network() {
    let config = BitcoinConfig {
        network: "signet2".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::UnknownNetwork(name)) if name == "signet2"
    ));
}

#[test]
fn test_duplicate_version_bytes() {
    let config = BitcoinConfig {
        p2sh_version: Some(0x00),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DuplicateVersionByte(0x00))
    ));
}

#[test]
fn test_invalid_hrps() {
    let cosmos = CosmosConfig {
        bech32_hrp: String::new(),
    };
    assert!(matches!(
        cosmos.validate(),
        Err(ConfigError::InvalidHrp { section: "cosmos", .. })
    ));

    let mixed = CosmosConfig {
        bech32_hrp: "CosMos".to_string(),
    };
    assert!(matches!(mixed.validate(), Err(ConfigError::InvalidHrp { .. })));

    let bitcoin = BitcoinConfig {
        bech32_hrp: Some("b c".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        bitcoin.validate(),
        Err(ConfigError::InvalidHrp { section: "bitcoin", .. })
    ));
}

#[test]
fn test_any_wellformed_cosmos_hrp_is_accepted() {
    for hrp in ["osmo", "juno", "cosmosvaloper", "x"] {
        let config = CosmosConfig {
            bech32_hrp: hrp.to_string(),
        };
        assert!(config.validate().is_ok(), "{hrp}");
    }
}

#[test]
fn test_logging_validation() {
    let mut config = LoggingConfig::default();
    config.level = "loud".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLogLevel(level)) if level == "loud"
    ));

    let mut config = LoggingConfig::default();
    config.format = "xml".to_string();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidLogFormat(_))
    ));

    let mut config = LoggingConfig::default();
    config.level = "DEBUG".to_string();
    config.format = "json".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_str_rejects_bad_toml() {
    assert!(matches!(
        Config::from_str("[ethereum\nchain_id = 1"),
        Err(ConfigError::TomlParse(_))
    ));
    assert!(matches!(
        Config::from_str("[ethereum]\nchain_id = \"one\""),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_from_str_validates() {
    assert!(matches!(
        Config::from_str("[ethereum]\nchain_id = 0"),
        Err(ConfigError::InvalidChainId)
    ));
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("chainkit.toml");

    let mut config = Config::default();
    config.ethereum.chain_id = 137;
    config.bitcoin.network = "testnet".to_string();
    config.cosmos.bech32_hrp = "osmo".to_string();
    config.logging.format = "json".to_string();

    config.save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        Config::load(&path),
        Err(ConfigError::FileRead { .. })
    ));
}

#[test]
fn test_load_or_default_with_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chainkit.toml");
    std::fs::write(&path, "[ethereum]\nchain_id = 5\n").unwrap();

    let config = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.ethereum.chain_id, 5);
}

#[test]
fn test_default_path_layout() {
    if let Some(path) = Config::default_path() {
        assert!(path.ends_with(".chainkit/chainkit.toml"));
    }
}
