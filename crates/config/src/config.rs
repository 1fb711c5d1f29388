//! Main configuration module for chainkit
//!
//! All settings live in one `chainkit.toml` file. By default it is looked up
//! at `~/.chainkit/chainkit.toml`.

use crate::error::{ConfigError, ConfigResult};
use chainkit_types::bech32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory under the home directory holding chainkit files.
pub const CONFIG_DIR: &str = ".chainkit";

/// Configuration file name.
pub const CONFIG_FILE: &str = "chainkit.toml";

/// Main configuration struct containing all chainkit settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Ethereum signing parameters
    #[serde(default)]
    pub ethereum: EthereumConfig,

    /// Bitcoin address parameters
    #[serde(default)]
    pub bitcoin: BitcoinConfig,

    /// Cosmos address parameters
    #[serde(default)]
    pub cosmos: CosmosConfig,
}

impl Config {
    /// `~/.chainkit/chainkit.toml`, if a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    ///
    /// The parsed and validated configuration, or an error if loading fails.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        info!("Loading configuration from {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;

        debug!("Configuration parsed successfully, validating...");
        config.validate()?;

        info!(
            "Configuration loaded: chain_id={}, bitcoin_network={}, cosmos_hrp={}",
            config.ethereum.chain_id, config.bitcoin.network, config.cosmos.bech32_hrp
        );

        Ok(config)
    }

    /// Load `path` if given, otherwise the default file if it exists,
    /// otherwise built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(default) if default.exists() => Self::load(&default),
            _ => {
                debug!("No configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a TOML string.
    ///
    /// Useful for testing or when configuration is provided as a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.logging.validate()?;
        self.ethereum.validate()?;
        self.bitcoin.validate()?;
        self.cosmos.validate()?;

        debug!("Configuration validation passed");
        Ok(())
    }

    /// Save configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |e| ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, content).map_err(write_err)?;
        info!("Configuration saved to {:?}", path);
        Ok(())
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl LoggingConfig {
    /// Check level and format names.
    pub fn validate(&self) -> ConfigResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.level.clone()));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidLogFormat(self.format.clone()));
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

// =============================================================================
// Ethereum Configuration
// =============================================================================

/// Ethereum signing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthereumConfig {
    /// EIP-155 chain id used when a transaction does not give one
    pub chain_id: u64,
}

impl EthereumConfig {
    /// Chain id must be non-zero.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidChainId);
        }
        Ok(())
    }
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self { chain_id: 1 }
    }
}

// =============================================================================
// Bitcoin Configuration
// =============================================================================

/// Bitcoin address parameters.
///
/// `network` picks a preset; the other fields override individual values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitcoinConfig {
    /// Preset: mainnet, testnet or regtest
    #[serde(default = "default_network")]
    pub network: String,

    /// Base58Check version byte for P2PKH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2pkh_version: Option<u8>,

    /// Base58Check version byte for P2SH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2sh_version: Option<u8>,

    /// SegWit human-readable part
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bech32_hrp: Option<String>,
}

fn default_network() -> String {
    "mainnet".to_string()
}

/// Fully resolved Bitcoin parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinParams {
    /// Base58Check version byte for P2PKH
    pub p2pkh_version: u8,
    /// Base58Check version byte for P2SH
    pub p2sh_version: u8,
    /// SegWit human-readable part
    pub bech32_hrp: String,
}

impl BitcoinConfig {
    /// Apply overrides on top of the preset.
    pub fn resolve(&self) -> ConfigResult<BitcoinParams> {
        let (p2pkh_version, p2sh_version, hrp) = match self.network.to_lowercase().as_str() {
            "mainnet" => (0x00, 0x05, "bc"),
            "testnet" => (0x6f, 0xc4, "tb"),
            "regtest" => (0x6f, 0xc4, "bcrt"),
            _ => return Err(ConfigError::UnknownNetwork(self.network.clone())),
        };
        Ok(BitcoinParams {
            p2pkh_version: self.p2pkh_version.unwrap_or(p2pkh_version),
            p2sh_version: self.p2sh_version.unwrap_or(p2sh_version),
            bech32_hrp: self.bech32_hrp.clone().unwrap_or_else(|| hrp.to_string()),
        })
    }

    /// Known preset, distinct version bytes, well-formed HRP.
    pub fn validate(&self) -> ConfigResult<()> {
        let params = self.resolve()?;
        if params.p2pkh_version == params.p2sh_version {
            return Err(ConfigError::DuplicateVersionByte(params.p2pkh_version));
        }
        validate_hrp("bitcoin", &params.bech32_hrp)
    }
}

impl Default for BitcoinConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            p2pkh_version: None,
            p2sh_version: None,
            bech32_hrp: None,
        }
    }
}

// =============================================================================
// Cosmos Configuration
// =============================================================================

/// Cosmos address parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosConfig {
    /// Account address human-readable part
    pub bech32_hrp: String,
}

impl CosmosConfig {
    /// HRP must be well-formed. Any prefix is accepted, not just known zones.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_hrp("cosmos", &self.bech32_hrp)
    }
}

impl Default for CosmosConfig {
    fn default() -> Self {
        Self {
            bech32_hrp: "cosmos".to_string(),
        }
    }
}

/// An HRP is acceptable iff it can head a Bech32 string.
fn validate_hrp(section: &'static str, hrp: &str) -> ConfigResult<()> {
    bech32::encode(hrp, &[], bech32::Variant::Bech32)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidHrp {
            section,
            hrp: hrp.to_string(),
            reason: e.to_string(),
        })
}
