//! Configuration loading from disk and environment.

use std::path::Path;
use std::fs;
use crate::config::schema::BridgeConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `endpointURL`.
pub const ENDPOINT_URL_ENV_VAR: &str = "INDEXER_BRIDGE_ENDPOINT_URL";

/// Environment variable overriding `walletAddress`.
pub const WALLET_ADDRESS_ENV_VAR: &str = "INDEXER_BRIDGE_WALLET_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a TOML file, apply environment overrides, then validate.
pub fn load_config(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let config = read_config(Some(path))?;
    check(config)
}

/// Load from `path` when given, otherwise start from defaults.
pub fn load_config_or_default(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let config = read_config(path)?;
    check(config)
}

/// Parse `path` (or take the defaults) and apply environment overrides,
/// without validating. Callers layering further overrides validate afterwards.
pub fn read_config(path: Option<&Path>) -> Result<BridgeConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => BridgeConfig::default(),
    };
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Overlay values from the environment onto `config`.
pub fn apply_env_overrides(config: &mut BridgeConfig) {
    if let Ok(url) = std::env::var(ENDPOINT_URL_ENV_VAR) {
        tracing::debug!(env = ENDPOINT_URL_ENV_VAR, "Endpoint URL overridden from environment");
        config.endpoint_url = Some(url);
    }
    if let Ok(address) = std::env::var(WALLET_ADDRESS_ENV_VAR) {
        config.wallet_address = Some(address);
    }
}

/// Run semantic validation, returning the config unchanged on success.
pub fn check(config: BridgeConfig) -> Result<BridgeConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
