//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Endpoint URLs parse and use http/https
//! - Timeouts are non-zero
//! - The wallet address is present and a valid lisk32 address
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BridgeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::schema::BridgeConfig;
use crate::ledger::Address;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}': {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("requestTimeoutMs must be greater than zero")]
    ZeroTimeout,

    #[error("walletAddress is required")]
    MissingWalletAddress,

    #[error("walletAddress '{value}' is invalid: {reason}")]
    InvalidWalletAddress { value: String, reason: String },

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &BridgeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(reason) = check_url(config.primary_endpoint()) {
        errors.push(ValidationError::InvalidUrl {
            field: "endpointURL",
            value: config.primary_endpoint().to_string(),
            reason,
        });
    }

    for fallback in &config.endpoint_fallbacks {
        if let Err(reason) = check_url(fallback) {
            errors.push(ValidationError::InvalidUrl {
                field: "endpointFallbacks",
                value: fallback.clone(),
                reason,
            });
        }
    }

    if config.request_timeout_ms == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    match config.wallet_address.as_deref().map(str::trim) {
        None | Some("") => errors.push(ValidationError::MissingWalletAddress),
        Some(value) => {
            if let Err(e) = value.parse::<Address>() {
                errors.push(ValidationError::InvalidWalletAddress {
                    value: value.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> BridgeConfig {
        BridgeConfig {
            endpoint_url: Some("http://127.0.0.1:9901".into()),
            wallet_address: Some(Address::from_public_key(&[3u8; 32]).to_lisk32()),
            ..BridgeConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_missing_wallet_address() {
        let mut config = valid_config();
        config.wallet_address = None;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::MissingWalletAddress])
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.endpoint_url = Some("not a url".into());
        config.endpoint_fallbacks = vec!["ftp://mirror.example".into()];
        config.request_timeout_ms = 0;
        config.wallet_address = Some("lskinvalid".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[0], ValidationError::InvalidUrl { field: "endpointURL", .. }));
        assert!(matches!(errors[1], ValidationError::InvalidUrl { field: "endpointFallbacks", .. }));
        assert_eq!(errors[2], ValidationError::ZeroTimeout);
        assert!(matches!(errors[3], ValidationError::InvalidWalletAddress { .. }));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = valid_config();
        config.observability.log_level = "indexer_bridge=loud".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidLogLevel("indexer_bridge=loud".into())])
        );
    }
}
