//! Configuration schema definitions.
//!
//! This module defines the configuration accepted by the bridge. All types
//! derive Serde traits for deserialization from TOML files. The endpoint keys
//! keep the host framework's camelCase names (`endpointURL`,
//! `endpointFallbacks`, `requestTimeoutMs`).

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Root configuration for the bridge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Network whose public index service is used as the default endpoint.
    pub network: Network,

    /// Primary index service URL. Falls back to the network default when unset.
    #[serde(rename = "endpointURL")]
    pub endpoint_url: Option<String>,

    /// Alternate index service URLs, tried in order after the primary.
    pub endpoint_fallbacks: Vec<String>,

    /// Timeout of each individual HTTP attempt in milliseconds.
    pub request_timeout_ms: u64,

    /// lisk32 address of the multisig wallet transactions are assembled for.
    pub wallet_address: Option<String>,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            network: Network::Mainnet,
            endpoint_url: None,
            endpoint_fallbacks: Vec::new(),
            request_timeout_ms: 10_000,
            wallet_address: None,
            observability: ObservabilityConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// The primary endpoint after applying the network default.
    pub fn primary_endpoint(&self) -> &str {
        self.endpoint_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.network.default_service_url())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Public networks with a well-known index service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    /// URL of the network's public index service. Always appended as the last fallback.
    pub fn default_service_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://service.lisk.com",
            Network::Testnet => "https://testnet-service.lisk.com",
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("unknown network '{}'", other)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive (e.g. `info`, `indexer_bridge=debug`).
    pub log_level: String,

    /// Output format of log lines.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.primary_endpoint(), "https://service.lisk.com");
        assert!(config.endpoint_fallbacks.is_empty());
        assert_eq!(config.request_timeout_ms, 10_000);
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_host_key_names() {
        let config: BridgeConfig = toml::from_str(
            r#"
            network = "testnet"
            endpointURL = "http://127.0.0.1:9901"
            endpointFallbacks = ["http://127.0.0.1:9902"]
            requestTimeoutMs = 2500
            walletAddress = "lskexample"

            [observability]
            logLevel = "debug"
            logFormat = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.primary_endpoint(), "http://127.0.0.1:9901");
        assert_eq!(config.endpoint_fallbacks, vec!["http://127.0.0.1:9902"]);
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_endpoint_uses_network_default() {
        let config = BridgeConfig {
            network: Network::Testnet,
            endpoint_url: Some("  ".into()),
            ..BridgeConfig::default()
        };
        assert_eq!(config.primary_endpoint(), "https://testnet-service.lisk.com");
    }
}
