//! Ordered set of index service endpoints.

use std::fmt;
use url::Url;

use crate::blockchain::types::{ClientError, ClientResult};
use crate::config::BridgeConfig;

/// Position of an endpoint within an [`EndpointSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Primary,
    Fallback(usize),
}

impl EndpointRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointRole::Primary => "primary",
            EndpointRole::Fallback(_) => "fallback",
        }
    }
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Primary => f.write_str("primary"),
            EndpointRole::Fallback(i) => write!(f, "fallback #{}", i),
        }
    }
}

/// One primary base URL plus ordered fallbacks. Never empty, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet {
    primary: Url,
    fallbacks: Vec<Url>,
}

impl EndpointSet {
    /// Create a set from explicit URLs.
    ///
    /// The primary must parse. Unparseable fallbacks are skipped with a warning.
    pub fn new(primary: &str, fallbacks: &[String]) -> ClientResult<Self> {
        let primary = parse_base(primary)?;

        let mut parsed = Vec::with_capacity(fallbacks.len());
        for url_str in fallbacks {
            match parse_base(url_str) {
                Ok(url) => parsed.push(url),
                Err(e) => tracing::warn!(url = %url_str, error = %e, "Ignoring invalid fallback URL"),
            }
        }

        Ok(Self { primary, fallbacks: parsed })
    }

    /// Append `default_url` as the final fallback unless it is already present.
    pub fn with_default_fallback(mut self, default_url: &str) -> ClientResult<Self> {
        let default_url = parse_base(default_url)?;
        if self.primary != default_url && !self.fallbacks.contains(&default_url) {
            self.fallbacks.push(default_url);
        }
        Ok(self)
    }

    /// Build the set described by a configuration, including the network default.
    pub fn from_config(config: &BridgeConfig) -> ClientResult<Self> {
        Self::new(config.primary_endpoint(), &config.endpoint_fallbacks)?
            .with_default_fallback(config.network.default_service_url())
    }

    pub fn primary(&self) -> &Url {
        &self.primary
    }

    pub fn fallbacks(&self) -> &[Url] {
        &self.fallbacks
    }

    /// Total number of endpoints, primary included.
    pub fn len(&self) -> usize {
        1 + self.fallbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Endpoints in attempt order, tagged with their role.
    pub fn iter(&self) -> impl Iterator<Item = (EndpointRole, &Url)> {
        std::iter::once((EndpointRole::Primary, &self.primary)).chain(
            self.fallbacks
                .iter()
                .enumerate()
                .map(|(i, url)| (EndpointRole::Fallback(i), url)),
        )
    }
}

fn parse_base(value: &str) -> ClientResult<Url> {
    let url = Url::parse(value.trim()).map_err(|e| ClientError::InvalidEndpoint {
        url: value.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidEndpoint {
            url: value.to_string(),
            reason: "not a base URL".to_string(),
        });
    }
    Ok(url)
}

/// Join a base URL and an absolute API path, keeping any path prefix of the base.
pub(crate) fn endpoint_url(base: &Url, path: &str) -> String {
    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
