//! Transport error definitions.

use thiserror::Error;

/// Why a single request attempt against one endpoint failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS or protocol failure.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The endpoint answered with a non-2xx status.
    #[error("{url} responded with HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    /// The attempt exceeded the configured per-request timeout.
    #[error("request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// A 2xx response whose body is not JSON.
    #[error("unreadable response body from {url}: {reason}")]
    Body { url: String, reason: String },
}

impl TransportError {
    /// The full URL of the failed attempt.
    pub fn url(&self) -> &str {
        match self {
            TransportError::Network { url, .. }
            | TransportError::Status { url, .. }
            | TransportError::Timeout { url, .. }
            | TransportError::Body { url, .. } => url,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }
}

/// Outcome errors of the failover client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The primary and every fallback failed. Carries the primary's error.
    #[error("all {attempted} endpoints failed; primary error: {primary}")]
    TransportFailure {
        attempted: usize,
        #[source]
        primary: TransportError,
    },

    /// A successful response did not have the expected shape.
    #[error("unexpected response shape from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request payload for {path}: {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    /// The primary's error, when every endpoint failed.
    pub fn primary(&self) -> Option<&TransportError> {
        match self {
            ClientError::TransportFailure { primary, .. } => Some(primary),
            _ => None,
        }
    }

    /// True when the canonical (primary) failure was an HTTP 404.
    pub fn is_not_found(&self) -> bool {
        self.primary().and_then(TransportError::status) == Some(404)
    }
}

/// Result type for failover client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_uses_primary_status() {
        let err = ClientError::TransportFailure {
            attempted: 2,
            primary: TransportError::Status {
                url: "http://primary/api/v3/blocks".into(),
                status: 404,
                body: String::new(),
            },
        };
        assert!(err.is_not_found());
        assert_eq!(err.primary().map(TransportError::url), Some("http://primary/api/v3/blocks"));
    }

    #[test]
    fn test_timeout_is_not_not_found() {
        let err = ClientError::TransportFailure {
            attempted: 1,
            primary: TransportError::Timeout { url: "http://primary".into(), timeout_ms: 50 },
        };
        assert!(!err.is_not_found());
        assert!(err.primary().is_some_and(TransportError::is_timeout));
    }

    #[test]
    fn test_error_display() {
        let err = TransportError::Timeout { url: "http://a".into(), timeout_ms: 10 };
        assert_eq!(err.to_string(), "request to http://a timed out after 10 ms");

        let err = ClientError::TransportFailure { attempted: 3, primary: err };
        assert!(err.to_string().starts_with("all 3 endpoints failed"));
    }
}
