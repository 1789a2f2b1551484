//! Index service HTTP client with endpoint failover.
//!
//! # Responsibilities
//! - Execute GET/POST requests against the primary endpoint
//! - On failure, walk the fallbacks in declared order until one succeeds
//! - Surface the primary's error when every endpoint fails
//! - Enforce a timeout on every individual attempt

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::blockchain::endpoint::{endpoint_url, EndpointRole, EndpointSet};
use crate::blockchain::types::{ClientError, ClientResult, TransportError};
use crate::observability::metrics;
use crate::resilience::timeouts::with_timeout;

/// HTTP client for the index service with failover support.
#[derive(Clone)]
pub struct FailoverClient {
    /// Shared connection pool.
    http: reqwest::Client,
    /// Primary + fallback base URLs.
    endpoints: Arc<EndpointSet>,
    /// Per-attempt timeout.
    timeout: Duration,
}

impl FailoverClient {
    /// Create a new client over `endpoints`.
    pub fn new(endpoints: EndpointSet, timeout: Duration) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(ClientError::Build)?;

        tracing::info!(
            primary = %endpoints.primary(),
            fallbacks = endpoints.fallbacks().len(),
            timeout_ms = timeout.as_millis() as u64,
            "Index client initialized"
        );

        Ok(Self {
            http,
            endpoints: Arc::new(endpoints),
            timeout,
        })
    }

    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    /// GET `path` with query `params` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> ClientResult<T> {
        let value = self.execute(Method::GET, path, params, None).await?;
        decode(path, value)
    }

    /// POST `payload` as JSON to `path` and decode the JSON body.
    pub async fn post<B, T>(&self, path: &str, payload: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(payload).map_err(|source| ClientError::Encode {
            path: path.to_string(),
            source,
        })?;
        let value = self.execute(Method::POST, path, &[], Some(&body)).await?;
        decode(path, value)
    }

    /// Primary first, then each fallback in order. Strictly sequential.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!("indexer_request", %request_id, %method, path);

        async {
            let primary = self.endpoints.primary();
            let primary_error = match self.attempt(primary, &method, path, params, body).await {
                Ok(value) => {
                    metrics::record_attempt(EndpointRole::Primary, true);
                    return Ok(value);
                }
                Err(e) => {
                    metrics::record_attempt(EndpointRole::Primary, false);
                    tracing::warn!(endpoint = %primary, error = %e, "Primary endpoint failed");
                    e
                }
            };

            for (i, fallback) in self.endpoints.fallbacks().iter().enumerate() {
                let role = EndpointRole::Fallback(i);
                match self.attempt(fallback, &method, path, params, body).await {
                    Ok(value) => {
                        metrics::record_attempt(role, true);
                        metrics::record_failover();
                        tracing::debug!(endpoint = %fallback, %role, "Request served by fallback");
                        return Ok(value);
                    }
                    Err(e) => {
                        metrics::record_attempt(role, false);
                        tracing::warn!(endpoint = %fallback, %role, error = %e, "Fallback endpoint failed");
                    }
                }
            }

            metrics::record_transport_failure();
            Err(ClientError::TransportFailure {
                attempted: self.endpoints.len(),
                primary: primary_error,
            })
        }
        .instrument(span)
        .await
    }

    /// A single attempt against one endpoint, bounded by the timeout.
    async fn attempt(
        &self,
        base: &Url,
        method: &Method,
        path: &str,
        params: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, TransportError> {
        let url = endpoint_url(base, path);

        let mut request = self.http.request(method.clone(), url.as_str());
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        with_timeout(self.timeout, &url, async {
            let response = request.send().await.map_err(|source| TransportError::Network {
                url: url.clone(),
                source,
            })?;

            let status = response.status();
            let text = response.text().await.map_err(|source| TransportError::Network {
                url: url.clone(),
                source,
            })?;

            if !status.is_success() {
                return Err(TransportError::Status {
                    url: url.clone(),
                    status: status.as_u16(),
                    body: text,
                });
            }

            // An empty 2xx body is still a success.
            if text.trim().is_empty() {
                return Ok(Value::Null);
            }

            serde_json::from_str(&text).map_err(|e| TransportError::Body {
                url: url.clone(),
                reason: e.to_string(),
            })
        })
        .await
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> ClientResult<T> {
    serde_json::from_value(value).map_err(|source| ClientError::Decode {
        path: path.to_string(),
        source,
    })
}

impl std::fmt::Debug for FailoverClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverClient")
            .field("primary", &self.endpoints.primary().as_str())
            .field("fallbacks", &self.endpoints.fallbacks().len())
            .field("timeout_ms", &self.timeout.as_millis())
            .finish()
    }
}
