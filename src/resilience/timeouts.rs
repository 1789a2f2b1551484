//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap each individual endpoint attempt with a deadline
//! - Report expiry as a distinct transport error naming the URL
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors
//! - A timed-out attempt is a failure like any other; the failover chain decides what happens next

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::TransportError;

/// Run one attempt against `url`, failing with [`TransportError::Timeout`] after `limit`.
pub async fn with_timeout<F, T>(limit: Duration, url: &str, attempt: F) -> Result<T, TransportError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    match timeout(limit, attempt).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout {
            url: url.to_string(),
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}
