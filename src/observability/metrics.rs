//! Metrics collection.
//!
//! # Metrics
//! - `indexer_requests_total` (counter): attempts by endpoint role and outcome
//! - `indexer_failover_total` (counter): requests answered by a fallback
//! - `indexer_transport_failures_total` (counter): requests where every endpoint failed
//! - `indexer_broadcast_total` (counter): transaction submissions by outcome
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the embedding application installs the recorder
//! - Without a recorder every call is a no-op

use crate::blockchain::endpoint::EndpointRole;

/// Record the outcome of one endpoint attempt.
pub fn record_attempt(role: EndpointRole, success: bool) {
    metrics::counter!(
        "indexer_requests_total",
        "endpoint" => role.as_str(),
        "outcome" => if success { "success" } else { "failure" }
    )
    .increment(1);
}

/// Record a request that only succeeded on a fallback endpoint.
pub fn record_failover() {
    metrics::counter!("indexer_failover_total").increment(1);
}

/// Record a request where the primary and all fallbacks failed.
pub fn record_transport_failure() {
    metrics::counter!("indexer_transport_failures_total").increment(1);
}

/// Record a transaction submission.
pub fn record_broadcast(accepted: bool) {
    metrics::counter!(
        "indexer_broadcast_total",
        "outcome" => if accepted { "accepted" } else { "rejected" }
    )
    .increment(1);
}
