//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to index service:
//!     → timeouts.rs (enforce per-attempt deadline)
//!     → On failure: blockchain::client moves to the next endpoint in the set
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Failover is the only recovery: no backoff, no circuit breaker, no cache
//! - Attempts are strictly sequential so a POST is never in flight twice

pub mod timeouts;
