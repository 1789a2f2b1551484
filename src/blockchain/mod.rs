//! Index service transport subsystem.
//!
//! # Data Flow
//! ```text
//! BridgeConfig (endpointURL, endpointFallbacks, network default)
//!     → endpoint.rs (EndpointSet: primary + ordered fallbacks)
//!     → client.rs (FailoverClient: sequential attempts with per-attempt timeout)
//!     → types.rs (TransportError per attempt, ClientError per request)
//! ```
//!
//! # Constraints
//! - The primary is always tried first; fallbacks strictly in declared order
//! - When everything fails, the primary's error is the one surfaced
//! - No retries beyond the fallback chain

pub mod client;
pub mod endpoint;
pub mod types;

pub use client::FailoverClient;
pub use endpoint::{EndpointRole, EndpointSet};
pub use types::{ClientError, ClientResult, TransportError};
