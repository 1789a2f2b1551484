//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     BridgeConfig → EndpointSet → FailoverClient → IndexerRepository
//!         → TransactionAssembler → ChainActions
//! ```

pub mod startup;

pub use startup::{build_actions, build_actions_with_rng};
