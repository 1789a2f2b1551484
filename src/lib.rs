//! Ledger index bridge library.
//!
//! Reads blocks, transactions and account settings from a Lisk-style index
//! service through a failover client, and assembles threshold-signed
//! transfers for one multisig wallet.

pub mod actions;
pub mod blockchain;
pub mod config;
pub mod indexer;
pub mod ledger;
pub mod lifecycle;
pub mod multisig;
pub mod observability;
pub mod resilience;

pub use actions::{ActionError, ActionRequest, ChainActions};
pub use blockchain::{EndpointSet, FailoverClient};
pub use config::schema::BridgeConfig;
pub use indexer::IndexerRepository;
pub use multisig::TransactionAssembler;
