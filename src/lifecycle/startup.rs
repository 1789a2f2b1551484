//! Startup orchestration.
//!
//! # Responsibilities
//! - Check the values every action depends on
//! - Build the endpoint set, client, repository and assembler in dependency order
//!
//! # Design Decisions
//! - Fail fast: a missing or malformed wallet address is fatal
//! - Everything built here is immutable and shared by clones of `ChainActions`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::actions::{ActionError, ChainActions};
use crate::blockchain::{EndpointSet, FailoverClient};
use crate::config::BridgeConfig;
use crate::indexer::IndexerRepository;
use crate::ledger::Address;
use crate::multisig::TransactionAssembler;

/// Wire every subsystem described by `config`.
pub fn build_actions(config: &BridgeConfig) -> Result<ChainActions<StdRng>, ActionError> {
    build_actions_with_rng(config, StdRng::from_entropy())
}

/// As [`build_actions`], with a caller-supplied quorum random source.
pub fn build_actions_with_rng<R: Rng>(
    config: &BridgeConfig,
    rng: R,
) -> Result<ChainActions<R>, ActionError> {
    let wallet_address = wallet_address(config)?;

    let endpoints = EndpointSet::from_config(config)
        .map_err(|e| ActionError::InvalidConfiguration(e.to_string()))?;
    let client = FailoverClient::new(endpoints, config.request_timeout())
        .map_err(|e| ActionError::InvalidConfiguration(e.to_string()))?;
    let repository = IndexerRepository::new(client);
    let assembler = TransactionAssembler::with_rng(repository.clone(), wallet_address, rng);

    tracing::info!(
        network = ?config.network,
        wallet = %wallet_address,
        "Chain actions ready"
    );

    Ok(ChainActions::new(repository, assembler))
}

fn wallet_address(config: &BridgeConfig) -> Result<Address, ActionError> {
    let raw = config
        .wallet_address
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ActionError::InvalidConfiguration("walletAddress is required".to_string()))?;

    raw.parse().map_err(|e| {
        ActionError::InvalidConfiguration(format!("walletAddress '{}' is invalid: {}", raw, e))
    })
}
