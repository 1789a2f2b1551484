//! Action implementations.
//!
//! # Responsibilities
//! - Resolve parameters (default wallet) and call the repository or assembler
//! - Map missing data: list actions return empty, single-entity actions fail with `NotFound`
//! - Reject multisig-only actions on plain accounts

use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;

use crate::actions::error::{ActionError, ActionResult, EntityKind};
use crate::actions::params::{
    BlockTransactionsParams, HeightParams, HeightRangeParams, TimelineParams, TimestampParams,
    WalletParams,
};
use crate::blockchain::ClientResult;
use crate::indexer::mapper::to_transaction;
use crate::indexer::{FeeEstimate, IndexedTransaction, IndexerRepository, NetworkStatus};
use crate::ledger::{AccountAuth, Address, Block, Transaction};
use crate::multisig::{BroadcastReceipt, TransactionAssembler, TransferRequest};

pub const GET_MULTISIG_WALLET_MEMBERS: &str = "getMultisigWalletMembers";
pub const GET_MIN_MULTISIG_REQUIRED_SIGNATURES: &str = "getMinMultisigRequiredSignatures";
pub const GET_OUTBOUND_TRANSACTIONS: &str = "getOutboundTransactions";
pub const GET_INBOUND_TRANSACTIONS: &str = "getInboundTransactions";
pub const GET_INBOUND_TRANSACTIONS_FROM_BLOCK: &str = "getInboundTransactionsFromBlock";
pub const GET_OUTBOUND_TRANSACTIONS_FROM_BLOCK: &str = "getOutboundTransactionsFromBlock";
pub const GET_MAX_BLOCK_HEIGHT: &str = "getMaxBlockHeight";
pub const GET_BLOCKS_BETWEEN_HEIGHTS: &str = "getBlocksBetweenHeights";
pub const GET_BLOCK_AT_HEIGHT: &str = "getBlockAtHeight";
pub const GET_LAST_BLOCK_AT_TIMESTAMP: &str = "getLastBlockAtTimestamp";
pub const GET_NETWORK_STATUS: &str = "getNetworkStatus";
pub const GET_FEE_ESTIMATE: &str = "getFeeEstimate";
pub const POST_TRANSACTION: &str = "postTransaction";

/// Entry point for every action, bound to one wallet.
#[derive(Debug)]
pub struct ChainActions<R = StdRng> {
    repository: IndexerRepository,
    assembler: Arc<TransactionAssembler<R>>,
}

impl<R> Clone for ChainActions<R> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            assembler: Arc::clone(&self.assembler),
        }
    }
}

impl<R: Rng> ChainActions<R> {
    pub fn new(repository: IndexerRepository, assembler: TransactionAssembler<R>) -> Self {
        Self {
            repository,
            assembler: Arc::new(assembler),
        }
    }

    pub fn repository(&self) -> &IndexerRepository {
        &self.repository
    }

    pub fn wallet_address(&self) -> &Address {
        self.assembler.wallet_address()
    }

    fn resolve_wallet(&self, wallet_address: Option<String>) -> String {
        wallet_address.unwrap_or_else(|| self.wallet_address().to_lisk32())
    }

    /// Member public keys of a multisig wallet, in canonical order.
    pub async fn get_multisig_wallet_members(&self, params: WalletParams) -> ActionResult<Vec<String>> {
        let auth = self
            .multisig_auth(GET_MULTISIG_WALLET_MEMBERS, params.wallet_address)
            .await?;
        Ok(auth.members())
    }

    /// Signature threshold of a multisig wallet.
    pub async fn get_min_multisig_required_signatures(&self, params: WalletParams) -> ActionResult<u32> {
        let auth = self
            .multisig_auth(GET_MIN_MULTISIG_REQUIRED_SIGNATURES, params.wallet_address)
            .await?;
        Ok(auth.number_of_signatures)
    }

    pub async fn get_outbound_transactions(&self, params: TimelineParams) -> ActionResult<Vec<Transaction>> {
        let wallet = self.resolve_wallet(params.wallet_address);
        let indexed = list_or_empty(
            GET_OUTBOUND_TRANSACTIONS,
            self.repository
                .get_outbound_transactions(&wallet, params.from_timestamp, params.limit, params.order)
                .await,
        )?;
        self.map_sent_by(GET_OUTBOUND_TRANSACTIONS, &wallet, indexed).await
    }

    pub async fn get_inbound_transactions(&self, params: TimelineParams) -> ActionResult<Vec<Transaction>> {
        let wallet = self.resolve_wallet(params.wallet_address);
        let indexed = list_or_empty(
            GET_INBOUND_TRANSACTIONS,
            self.repository
                .get_inbound_transactions(&wallet, params.from_timestamp, params.limit, params.order)
                .await,
        )?;
        Ok(map_received(&indexed))
    }

    pub async fn get_inbound_transactions_from_block(
        &self,
        params: BlockTransactionsParams,
    ) -> ActionResult<Vec<Transaction>> {
        let wallet = self.resolve_wallet(params.wallet_address);
        let indexed = list_or_empty(
            GET_INBOUND_TRANSACTIONS_FROM_BLOCK,
            self.repository
                .get_inbound_transactions_from_block(&wallet, &params.block_id)
                .await,
        )?;
        Ok(map_received(&indexed))
    }

    pub async fn get_outbound_transactions_from_block(
        &self,
        params: BlockTransactionsParams,
    ) -> ActionResult<Vec<Transaction>> {
        let wallet = self.resolve_wallet(params.wallet_address);
        let indexed = list_or_empty(
            GET_OUTBOUND_TRANSACTIONS_FROM_BLOCK,
            self.repository
                .get_outbound_transactions_from_block(&wallet, &params.block_id)
                .await,
        )?;
        self.map_sent_by(GET_OUTBOUND_TRANSACTIONS_FROM_BLOCK, &wallet, indexed)
            .await
    }

    pub async fn get_max_block_height(&self) -> ActionResult<u64> {
        let block = single(
            GET_MAX_BLOCK_HEIGHT,
            EntityKind::Block,
            self.repository.get_last_block().await,
        )?;
        Ok(block.height)
    }

    pub async fn get_blocks_between_heights(&self, params: HeightRangeParams) -> ActionResult<Vec<Block>> {
        list_or_empty(
            GET_BLOCKS_BETWEEN_HEIGHTS,
            self.repository
                .get_blocks_between_heights(params.from_height, params.to_height, params.limit)
                .await,
        )
    }

    pub async fn get_block_at_height(&self, params: HeightParams) -> ActionResult<Block> {
        single(
            GET_BLOCK_AT_HEIGHT,
            EntityKind::Block,
            self.repository.get_block_at_height(params.height).await,
        )
    }

    /// Highest block produced at or before `timestamp`.
    pub async fn get_last_block_at_timestamp(&self, params: TimestampParams) -> ActionResult<Block> {
        single(
            GET_LAST_BLOCK_AT_TIMESTAMP,
            EntityKind::Block,
            self.repository
                .get_last_block_before_timestamp(params.timestamp)
                .await,
        )
    }

    pub async fn get_network_status(&self) -> ActionResult<NetworkStatus> {
        self.repository
            .get_network_status()
            .await
            .map_err(|e| ActionError::from_client(GET_NETWORK_STATUS, e))
    }

    pub async fn get_fee_estimate(&self) -> ActionResult<FeeEstimate> {
        self.repository
            .get_fee_estimate()
            .await
            .map_err(|e| ActionError::from_client(GET_FEE_ESTIMATE, e))
    }

    /// Assemble the transfer with a signature quorum and broadcast it.
    pub async fn post_transaction(&self, request: TransferRequest) -> ActionResult<BroadcastReceipt> {
        self.assembler
            .submit(&request)
            .await
            .map_err(|e| ActionError::from_assembly(POST_TRANSACTION, e))
    }

    async fn multisig_auth(
        &self,
        action: &'static str,
        wallet_address: Option<String>,
    ) -> ActionResult<AccountAuth> {
        let address = self.resolve_wallet(wallet_address);
        let auth = match self.repository.get_auth(&address).await {
            Ok(auth) => auth,
            Err(e) if e.is_not_found() => return Err(ActionError::NotFound(EntityKind::Account)),
            Err(e) => return Err(ActionError::from_client(action, e)),
        };

        if !auth.is_multisig() {
            return Err(ActionError::AccountNotMultisig { address });
        }
        Ok(auth)
    }

    /// Map transfers sent by `sender`, pairing signatures with its members.
    async fn map_sent_by(
        &self,
        action: &'static str,
        sender: &str,
        indexed: Vec<IndexedTransaction>,
    ) -> ActionResult<Vec<Transaction>> {
        if indexed.is_empty() {
            return Ok(Vec::new());
        }

        let members = match self.repository.get_auth(sender).await {
            Ok(auth) => auth.members(),
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(ActionError::from_client(action, e)),
        };
        Ok(indexed.iter().map(|tx| to_transaction(tx, &members)).collect())
    }
}

/// Received transfers come from arbitrary senders; signatures are attributed
/// to the sender key.
fn map_received(indexed: &[IndexedTransaction]) -> Vec<Transaction> {
    indexed.iter().map(|tx| to_transaction(tx, &[])).collect()
}

fn list_or_empty<T>(action: &'static str, result: ClientResult<Vec<T>>) -> ActionResult<Vec<T>> {
    match result {
        Ok(items) => Ok(items),
        Err(e) if e.is_not_found() => {
            tracing::debug!(action, "Index reported not found, returning empty list");
            Ok(Vec::new())
        }
        Err(e) => Err(ActionError::from_client(action, e)),
    }
}

fn single<T>(action: &'static str, kind: EntityKind, result: ClientResult<Option<T>>) -> ActionResult<T> {
    match result {
        Ok(Some(item)) => Ok(item),
        Ok(None) => Err(ActionError::NotFound(kind)),
        Err(e) if e.is_not_found() => Err(ActionError::NotFound(kind)),
        Err(e) => Err(ActionError::from_client(action, e)),
    }
}
