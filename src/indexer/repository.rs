//! Domain queries against the index service.
//!
//! # Responsibilities
//! - Translate domain intents into filter queries with the right bounds and ordering
//! - Unwrap the `{data, meta}` envelope into plain values
//! - Pass transport failures through unchanged (404 included)

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::blockchain::{ClientResult, FailoverClient};
use crate::indexer::filter::{AuthKey, BlockKey, FilterKey, FilterQuery, SortOrder, TransactionKey};
use crate::indexer::types::{
    Envelope, FeeEstimate, IndexedTransaction, NetworkStatus, SubmitRequest, SubmitResponse,
};
use crate::ledger::{AccountAuth, Block};

pub const NETWORK_STATUS_PATH: &str = "/api/v3/network/status";
pub const NETWORK_STATISTICS_PATH: &str = "/api/v3/network/statistics";
pub const FEES_PATH: &str = "/api/v3/fees";
pub const BLOCKS_PATH: &str = "/api/v3/blocks";
pub const TRANSACTIONS_PATH: &str = "/api/v3/transactions";
pub const AUTH_PATH: &str = "/api/v3/auth";

/// Only token transfers are of interest to callers.
pub const TRANSFER_MODULE_COMMAND: &str = "token:transfer";

/// Read/write access to the index.
#[derive(Debug, Clone)]
pub struct IndexerRepository {
    client: FailoverClient,
}

impl IndexerRepository {
    pub fn new(client: FailoverClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FailoverClient {
        &self.client
    }

    /// GET `path` filtered by `query`, returning the raw decoded body.
    pub async fn get<K, T>(&self, path: &str, query: &FilterQuery<K>) -> ClientResult<T>
    where
        K: FilterKey,
        T: DeserializeOwned,
    {
        let params = query.to_params();
        tracing::debug!(path, ?params, "Index query");
        self.client.get(path, &params).await
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.client.post(path, payload).await
    }

    async fn get_data<K, T>(&self, path: &str, query: &FilterQuery<K>) -> ClientResult<T>
    where
        K: FilterKey,
        T: DeserializeOwned,
    {
        let envelope: Envelope<T> = self.get(path, query).await?;
        Ok(envelope.data)
    }

    async fn get_resource<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let envelope: Envelope<T> = self.client.get(path, &[]).await?;
        Ok(envelope.data)
    }

    /// Transfers sent by `sender`, starting at `from_timestamp` and walking in `order`.
    pub async fn get_outbound_transactions(
        &self,
        sender: &str,
        from_timestamp: u64,
        limit: u32,
        order: SortOrder,
    ) -> ClientResult<Vec<IndexedTransaction>> {
        let query = timeline_query(TransactionKey::SenderAddress, sender, from_timestamp, limit, order);
        self.get_data(TRANSACTIONS_PATH, &query).await
    }

    /// Transfers received by `recipient`, starting at `from_timestamp` and walking in `order`.
    pub async fn get_inbound_transactions(
        &self,
        recipient: &str,
        from_timestamp: u64,
        limit: u32,
        order: SortOrder,
    ) -> ClientResult<Vec<IndexedTransaction>> {
        let query =
            timeline_query(TransactionKey::RecipientAddress, recipient, from_timestamp, limit, order);
        self.get_data(TRANSACTIONS_PATH, &query).await
    }

    pub async fn get_inbound_transactions_from_block(
        &self,
        recipient: &str,
        block_id: &str,
    ) -> ClientResult<Vec<IndexedTransaction>> {
        let query = block_transfers_query(TransactionKey::RecipientAddress, recipient, block_id);
        self.get_data(TRANSACTIONS_PATH, &query).await
    }

    pub async fn get_outbound_transactions_from_block(
        &self,
        sender: &str,
        block_id: &str,
    ) -> ClientResult<Vec<IndexedTransaction>> {
        let query = block_transfers_query(TransactionKey::SenderAddress, sender, block_id);
        self.get_data(TRANSACTIONS_PATH, &query).await
    }

    /// Highest block, or `None` on an empty chain.
    pub async fn get_last_block(&self) -> ClientResult<Option<Block>> {
        let blocks: Vec<Block> = self.get_data(BLOCKS_PATH, &last_block_query()).await?;
        Ok(blocks.into_iter().next())
    }

    /// Highest block whose timestamp is at or before `timestamp`.
    pub async fn get_last_block_before_timestamp(&self, timestamp: u64) -> ClientResult<Option<Block>> {
        let query = last_block_query().range(BlockKey::Timestamp, Some(0), Some(timestamp));
        let blocks: Vec<Block> = self.get_data(BLOCKS_PATH, &query).await?;
        Ok(blocks.into_iter().next())
    }

    /// Blocks with height in `(from_height, to_height]`, ascending.
    ///
    /// The index only filters on inclusive ranges, so the lower boundary
    /// block is requested and then dropped.
    pub async fn get_blocks_between_heights(
        &self,
        from_height: Option<u64>,
        to_height: Option<u64>,
        limit: u32,
    ) -> ClientResult<Vec<Block>> {
        let query = blocks_between_query(from_height, to_height, limit);
        let blocks: Vec<Block> = self.get_data(BLOCKS_PATH, &query).await?;
        Ok(trim_lower_boundary(blocks, from_height))
    }

    pub async fn get_block_at_height(&self, height: u64) -> ClientResult<Option<Block>> {
        let query = FilterQuery::new().exact(BlockKey::Height, height);
        let blocks: Vec<Block> = self.get_data(BLOCKS_PATH, &query).await?;
        Ok(blocks.into_iter().next())
    }

    /// Authentication record (keys and threshold) of `address`.
    pub async fn get_auth(&self, address: &str) -> ClientResult<AccountAuth> {
        let query = FilterQuery::new().exact(AuthKey::Address, address);
        self.get_data(AUTH_PATH, &query).await
    }

    pub async fn get_network_status(&self) -> ClientResult<NetworkStatus> {
        self.get_resource(NETWORK_STATUS_PATH).await
    }

    /// Network statistics, passed through as reported.
    pub async fn get_network_statistics(&self) -> ClientResult<Value> {
        self.get_resource(NETWORK_STATISTICS_PATH).await
    }

    pub async fn get_fee_estimate(&self) -> ClientResult<FeeEstimate> {
        self.get_resource(FEES_PATH).await
    }

    /// Submit a hex-encoded transaction. An empty response body decodes to the default.
    pub async fn post_transaction(&self, payload_hex: &str) -> ClientResult<SubmitResponse> {
        let body = SubmitRequest { transaction: payload_hex };
        let response: Option<SubmitResponse> = self.post(TRANSACTIONS_PATH, &body).await?;
        Ok(response.unwrap_or_default())
    }
}

/// Transfers of one account ordered by time.
///
/// Ascending walks forward from `from_timestamp` (`from:`), descending walks
/// back from it (`0:from`).
pub fn timeline_query(
    account_key: TransactionKey,
    account: &str,
    from_timestamp: u64,
    limit: u32,
    order: SortOrder,
) -> FilterQuery<TransactionKey> {
    let query = FilterQuery::new()
        .exact(account_key, account)
        .exact(TransactionKey::ModuleCommand, TRANSFER_MODULE_COMMAND)
        .limit(limit);

    let query = match order {
        SortOrder::Asc => query.range(TransactionKey::Timestamp, Some(from_timestamp), None),
        SortOrder::Desc => query.range(TransactionKey::Timestamp, Some(0), Some(from_timestamp)),
    };
    query.sort(TransactionKey::Timestamp, order)
}

pub fn block_transfers_query(
    account_key: TransactionKey,
    account: &str,
    block_id: &str,
) -> FilterQuery<TransactionKey> {
    FilterQuery::new()
        .exact(account_key, account)
        .exact(TransactionKey::BlockId, block_id)
        .exact(TransactionKey::ModuleCommand, TRANSFER_MODULE_COMMAND)
}

pub fn last_block_query() -> FilterQuery<BlockKey> {
    FilterQuery::new().sort(BlockKey::Height, SortOrder::Desc).limit(1)
}

pub fn blocks_between_query(
    from_height: Option<u64>,
    to_height: Option<u64>,
    limit: u32,
) -> FilterQuery<BlockKey> {
    FilterQuery::new()
        .range(BlockKey::Height, from_height, to_height)
        .sort(BlockKey::Height, SortOrder::Asc)
        .limit(limit)
}

/// Drop the first block when it sits exactly on the exclusive lower bound.
pub fn trim_lower_boundary(mut blocks: Vec<Block>, from_height: Option<u64>) -> Vec<Block> {
    let on_boundary = matches!(
        (blocks.first(), from_height),
        (Some(first), Some(from)) if first.height == from
    );
    if on_boundary {
        blocks.remove(0);
    }
    blocks
}
