//! Tagged action requests: `{"action": "<name>", "params": {...}}`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::error::{ActionError, ActionResult};
use crate::actions::handlers::*;
use crate::actions::params::{
    BlockTransactionsParams, HeightParams, HeightRangeParams, NoParams, TimelineParams,
    TimestampParams, WalletParams,
};
use crate::multisig::TransferRequest;

/// One named action with its parameter record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", content = "params", rename_all = "camelCase")]
pub enum ActionRequest {
    GetMultisigWalletMembers(WalletParams),
    GetMinMultisigRequiredSignatures(WalletParams),
    GetOutboundTransactions(TimelineParams),
    GetInboundTransactions(TimelineParams),
    GetInboundTransactionsFromBlock(BlockTransactionsParams),
    GetOutboundTransactionsFromBlock(BlockTransactionsParams),
    GetMaxBlockHeight(NoParams),
    GetBlocksBetweenHeights(HeightRangeParams),
    GetBlockAtHeight(HeightParams),
    GetLastBlockAtTimestamp(TimestampParams),
    GetNetworkStatus(NoParams),
    GetFeeEstimate(NoParams),
    PostTransaction(TransferRequest),
}

impl ActionRequest {
    /// Parse a request, treating a missing `params` as `{}`.
    pub fn from_value(mut value: Value) -> Result<Self, serde_json::Error> {
        if let Value::Object(map) = &mut value {
            map.entry("params").or_insert_with(|| Value::Object(Default::default()));
        }
        serde_json::from_value(value)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ActionRequest::GetMultisigWalletMembers(_) => GET_MULTISIG_WALLET_MEMBERS,
            ActionRequest::GetMinMultisigRequiredSignatures(_) => GET_MIN_MULTISIG_REQUIRED_SIGNATURES,
            ActionRequest::GetOutboundTransactions(_) => GET_OUTBOUND_TRANSACTIONS,
            ActionRequest::GetInboundTransactions(_) => GET_INBOUND_TRANSACTIONS,
            ActionRequest::GetInboundTransactionsFromBlock(_) => GET_INBOUND_TRANSACTIONS_FROM_BLOCK,
            ActionRequest::GetOutboundTransactionsFromBlock(_) => GET_OUTBOUND_TRANSACTIONS_FROM_BLOCK,
            ActionRequest::GetMaxBlockHeight(_) => GET_MAX_BLOCK_HEIGHT,
            ActionRequest::GetBlocksBetweenHeights(_) => GET_BLOCKS_BETWEEN_HEIGHTS,
            ActionRequest::GetBlockAtHeight(_) => GET_BLOCK_AT_HEIGHT,
            ActionRequest::GetLastBlockAtTimestamp(_) => GET_LAST_BLOCK_AT_TIMESTAMP,
            ActionRequest::GetNetworkStatus(_) => GET_NETWORK_STATUS,
            ActionRequest::GetFeeEstimate(_) => GET_FEE_ESTIMATE,
            ActionRequest::PostTransaction(_) => POST_TRANSACTION,
        }
    }
}

impl<R: Rng> ChainActions<R> {
    /// Run `request` and render its result as JSON.
    pub async fn handle(&self, request: ActionRequest) -> ActionResult<Value> {
        let action = request.name();
        tracing::debug!(action, "Handling action");

        match request {
            ActionRequest::GetMultisigWalletMembers(p) => render(action, self.get_multisig_wallet_members(p).await?),
            ActionRequest::GetMinMultisigRequiredSignatures(p) => {
                render(action, self.get_min_multisig_required_signatures(p).await?)
            }
            ActionRequest::GetOutboundTransactions(p) => render(action, self.get_outbound_transactions(p).await?),
            ActionRequest::GetInboundTransactions(p) => render(action, self.get_inbound_transactions(p).await?),
            ActionRequest::GetInboundTransactionsFromBlock(p) => {
                render(action, self.get_inbound_transactions_from_block(p).await?)
            }
            ActionRequest::GetOutboundTransactionsFromBlock(p) => {
                render(action, self.get_outbound_transactions_from_block(p).await?)
            }
            ActionRequest::GetMaxBlockHeight(_) => render(action, self.get_max_block_height().await?),
            ActionRequest::GetBlocksBetweenHeights(p) => render(action, self.get_blocks_between_heights(p).await?),
            ActionRequest::GetBlockAtHeight(p) => render(action, self.get_block_at_height(p).await?),
            ActionRequest::GetLastBlockAtTimestamp(p) => render(action, self.get_last_block_at_timestamp(p).await?),
            ActionRequest::GetNetworkStatus(_) => render(action, self.get_network_status().await?),
            ActionRequest::GetFeeEstimate(_) => render(action, self.get_fee_estimate().await?),
            ActionRequest::PostTransaction(p) => render(action, self.post_transaction(p).await?),
        }
    }
}

fn render<T: Serialize>(action: &'static str, value: T) -> ActionResult<Value> {
    serde_json::to_value(value).map_err(|e| ActionError::failed(action, e))
}
