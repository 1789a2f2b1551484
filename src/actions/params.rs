//! Parameter records accepted by the actions.
//!
//! Every record deserializes from camelCase JSON. Wallet addresses default
//! to the configured wallet when omitted.

use serde::{Deserialize, Serialize};

use crate::indexer::SortOrder;

/// Page size used when the caller does not give one. The index caps pages at 100.
pub const DEFAULT_LIMIT: u32 = 100;

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Actions that take no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoParams {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletParams {
    pub wallet_address: Option<String>,
}

/// Transfers of a wallet walked through time from `from_timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimelineParams {
    pub wallet_address: Option<String>,
    pub from_timestamp: u64,
    pub limit: u32,
    pub order: SortOrder,
}

impl Default for TimelineParams {
    fn default() -> Self {
        Self {
            wallet_address: None,
            from_timestamp: 0,
            limit: DEFAULT_LIMIT,
            order: SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockTransactionsParams {
    #[serde(default)]
    pub wallet_address: Option<String>,
    #[serde(rename = "blockID")]
    pub block_id: String,
}

/// Heights in `(from_height, to_height]`. Missing bounds are open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightRangeParams {
    #[serde(default)]
    pub from_height: Option<u64>,
    #[serde(default)]
    pub to_height: Option<u64>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeightParams {
    pub height: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampParams {
    pub timestamp: u64,
}
