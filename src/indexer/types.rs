//! Wire shapes returned by the index service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ledger::model::u64_from_str_or_num;

/// The `{data, meta}` envelope wrapped around every index response.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default)]
    pub meta: Value,
}

/// A transaction as stored by the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedTransaction {
    pub id: String,
    #[serde(default)]
    pub module_command: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub nonce: u64,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub fee: u64,
    pub sender: IndexedSender,
    pub params: IndexedTransferParams,
    #[serde(default)]
    pub block: Option<IndexedBlockRef>,
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub execution_status: Option<String>,
}

impl IndexedTransaction {
    /// Block timestamp, or 0 while the transaction is not yet in a block.
    pub fn timestamp(&self) -> u64 {
        self.block.as_ref().map(|b| b.timestamp).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedSender {
    pub address: String,
    pub public_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexedTransferParams {
    #[serde(rename = "tokenID", default)]
    pub token_id: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub amount: u64,
    pub recipient_address: String,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedBlockRef {
    pub id: String,
    pub height: u64,
    pub timestamp: u64,
}

/// `/network/status` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub height: u64,
    #[serde(default)]
    pub finalized_height: u64,
    #[serde(rename = "chainID", default)]
    pub chain_id: String,
    #[serde(default)]
    pub network_version: String,
}

/// `/fees` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
    pub fee_estimate_per_byte: FeeTiers,
    #[serde(rename = "feeTokenID", default)]
    pub fee_token_id: String,
    #[serde(default)]
    pub min_fee_per_byte: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTiers {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Body of `POST /transactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitRequest<'a> {
    pub transaction: &'a str,
}

/// Response to `POST /transactions`. A missing id means the service refused it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "transactionID", default)]
    pub transaction_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_transaction_from_service_json() {
        let raw = r#"{
            "data": [{
                "id": "f00d",
                "moduleCommand": "token:transfer",
                "nonce": "7",
                "fee": "160000",
                "sender": {"address": "lskaaa", "publicKey": "ab", "name": null},
                "params": {"tokenID": "0000000000000000", "amount": "100000000", "recipientAddress": "lskbbb", "data": "hi"},
                "block": {"id": "b1", "height": 12, "timestamp": 1700000000, "isFinal": true},
                "executionStatus": "successful",
                "index": 0
            }],
            "meta": {"count": 1, "offset": 0, "total": 1}
        }"#;
        let envelope: Envelope<Vec<IndexedTransaction>> = serde_json::from_str(raw).unwrap();
        let tx = &envelope.data[0];
        assert_eq!(tx.nonce, 7);
        assert_eq!(tx.params.amount, 100_000_000);
        assert_eq!(tx.timestamp(), 1_700_000_000);
        assert!(tx.signatures.is_empty());
        assert_eq!(envelope.meta["total"], 1);
    }

    #[test]
    fn test_submit_response_without_id() {
        let response: SubmitResponse =
            serde_json::from_str(r#"{"message":"Transaction payload was rejected"}"#).unwrap();
        assert!(response.transaction_id.is_none());

        let empty: Option<SubmitResponse> = serde_json::from_value(Value::Null).unwrap();
        assert!(empty.is_none());
    }
}
