//! Transfer assembly and broadcast for a multisig wallet.
//!
//! # Responsibilities
//! - Look up the wallet's members and threshold
//! - Select a signature quorum and lay it out in member order
//! - Encode the canonical payload and derive the transaction id
//! - Submit through the repository and interpret the outcome

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::blockchain::ClientError;
use crate::indexer::IndexerRepository;
use crate::ledger::model::u64_from_str_or_num;
use crate::ledger::{Address, AddressError, SignaturePacket, Transaction, TransactionPayload, TransferParams};
use crate::multisig::quorum::{member_packets, position_signatures, select_quorum};
use crate::observability::metrics;

pub const TOKEN_MODULE: &str = "token";
pub const TRANSFER_COMMAND: &str = "transfer";
pub const TOKEN_ID_LENGTH: usize = 8;
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Errors raised while assembling or broadcasting a transfer.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("invalid hex in {field}: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("invalid recipient address: {0}")]
    Address(#[from] AddressError),

    #[error("sender key belongs to {actual}, not the configured wallet {expected}")]
    SenderMismatch { expected: String, actual: String },

    #[error("token id must be 8 bytes, got {0}")]
    InvalidTokenId(usize),

    #[error("public key must be 32 bytes, got {0}")]
    InvalidPublicKey(usize),

    #[error("broadcast rejected: {reason}")]
    BroadcastRejected { reason: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// A transfer to assemble. Binary fields are hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub sender_public_key: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub nonce: u64,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub fee: u64,
    #[serde(rename = "tokenID")]
    pub token_id: String,
    pub recipient_address: String,
    #[serde(deserialize_with = "u64_from_str_or_num")]
    pub amount: u64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub signatures: Vec<SignaturePacket>,
}

/// An encoded transfer ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledTransaction {
    pub id: String,
    pub payload: TransactionPayload,
    pub bytes: Vec<u8>,
}

impl AssembledTransaction {
    pub fn payload_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Number of non-empty signature slots.
    pub fn signature_count(&self) -> usize {
        self.payload.signatures.iter().filter(|s| !s.is_empty()).count()
    }
}

/// Outcome of an accepted broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastReceipt {
    /// Locally derived id.
    pub id: String,
    /// Id reported by the service.
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
    pub message: Option<String>,
}

/// Builds and submits transfers on behalf of one multisig wallet.
#[derive(Debug)]
pub struct TransactionAssembler<R = StdRng> {
    repository: IndexerRepository,
    wallet_address: Address,
    rng: Mutex<R>,
}

impl TransactionAssembler<StdRng> {
    pub fn new(repository: IndexerRepository, wallet_address: Address) -> Self {
        Self::with_rng(repository, wallet_address, StdRng::from_entropy())
    }
}

impl<R: Rng> TransactionAssembler<R> {
    /// Use a caller-supplied random source for quorum selection.
    pub fn with_rng(repository: IndexerRepository, wallet_address: Address, rng: R) -> Self {
        Self {
            repository,
            wallet_address,
            rng: Mutex::new(rng),
        }
    }

    pub fn wallet_address(&self) -> &Address {
        &self.wallet_address
    }

    /// Encode `request` with a quorum of its signatures.
    pub async fn assemble(&self, request: &TransferRequest) -> AssemblyResult<AssembledTransaction> {
        let sender_public_key = decode_hex("senderPublicKey", &request.sender_public_key)?;
        if sender_public_key.len() != PUBLIC_KEY_LENGTH {
            return Err(AssemblyError::InvalidPublicKey(sender_public_key.len()));
        }
        let sender = Address::from_public_key(&sender_public_key);
        if sender != self.wallet_address {
            return Err(AssemblyError::SenderMismatch {
                expected: self.wallet_address.to_lisk32(),
                actual: sender.to_lisk32(),
            });
        }

        let token_id = decode_hex("tokenID", &request.token_id)?;
        if token_id.len() != TOKEN_ID_LENGTH {
            return Err(AssemblyError::InvalidTokenId(token_id.len()));
        }
        let recipient_address = Address::from_lisk32(&request.recipient_address)?;

        let sender_lisk32 = sender.to_lisk32();
        let auth = self.repository.get_auth(&sender_lisk32).await?;
        let members = auth.members();

        let candidates = if members.is_empty() {
            request.signatures.iter().collect()
        } else {
            member_packets(&members, &request.signatures)
        };
        let selected = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            select_quorum(&candidates, auth.threshold(), &mut *rng)
        };
        let signatures = position_signatures(&members, &selected)
            .map_err(|source| AssemblyError::InvalidHex { field: "signature", source })?;

        tracing::debug!(
            sender = %sender_lisk32,
            members = members.len(),
            threshold = auth.threshold(),
            supplied = request.signatures.len(),
            selected = selected.len(),
            "Quorum selected"
        );

        let params = TransferParams {
            token_id,
            amount: request.amount,
            recipient_address,
            data: request.message.clone(),
        };
        let payload = TransactionPayload {
            module: TOKEN_MODULE.to_string(),
            command: TRANSFER_COMMAND.to_string(),
            nonce: request.nonce,
            fee: request.fee,
            sender_public_key,
            params: params.encode(),
            signatures,
        };
        let bytes = payload.encode();

        Ok(AssembledTransaction {
            id: Transaction::compute_id(&sender_lisk32, request.nonce),
            payload,
            bytes,
        })
    }

    /// Submit an assembled transfer. Accepted only if the service returns an id.
    pub async fn broadcast(&self, assembled: &AssembledTransaction) -> AssemblyResult<BroadcastReceipt> {
        let response = self.repository.post_transaction(&assembled.payload_hex()).await?;

        match response.transaction_id {
            Some(transaction_id) => {
                metrics::record_broadcast(true);
                tracing::info!(id = %assembled.id, %transaction_id, "Transaction accepted");
                Ok(BroadcastReceipt {
                    id: assembled.id.clone(),
                    transaction_id,
                    message: response.message,
                })
            }
            None => {
                metrics::record_broadcast(false);
                let reason = response
                    .message
                    .unwrap_or_else(|| "response carried no transaction id".to_string());
                tracing::warn!(id = %assembled.id, %reason, "Transaction rejected");
                Err(AssemblyError::BroadcastRejected { reason })
            }
        }
    }

    /// Assemble then broadcast.
    pub async fn submit(&self, request: &TransferRequest) -> AssemblyResult<BroadcastReceipt> {
        let assembled = self.assemble(request).await?;
        self.broadcast(&assembled).await
    }
}

fn decode_hex(field: &'static str, value: &str) -> AssemblyResult<Vec<u8>> {
    hex::decode(value).map_err(|source| AssemblyError::InvalidHex { field, source })
}
