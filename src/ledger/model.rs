//! Ledger records exposed to callers.

use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};

/// A block header as reported by the index. Height is the ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub height: u64,
    pub timestamp: u64,
    #[serde(default)]
    pub number_of_transactions: u32,
}

/// A transfer transaction.
///
/// `id` is not copied from the index: it is recomputed from the sender
/// address and nonce with [`Transaction::compute_id`], so every party that
/// knows those two values agrees on it before the transaction is indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub message: String,
    pub amount: u64,
    pub timestamp: u64,
    pub sender_address: String,
    pub recipient_address: String,
    pub nonce: u64,
    pub signatures: Vec<SignaturePacket>,
}

impl Transaction {
    /// Deterministic transaction id: `hex(sha256("{sender_address}-{nonce}"))`.
    pub fn compute_id(sender_address: &str, nonce: u64) -> String {
        let digest = Sha256::digest(format!("{}-{}", sender_address, nonce).as_bytes());
        hex::encode(digest)
    }
}

/// Authentication settings of an account.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAuth {
    #[serde(default)]
    pub mandatory_keys: Vec<String>,
    #[serde(default)]
    pub optional_keys: Vec<String>,
    #[serde(default)]
    pub number_of_signatures: u32,
    #[serde(default, deserialize_with = "u64_from_str_or_num")]
    pub nonce: u64,
}

impl AccountAuth {
    pub fn is_multisig(&self) -> bool {
        self.number_of_signatures > 0
    }

    /// Mandatory then optional keys, de-duplicated in first-seen order.
    pub fn members(&self) -> Vec<String> {
        let mut members: Vec<String> = Vec::with_capacity(
            self.mandatory_keys.len() + self.optional_keys.len(),
        );
        for key in self.mandatory_keys.iter().chain(self.optional_keys.iter()) {
            if !members.iter().any(|m| m.eq_ignore_ascii_case(key)) {
                members.push(key.clone());
            }
        }
        members
    }

    pub fn threshold(&self) -> usize {
        self.number_of_signatures as usize
    }
}

/// A pre-computed signature from one multisig member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePacket {
    #[serde(default)]
    pub signer_address: String,
    pub public_key: String,
    pub signature: String,
}

/// Accept integers sent either as JSON numbers or as decimal strings.
pub(crate) fn u64_from_str_or_num<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
