//! Conversion of indexed transactions into domain transactions.

use crate::indexer::types::IndexedTransaction;
use crate::ledger::{Address, SignaturePacket, Transaction};

/// Build a [`Transaction`] from its indexed copy.
///
/// Multisig signatures are positional: entry `i` belongs to `members[i]`
/// and empty entries are placeholders for members that did not sign. When
/// the signature count does not line up with `members` the transaction is
/// treated as single-signature and every signature is attributed to the
/// sender key.
pub fn to_transaction(indexed: &IndexedTransaction, members: &[String]) -> Transaction {
    let positional = !members.is_empty() && indexed.signatures.len() == members.len();

    let signatures = indexed
        .signatures
        .iter()
        .enumerate()
        .filter(|(_, signature)| !signature.is_empty())
        .map(|(i, signature)| {
            let public_key = if positional {
                members[i].clone()
            } else {
                indexed.sender.public_key.clone()
            };
            SignaturePacket {
                signer_address: signer_address(&public_key),
                public_key,
                signature: signature.clone(),
            }
        })
        .collect();

    Transaction {
        id: Transaction::compute_id(&indexed.sender.address, indexed.nonce),
        message: indexed.params.data.clone(),
        amount: indexed.params.amount,
        timestamp: indexed.timestamp(),
        sender_address: indexed.sender.address.clone(),
        recipient_address: indexed.params.recipient_address.clone(),
        nonce: indexed.nonce,
        signatures,
    }
}

/// lisk32 address of a hex public key; empty when the key is not valid hex.
fn signer_address(public_key_hex: &str) -> String {
    match hex::decode(public_key_hex) {
        Ok(bytes) => Address::from_public_key(&bytes).to_lisk32(),
        Err(e) => {
            tracing::debug!(public_key = public_key_hex, error = %e, "Unparseable signer key");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::types::{IndexedBlockRef, IndexedSender, IndexedTransferParams};

    fn indexed(signatures: Vec<&str>) -> IndexedTransaction {
        IndexedTransaction {
            id: "remote-id".into(),
            module_command: "token:transfer".into(),
            nonce: 3,
            fee: 1000,
            sender: IndexedSender {
                address: "lsksender".into(),
                public_key: "11".repeat(32),
            },
            params: IndexedTransferParams {
                token_id: "0000000000000000".into(),
                amount: 250,
                recipient_address: "lskrecipient".into(),
                data: "memo".into(),
            },
            block: Some(IndexedBlockRef {
                id: "b9".into(),
                height: 9,
                timestamp: 1_700_000_123,
            }),
            signatures: signatures.into_iter().map(String::from).collect(),
            execution_status: Some("successful".into()),
        }
    }

    #[test]
    fn test_positional_signatures_pair_with_members() {
        let members = vec!["aa".repeat(32), "bb".repeat(32), "cc".repeat(32)];
        let tx = to_transaction(&indexed(vec!["s0", "", "s2"]), &members);

        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(tx.signatures[0].public_key, members[0]);
        assert_eq!(tx.signatures[1].public_key, members[2]);
        assert_eq!(tx.signatures[1].signature, "s2");
        let expected = Address::from_public_key(&hex::decode(&members[2]).unwrap()).to_lisk32();
        assert_eq!(tx.signatures[1].signer_address, expected);
    }

    #[test]
    fn test_single_signature_uses_sender_key() {
        let tx = to_transaction(&indexed(vec!["only"]), &[]);
        assert_eq!(tx.signatures.len(), 1);
        assert_eq!(tx.signatures[0].public_key, "11".repeat(32));
    }

    #[test]
    fn test_id_is_recomputed_and_fields_copied() {
        let tx = to_transaction(&indexed(vec![]), &[]);
        assert_eq!(tx.id, Transaction::compute_id("lsksender", 3));
        assert_ne!(tx.id, "remote-id");
        assert_eq!(tx.message, "memo");
        assert_eq!(tx.amount, 250);
        assert_eq!(tx.timestamp, 1_700_000_123);
        assert_eq!(tx.recipient_address, "lskrecipient");
    }
}
