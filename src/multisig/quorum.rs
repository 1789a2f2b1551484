//! Signature quorum selection.
//!
//! The first packet belongs to the initiating signer and is always kept.
//! The remaining `threshold - 1` signatures are drawn uniformly at random
//! from the other packets so the submitted set does not reveal which
//! co-signers were actually needed. The draw only has to produce a valid
//! quorum; it carries no security weight.

use rand::seq::index;
use rand::Rng;

use crate::ledger::SignaturePacket;

/// Packets whose public key is a member, de-duplicated by key, in supplied order.
pub fn member_packets<'a>(
    members: &[String],
    packets: &'a [SignaturePacket],
) -> Vec<&'a SignaturePacket> {
    let mut kept: Vec<&SignaturePacket> = Vec::with_capacity(packets.len());
    for packet in packets {
        if !members.iter().any(|m| m.eq_ignore_ascii_case(&packet.public_key)) {
            tracing::warn!(public_key = %packet.public_key, "Ignoring signature from non-member key");
            continue;
        }
        if kept.iter().any(|k| k.public_key.eq_ignore_ascii_case(&packet.public_key)) {
            tracing::debug!(public_key = %packet.public_key, "Ignoring duplicate signature packet");
            continue;
        }
        kept.push(packet);
    }
    kept
}

/// Keep the first packet and a uniform random subset of `threshold - 1` others.
///
/// Fewer packets than the threshold yields every packet.
pub fn select_quorum<'a, R: Rng + ?Sized>(
    packets: &[&'a SignaturePacket],
    threshold: usize,
    rng: &mut R,
) -> Vec<&'a SignaturePacket> {
    let Some((first, rest)) = packets.split_first() else {
        return Vec::new();
    };

    let wanted = threshold.saturating_sub(1).min(rest.len());
    let mut selected = Vec::with_capacity(wanted + 1);
    selected.push(*first);
    selected.extend(index::sample(rng, rest.len(), wanted).into_iter().map(|i| rest[i]));
    selected
}

/// Lay out selected signatures in member order, with empty placeholders for
/// members that are not part of the quorum.
///
/// With no members (a plain account) the selected signatures are emitted as-is.
pub fn position_signatures(
    members: &[String],
    selected: &[&SignaturePacket],
) -> Result<Vec<Vec<u8>>, hex::FromHexError> {
    if members.is_empty() {
        return selected.iter().map(|p| hex::decode(&p.signature)).collect();
    }

    members
        .iter()
        .map(|member| {
            match selected.iter().find(|p| p.public_key.eq_ignore_ascii_case(member)) {
                Some(packet) => hex::decode(&packet.signature),
                None => Ok(Vec::new()),
            }
        })
        .collect()
}
