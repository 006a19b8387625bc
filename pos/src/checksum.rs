//! Modifier checksum chain and checkpoint gate.
//!
//! Every connected block carries a 32-bit checksum chained from its
//! predecessor's checksum and its own stake fields. Hard-coded checkpoints
//! pin the chain to history: a mismatch means the local modifier
//! computation has diverged from the canonical chain.

use onyx_chain::{BlockId, BlockIndex};
use onyx_crypto::sha256d_multi;
use onyx_types::ConsensusParams;

/// Chained 32-bit checksum of a block's stake-modifier state.
///
/// Hashes the predecessor's checksum (absent for genesis) with the block's
/// flags, kernel proof, and modifier; the checksum is the most significant
/// 32 bits of the digest magnitude.
pub fn stake_modifier_checksum(index: &BlockIndex, id: BlockId) -> u32 {
    let entry = index.get(id);
    let digest = match entry.prev {
        Some(prev) => sha256d_multi(&[
            &index.get(prev).stake_modifier_checksum.to_le_bytes(),
            &entry.flags.to_le_bytes(),
            entry.hash_proof_of_stake.as_bytes(),
            &entry.stake_modifier.to_le_bytes(),
        ]),
        None => sha256d_multi(&[
            &entry.flags.to_le_bytes(),
            entry.hash_proof_of_stake.as_bytes(),
            &entry.stake_modifier.to_le_bytes(),
        ]),
    };
    // most significant 32 bits of the little-endian digest magnitude
    let mut top = [0u8; 4];
    top.copy_from_slice(&digest.as_bytes()[28..]);
    u32::from_le_bytes(top)
}

/// Check a height's checksum against the hard checkpoint table. Heights
/// absent from the table always pass.
pub fn check_stake_modifier_checkpoint(
    params: &ConsensusParams,
    height: u32,
    checksum: u32,
) -> bool {
    match params.modifier_checkpoints.get(&height) {
        Some(expected) => *expected == checksum,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_chain::{block_index::BLOCK_STAKE_MODIFIER, BlockIndexEntry};
    use onyx_types::Hash256;

    fn genesis_index() -> (BlockIndex, BlockId) {
        let mut index = BlockIndex::new();
        // low bit of the hash clear: no entropy flag, so flags are exactly
        // the generated-modifier bit once connected
        let mut entry = BlockIndexEntry::new(Hash256::new([2u8; 32]), 0, 1_500_000_000, None);
        entry.set_stake_modifier(0, true);
        let id = index.insert(entry);
        (index, id)
    }

    #[test]
    fn genesis_checksum_matches_mainnet_checkpoint() {
        let (index, id) = genesis_index();
        assert_eq!(index.get(id).flags, BLOCK_STAKE_MODIFIER);
        assert_eq!(stake_modifier_checksum(&index, id), 0xfd11_f4e7);
    }

    #[test]
    fn checksum_chains_from_predecessor() {
        let (mut index, genesis) = genesis_index();
        let checksum = stake_modifier_checksum(&index, genesis);
        index.get_mut(genesis).stake_modifier_checksum = checksum;

        let mut child = BlockIndexEntry::new(Hash256::new([4u8; 32]), 1, 1_500_000_060, Some(genesis));
        child.set_stake_modifier(0, false);
        let child = index.insert(child);
        let child_checksum = stake_modifier_checksum(&index, child);

        // perturbing the parent checksum perturbs the child
        index.get_mut(genesis).stake_modifier_checksum = checksum ^ 1;
        assert_ne!(stake_modifier_checksum(&index, child), child_checksum);
    }

    #[test]
    fn checkpoint_table_gates_known_heights_only() {
        let params = ConsensusParams::mainnet();
        assert!(check_stake_modifier_checkpoint(&params, 0, 0xfd11_f4e7));
        assert!(!check_stake_modifier_checkpoint(&params, 0, 0xdead_beef));
        assert!(check_stake_modifier_checkpoint(&params, 3, 0xdead_beef));
        assert!(!check_stake_modifier_checkpoint(&params, 621_306, 0));
    }

    #[test]
    fn testnet_shares_the_genesis_checkpoint() {
        let params = ConsensusParams::testnet();
        assert!(check_stake_modifier_checkpoint(&params, 0, 0xfd11_f4e7));
        assert!(check_stake_modifier_checkpoint(&params, 1_000, 0));
    }
}
