//! Stake-modifier engine.
//!
//! The stake modifier prevents a txout owner from computing, at the moment
//! the coin confirms, the future proofs-of-stake that coin will generate:
//! the kernel must hash with a modifier that does not exist yet. The
//! modifier is 64 bits, each contributed by one block selected from a past
//! time window; selection keys on a hash of each candidate's proof-hash and
//! the previous modifier. Modifiers are recomputed on a fixed interval
//! rather than every block, which makes it hard for an attacker to gain
//! control of additional bits even after generating a chain of blocks.

use crate::checksum::{check_stake_modifier_checkpoint, stake_modifier_checksum};
use crate::error::KernelError;
use onyx_chain::{BlockId, BlockIndex};
use onyx_crypto::sha256d_multi;
use onyx_types::arith::hash_to_u256;
use onyx_types::{ConsensusParams, Hash256};
use primitive_types::U256;
use std::collections::HashSet;

/// Number of selection rounds — one entropy bit per round.
const SELECTION_ROUNDS: usize = 64;

/// A computed stake modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StakeModifier {
    pub value: u64,
    /// Whether a fresh modifier was generated, as opposed to the previous
    /// one being carried forward within the same interval.
    pub generated: bool,
}

/// Duration in seconds of one selection round. Early rounds are shorter,
/// shaped by the interval ratio.
fn selection_interval_section(params: &ConsensusParams, section: usize) -> i64 {
    debug_assert!(section < SELECTION_ROUNDS);
    params.modifier_interval * 63
        / (63 + (63 - section as i64) * (params.modifier_interval_ratio - 1))
}

/// Total time window from which modifier candidates are drawn.
///
/// Derived by summing the sections, never hard-coded.
pub fn selection_interval(params: &ConsensusParams) -> i64 {
    (0..SELECTION_ROUNDS)
        .map(|section| selection_interval_section(params, section))
        .sum()
}

/// Last generated modifier and its generation time, walking back from
/// `from`.
fn last_stake_modifier(index: &BlockIndex, from: BlockId) -> Result<(u64, i64), KernelError> {
    let mut id = from;
    loop {
        let entry = index.get(id);
        if entry.generated_stake_modifier() {
            return Ok((entry.stake_modifier, entry.time));
        }
        match entry.prev {
            Some(prev) => id = prev,
            None => return Err(KernelError::NoGeneratedModifier),
        }
    }
}

/// Select one block from the candidates: ascending-time order, blocks
/// already chosen in earlier rounds excluded, and timestamps past `stop`
/// cut off once a provisional winner exists.
fn select_block_from_candidates(
    index: &BlockIndex,
    candidates: &[(i64, Hash256)],
    selected: &HashSet<Hash256>,
    stop: i64,
    prev_modifier: u64,
) -> Result<BlockId, KernelError> {
    let mut best: Option<(U256, BlockId)> = None;
    for (_, hash) in candidates {
        let id = index
            .lookup(hash)
            .ok_or(KernelError::CandidateNotIndexed(*hash))?;
        let entry = index.get(id);
        if best.is_some() && entry.time > stop {
            break;
        }
        if selected.contains(&entry.block_hash) {
            continue;
        }
        // selection keys on the proof-hash and the previous modifier
        let proof_hash = if entry.is_proof_of_stake() {
            entry.hash_proof_of_stake
        } else {
            entry.block_hash
        };
        let digest = sha256d_multi(&[proof_hash.as_bytes(), &prev_modifier.to_le_bytes()]);
        let mut selection = hash_to_u256(&digest);
        // proof-of-stake candidates are favored 2^32 over proof-of-work,
        // preserving the energy-efficiency property
        if entry.is_proof_of_stake() {
            selection = selection >> 32;
        }
        match best {
            Some((best_selection, _)) if selection >= best_selection => {}
            _ => best = Some((selection, id)),
        }
    }
    best.map(|(_, id)| id)
        .ok_or(KernelError::NoSelectableCandidate)
}

/// Compute the stake modifier for the block following `prev`.
///
/// Returns the carried-forward modifier when `prev` still lies in the same
/// modifier interval as the last generation; otherwise assembles a fresh
/// 64-bit modifier from 64 selection rounds over the past window.
pub fn compute_next_stake_modifier(
    params: &ConsensusParams,
    index: &BlockIndex,
    prev: Option<BlockId>,
) -> Result<StakeModifier, KernelError> {
    let prev = match prev {
        // genesis block's modifier is 0
        None => {
            return Ok(StakeModifier {
                value: 0,
                generated: true,
            })
        }
        Some(id) => id,
    };
    let prev_entry = index.get(prev);

    let (modifier, modifier_time) = last_stake_modifier(index, prev)?;
    tracing::debug!(modifier, modifier_time, "previous stake modifier");
    if modifier_time / params.modifier_interval >= prev_entry.time / params.modifier_interval {
        return Ok(StakeModifier {
            value: modifier,
            generated: false,
        });
    }

    // Gather every ancestor inside the selection window, then order oldest
    // first. The sort is stable, so equal timestamps keep chain order.
    let interval = selection_interval(params);
    let start =
        (prev_entry.time / params.modifier_interval) * params.modifier_interval - interval;
    let mut candidates: Vec<(i64, Hash256)> = Vec::with_capacity(
        (SELECTION_ROUNDS as i64 * params.modifier_interval / params.pos_target_spacing) as usize,
    );
    let mut cursor = Some(prev);
    while let Some(id) = cursor {
        let entry = index.get(id);
        if entry.time < start {
            break;
        }
        candidates.push((entry.time, entry.block_hash));
        cursor = entry.prev;
    }
    candidates.reverse();
    candidates.sort_by_key(|&(time, _)| time);

    // Select 64 blocks, one entropy bit each.
    let mut new_modifier: u64 = 0;
    let mut stop = start;
    let mut selected: HashSet<Hash256> = HashSet::new();
    for round in 0..SELECTION_ROUNDS.min(candidates.len()) {
        stop += selection_interval_section(params, round);
        let winner = select_block_from_candidates(index, &candidates, &selected, stop, modifier)?;
        let entry = index.get(winner);
        new_modifier |= entry.stake_entropy_bit() << round;
        selected.insert(entry.block_hash);
    }

    tracing::debug!(
        modifier = new_modifier,
        time = prev_entry.time,
        "generated stake modifier"
    );
    Ok(StakeModifier {
        value: new_modifier,
        generated: true,
    })
}

/// Fill a freshly connected entry's stake fields and gate the result
/// against the hard checkpoints.
///
/// The single writer of the modifier and checksum fields: hosts call this
/// while connecting a block, after every ancestor has been finalized.
pub fn connect_stake_modifier(
    params: &ConsensusParams,
    index: &mut BlockIndex,
    id: BlockId,
) -> Result<(), KernelError> {
    let modifier = compute_next_stake_modifier(params, index, index.get(id).prev)?;
    index
        .get_mut(id)
        .set_stake_modifier(modifier.value, modifier.generated);

    let checksum = stake_modifier_checksum(index, id);
    index.get_mut(id).stake_modifier_checksum = checksum;

    let height = index.get(id).height;
    if !check_stake_modifier_checkpoint(params, height, checksum) {
        return Err(KernelError::CheckpointMismatch { height, checksum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_chain::BlockIndexEntry;

    fn make_hash(byte: u8) -> Hash256 {
        Hash256::new([byte; 32])
    }

    /// Selection magnitude of a proof-of-work candidate, recomputed the way
    /// the engine does.
    fn pow_selection(hash: &Hash256, prev_modifier: u64) -> U256 {
        let digest = sha256d_multi(&[hash.as_bytes(), &prev_modifier.to_le_bytes()]);
        hash_to_u256(&digest)
    }

    #[test]
    fn sections_shrink_toward_round_zero_and_sum_to_interval() {
        let params = ConsensusParams::mainnet();
        assert_eq!(selection_interval_section(&params, 0), 160);
        assert_eq!(selection_interval_section(&params, 63), 480);
        for section in 1..SELECTION_ROUNDS {
            assert!(
                selection_interval_section(&params, section)
                    >= selection_interval_section(&params, section - 1)
            );
        }
        assert_eq!(selection_interval(&params), 16_900);
    }

    #[test]
    fn genesis_modifier_is_zero_and_generated() {
        let params = ConsensusParams::mainnet();
        let index = BlockIndex::new();
        let modifier = compute_next_stake_modifier(&params, &index, None).unwrap();
        assert_eq!(
            modifier,
            StakeModifier {
                value: 0,
                generated: true
            }
        );
    }

    #[test]
    fn genesis_without_generation_flag_is_a_logic_bug() {
        let params = ConsensusParams::mainnet();
        let mut index = BlockIndex::new();
        let genesis = index.insert(BlockIndexEntry::new(make_hash(2), 0, 1_500_000_000, None));
        let result = compute_next_stake_modifier(&params, &index, Some(genesis));
        assert!(matches!(result, Err(KernelError::NoGeneratedModifier)));
    }

    #[test]
    fn stop_cutoff_skips_late_candidates_once_a_winner_exists() {
        let mut index = BlockIndex::new();
        let a = index.insert(BlockIndexEntry::new(make_hash(2), 0, 100, None));
        let b = index.insert(BlockIndexEntry::new(make_hash(4), 1, 200, Some(a)));
        index.insert(BlockIndexEntry::new(make_hash(6), 2, 300, Some(b)));

        let candidates = vec![(100, make_hash(2)), (200, make_hash(4)), (300, make_hash(6))];

        // with the first candidate consumed by an earlier round, the one at
        // 200 is adopted past the stop, and the one at 300 is never reached
        let mut selected = HashSet::new();
        selected.insert(make_hash(2));
        let winner =
            select_block_from_candidates(&index, &candidates, &selected, 150, 0).unwrap();
        assert_eq!(index.get(winner).block_hash, make_hash(4));

        // with nothing pre-selected the first candidate wins outright and
        // everything past the stop is cut off
        let winner =
            select_block_from_candidates(&index, &candidates, &HashSet::new(), 150, 0).unwrap();
        assert_eq!(index.get(winner).block_hash, make_hash(2));
    }

    #[test]
    fn all_pow_candidates_select_smallest_selection_hash() {
        let mut index = BlockIndex::new();
        let mut prev = None;
        let mut candidates = Vec::new();
        for (i, byte) in [2u8, 4, 6, 8, 10].iter().enumerate() {
            let entry = BlockIndexEntry::new(make_hash(*byte), i as u32, 100, prev);
            candidates.push((100, entry.block_hash));
            prev = Some(index.insert(entry));
        }

        let winner =
            select_block_from_candidates(&index, &candidates, &HashSet::new(), 1_000, 7).unwrap();
        let expected = candidates
            .iter()
            .min_by_key(|(_, hash)| pow_selection(hash, 7))
            .unwrap()
            .1;
        assert_eq!(index.get(winner).block_hash, expected);
    }

    #[test]
    fn proof_of_stake_candidate_beats_equal_proof_of_work_hash() {
        // identical pre-shift selection hashes: the PoS entry's kernel proof
        // equals the PoW entry's block hash
        let mut index = BlockIndex::new();
        let pow_hash = make_hash(2);
        let pow = index.insert(BlockIndexEntry::new(pow_hash, 0, 100, None));
        let mut pos_entry = BlockIndexEntry::new(make_hash(4), 1, 100, Some(pow));
        pos_entry.set_proof_of_stake(pow_hash);
        index.insert(pos_entry);

        assert!(pow_selection(&pow_hash, 0) >= (U256::one() << 32));

        let candidates = vec![(100, make_hash(2)), (100, make_hash(4))];
        let winner =
            select_block_from_candidates(&index, &candidates, &HashSet::new(), 1_000, 0).unwrap();
        assert_eq!(index.get(winner).block_hash, make_hash(4));
    }

    #[test]
    fn unknown_candidate_aborts_selection() {
        let index = BlockIndex::new();
        let candidates = vec![(100, make_hash(2))];
        let result = select_block_from_candidates(&index, &candidates, &HashSet::new(), 1_000, 0);
        assert!(matches!(result, Err(KernelError::CandidateNotIndexed(_))));
    }
}
