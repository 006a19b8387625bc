//! Arena-indexed view of the block DAG.
//!
//! Entries hold arena ids rather than owning references; `next` is populated
//! only along the active chain, so there are no cyclic ownership edges to
//! manage. The stake fields are written once, when the block is connected,
//! and never change afterwards.

use onyx_types::Hash256;
use std::collections::HashMap;

/// Block flag bits. The values participate in the modifier checksum hash
/// and must not change.
pub const BLOCK_PROOF_OF_STAKE: u32 = 1 << 0;
pub const BLOCK_STAKE_ENTROPY: u32 = 1 << 1;
pub const BLOCK_STAKE_MODIFIER: u32 = 1 << 2;

/// Arena index of a block entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// Per-block metadata consumed by the proof-of-stake kernel.
#[derive(Clone, Debug)]
pub struct BlockIndexEntry {
    pub block_hash: Hash256,
    pub height: u32,
    /// Block time, seconds since epoch.
    pub time: i64,
    pub flags: u32,
    /// The stake modifier as of this block; meaningful once
    /// [`BLOCK_STAKE_MODIFIER`] is set.
    pub stake_modifier: u64,
    pub stake_modifier_checksum: u32,
    /// The kernel hash that justified this block; zero for proof-of-work.
    pub hash_proof_of_stake: Hash256,
    pub prev: Option<BlockId>,
    pub next: Option<BlockId>,
}

impl BlockIndexEntry {
    /// Create an entry for an accepted header.
    ///
    /// The stake entropy bit is derived here — the low bit of the block
    /// hash — and never changes afterwards.
    pub fn new(block_hash: Hash256, height: u32, time: i64, prev: Option<BlockId>) -> Self {
        let mut flags = 0;
        if block_hash.low_bit() == 1 {
            flags |= BLOCK_STAKE_ENTROPY;
        }
        Self {
            block_hash,
            height,
            time,
            flags,
            stake_modifier: 0,
            stake_modifier_checksum: 0,
            hash_proof_of_stake: Hash256::ZERO,
            prev,
            next: None,
        }
    }

    pub fn is_proof_of_stake(&self) -> bool {
        self.flags & BLOCK_PROOF_OF_STAKE != 0
    }

    /// Mark the block proof-of-stake and record its kernel proof.
    pub fn set_proof_of_stake(&mut self, hash_proof: Hash256) {
        self.flags |= BLOCK_PROOF_OF_STAKE;
        self.hash_proof_of_stake = hash_proof;
    }

    /// Whether a fresh modifier was generated at this block.
    pub fn generated_stake_modifier(&self) -> bool {
        self.flags & BLOCK_STAKE_MODIFIER != 0
    }

    /// This block's contribution to one modifier selection round.
    pub fn stake_entropy_bit(&self) -> u64 {
        u64::from(self.flags & BLOCK_STAKE_ENTROPY != 0)
    }

    /// Record the modifier computed at connect time.
    pub fn set_stake_modifier(&mut self, modifier: u64, generated: bool) {
        self.stake_modifier = modifier;
        if generated {
            self.flags |= BLOCK_STAKE_MODIFIER;
        }
    }
}

/// The block index: every known entry, addressable by arena id or hash.
#[derive(Default)]
pub struct BlockIndex {
    entries: Vec<BlockIndexEntry>,
    by_hash: HashMap<Hash256, BlockId>,
}

impl BlockIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. When the entry extends the active chain (its `prev`
    /// is set), the predecessor's forward link is established.
    pub fn insert(&mut self, entry: BlockIndexEntry) -> BlockId {
        let id = BlockId(self.entries.len());
        self.by_hash.insert(entry.block_hash, id);
        if let Some(prev) = entry.prev {
            self.entries[prev.0].next = Some(id);
        }
        self.entries.push(entry);
        id
    }

    pub fn get(&self, id: BlockId) -> &BlockIndexEntry {
        &self.entries[id.0]
    }

    pub fn get_mut(&mut self, id: BlockId) -> &mut BlockIndexEntry {
        &mut self.entries[id.0]
    }

    pub fn lookup(&self, hash: &Hash256) -> Option<BlockId> {
        self.by_hash.get(hash).copied()
    }

    pub fn contains(&self, hash: &Hash256) -> bool {
        self.by_hash.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_hash(byte: u8) -> Hash256 {
        Hash256::new([byte; 32])
    }

    #[test]
    fn entropy_bit_follows_hash_low_bit() {
        let even = BlockIndexEntry::new(make_hash(2), 0, 0, None);
        let odd = BlockIndexEntry::new(make_hash(3), 0, 0, None);
        assert_eq!(even.stake_entropy_bit(), 0);
        assert_eq!(odd.stake_entropy_bit(), 1);
    }

    #[test]
    fn insert_links_forward() {
        let mut index = BlockIndex::new();
        let genesis = index.insert(BlockIndexEntry::new(make_hash(2), 0, 1000, None));
        let child = index.insert(BlockIndexEntry::new(make_hash(4), 1, 1060, Some(genesis)));
        assert_eq!(index.get(genesis).next, Some(child));
        assert_eq!(index.get(child).prev, Some(genesis));
        assert_eq!(index.get(child).next, None);
    }

    #[test]
    fn lookup_by_hash() {
        let mut index = BlockIndex::new();
        let id = index.insert(BlockIndexEntry::new(make_hash(2), 0, 1000, None));
        assert_eq!(index.lookup(&make_hash(2)), Some(id));
        assert_eq!(index.lookup(&make_hash(9)), None);
        assert!(index.contains(&make_hash(2)));
    }

    #[test]
    fn stake_modifier_flag_only_set_when_generated() {
        let mut entry = BlockIndexEntry::new(make_hash(2), 0, 0, None);
        entry.set_stake_modifier(42, false);
        assert!(!entry.generated_stake_modifier());
        assert_eq!(entry.stake_modifier, 42);
        entry.set_stake_modifier(43, true);
        assert!(entry.generated_stake_modifier());
    }

    #[test]
    fn proof_of_stake_marking() {
        let mut entry = BlockIndexEntry::new(make_hash(2), 5, 0, None);
        assert!(!entry.is_proof_of_stake());
        entry.set_proof_of_stake(make_hash(7));
        assert!(entry.is_proof_of_stake());
        assert_eq!(entry.hash_proof_of_stake, make_hash(7));
    }
}
