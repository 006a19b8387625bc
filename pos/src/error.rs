use onyx_chain::StoreError;
use onyx_types::{Hash256, OutPoint};
use thiserror::Error;

/// Outcome of a failed kernel operation.
///
/// Variants fall into the three classes of the consensus contract:
/// rejections (the block is invalid and its relayer is misbehaving),
/// transient conditions (the local chain has not caught up; retry later),
/// and logic-bug indicators (the chain store handed us an impossible view).
/// [`KernelError::dos_score`] maps a variant to the misbehavior score the
/// host charges the peer.
#[derive(Debug, Error)]
pub enum KernelError {
    // ── Consensus rejections ─────────────────────────────────────────────
    #[error("block's second transaction is not a coinstake")]
    NotCoinstake,

    #[error("coinstake timestamp {time_tx} is earlier than its kernel input's timestamp {time_prev}")]
    TimestampViolation { time_tx: u32, time_prev: u32 },

    #[error("kernel input from block at time {time_block} has not reached minimum stake age by {time_tx}")]
    MinAgeViolation { time_block: u32, time_tx: u32 },

    #[error("kernel hash {hash_proof} exceeds target {target}")]
    HashAboveTarget {
        hash_proof: Hash256,
        target: Hash256,
    },

    #[error("no transaction index entry for kernel input {0}")]
    TxIndexMissing(Hash256),

    #[error("stake prevout {0} does not exist in the UTXO view")]
    MissingCoin(OutPoint),

    #[error("stake prevout has {confirmations} of {required} required confirmations")]
    ImmatureStake { confirmations: i64, required: u32 },

    #[error("source block {0} is not in the block index")]
    UnknownSourceBlock(Hash256),

    #[error("stake modifier checksum {checksum:#010x} does not match checkpoint at height {height}")]
    CheckpointMismatch { height: u32, checksum: u32 },

    #[error("corrupt block data: {0}")]
    CorruptBlockData(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    // ── Transient ────────────────────────────────────────────────────────
    #[error("stake modifier is not yet available for the kernel input")]
    ModifierUnavailable,

    #[error("reached best block {hash} at height {height} before the selection interval elapsed")]
    ChainBehind { hash: Hash256, height: u32 },

    // ── Logic-bug indicators ─────────────────────────────────────────────
    #[error("no generated stake modifier found back to genesis")]
    NoGeneratedModifier,

    #[error("modifier candidate block {0} is not in the block index")]
    CandidateNotIndexed(Hash256),

    #[error("no candidate block selectable in a modifier round")]
    NoSelectableCandidate,
}

impl KernelError {
    /// Misbehavior score to charge the peer that relayed the offending
    /// block. Transient conditions and local logic bugs score zero.
    pub fn dos_score(&self) -> u32 {
        match self {
            Self::NotCoinstake
            | Self::TimestampViolation { .. }
            | Self::MinAgeViolation { .. }
            | Self::HashAboveTarget { .. }
            | Self::TxIndexMissing(_)
            | Self::MissingCoin(_)
            | Self::ImmatureStake { .. }
            | Self::UnknownSourceBlock(_)
            | Self::CheckpointMismatch { .. }
            | Self::CorruptBlockData(_)
            | Self::Store(_) => 100,
            Self::ModifierUnavailable
            | Self::ChainBehind { .. }
            | Self::NoGeneratedModifier
            | Self::CandidateNotIndexed(_)
            | Self::NoSelectableCandidate => 0,
        }
    }

    /// Whether the caller should simply retry after the chain advances.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ModifierUnavailable | Self::ChainBehind { .. })
    }
}
