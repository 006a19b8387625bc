//! Proof-of-stake kernel for the Onyx protocol.
//!
//! Decides whether a candidate block's coinstake satisfies the stake-based
//! block-production rule, and derives the per-block stake modifier that
//! scrambles future stake eligibility. Every hash, ordering, tie-break and
//! truncation here is consensus-critical: a one-bit divergence forks the
//! network.
//!
//! The kernel is pure computation over a borrowed, read-only chain view —
//! no locks, no I/O of its own, no async. Hosts supply the block index, the
//! transaction index with its block files, the UTXO view, and a clock.

pub mod checksum;
pub mod error;
pub mod kernel;
pub mod modifier;
pub mod weight;

pub use checksum::{check_stake_modifier_checkpoint, stake_modifier_checksum};
pub use error::KernelError;
pub use kernel::{
    check_coinstake_timestamp, check_proof_of_stake, check_stake_kernel_hash,
    get_kernel_stake_modifier, StakeKernelProof,
};
pub use modifier::{
    compute_next_stake_modifier, connect_stake_modifier, selection_interval, StakeModifier,
};
pub use weight::time_weight;
