//! Kernel-hash checker and coinstake validation.
//!
//! A coinstake must satisfy
//! `H(modifier ‖ time_block_from ‖ tx_offset ‖ time_tx_prev ‖ vout_n ‖ time_tx)
//!  ≤ target_per_coin_day · coin_day_weight`, making the chance of staking
//! proportional to the coin age consumed. The modifier scrambles the
//! computation so future proofs cannot be precomputed when the coin
//! confirms; the time and offset fields spread out the moments at which
//! competing nodes can produce a valid kernel. Block and transaction hashes
//! are deliberately excluded — they can be ground out in vast quantities,
//! degrading the system back into proof-of-work.

use crate::error::KernelError;
use crate::modifier::selection_interval;
use crate::weight::time_weight;
use onyx_chain::{
    Block, BlockHeader, BlockId, BlockIndex, BlockTreeDb, Clock, Decodable, Transaction, UtxoView,
};
use onyx_crypto::sha256d_multi;
use onyx_types::arith::{compact_to_u256, hash_to_u256, u256_to_hash};
use onyx_types::amount::COIN;
use onyx_types::{ConsensusParams, Hash256, OutPoint};
use primitive_types::U256;
use std::io::{self, Read};

/// Seconds per day in the coin-day weight formula.
const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A kernel check that met the target.
#[derive(Clone, Copy, Debug)]
pub struct StakeKernelProof {
    pub hash_proof: Hash256,
    pub target: Hash256,
    /// Modifier used, with the height and time of its generation block.
    pub modifier: u64,
    pub modifier_height: u32,
    pub modifier_time: i64,
}

/// The stake modifier for hashing a kernel: the one generated about a
/// selection interval after the block holding the coin, so it was unknown
/// when the coin was created.
pub fn get_kernel_stake_modifier(
    params: &ConsensusParams,
    index: &BlockIndex,
    block_from: BlockId,
    clock: &dyn Clock,
) -> Result<(u64, u32, i64), KernelError> {
    let from_time = index.get(block_from).time;
    let interval = selection_interval(params);

    let mut modifier = 0u64;
    let mut modifier_height = index.get(block_from).height;
    let mut modifier_time = from_time;
    let mut cursor = block_from;
    while modifier_time < from_time + interval {
        let entry = index.get(cursor);
        cursor = match entry.next {
            Some(next) => next,
            None => {
                // reached the best block before the interval elapsed
                return if from_time + params.stake_min_age - interval > clock.now() {
                    // the local chain is simply behind; worth retrying
                    Err(KernelError::ChainBehind {
                        hash: entry.block_hash,
                        height: entry.height,
                    })
                } else {
                    Err(KernelError::ModifierUnavailable)
                };
            }
        };
        let entry = index.get(cursor);
        if entry.generated_stake_modifier() {
            modifier = entry.stake_modifier;
            modifier_height = entry.height;
            modifier_time = entry.time;
        }
    }
    Ok((modifier, modifier_height, modifier_time))
}

/// Check a candidate kernel against the stake target.
///
/// `tx_prev_offset` is the offset of the kernel transaction from the start
/// of its block record, header included.
#[allow(clippy::too_many_arguments)]
pub fn check_stake_kernel_hash(
    params: &ConsensusParams,
    index: &BlockIndex,
    clock: &dyn Clock,
    bits: u32,
    block_from: BlockId,
    tx_prev: &Transaction,
    tx_prev_offset: u32,
    prevout: &OutPoint,
    time_tx: u32,
) -> Result<StakeKernelProof, KernelError> {
    if time_tx < tx_prev.time {
        return Err(KernelError::TimestampViolation {
            time_tx,
            time_prev: tx_prev.time,
        });
    }
    let time_block_from = index.get(block_from).time as u32;
    if i64::from(time_block_from) + params.stake_min_age > i64::from(time_tx) {
        return Err(KernelError::MinAgeViolation {
            time_block: time_block_from,
            time_tx,
        });
    }

    let target_per_coin_day = compact_to_u256(bits);
    let value_prev = tx_prev
        .vout
        .get(prevout.n as usize)
        .ok_or(KernelError::MissingCoin(*prevout))?
        .value;

    let weight = time_weight(params, i64::from(tx_prev.time), i64::from(time_tx));
    let coin_day_weight = U256::from(value_prev.raw() as u64) * U256::from(weight as u64)
        / U256::from(COIN as u64)
        / U256::from(SECONDS_PER_DAY as u64);
    // the target product wraps modulo 2^256
    let (target, _) = coin_day_weight.overflowing_mul(target_per_coin_day);

    let (modifier, modifier_height, modifier_time) =
        get_kernel_stake_modifier(params, index, block_from, clock)?;

    let hash_proof = sha256d_multi(&[
        &modifier.to_le_bytes(),
        &time_block_from.to_le_bytes(),
        &tx_prev_offset.to_le_bytes(),
        &tx_prev.time.to_le_bytes(),
        &prevout.n.to_le_bytes(),
        &time_tx.to_le_bytes(),
    ]);
    tracing::debug!(
        modifier,
        modifier_height,
        time_block_from,
        tx_prev_offset,
        prevout_n = prevout.n,
        time_tx,
        "checking stake kernel"
    );

    if hash_to_u256(&hash_proof) > target {
        return Err(KernelError::HashAboveTarget {
            hash_proof,
            target: u256_to_hash(&target),
        });
    }
    Ok(StakeKernelProof {
        hash_proof,
        target: u256_to_hash(&target),
        modifier,
        modifier_height,
        modifier_time,
    })
}

/// Validate the coinstake of a proof-of-stake block against the chain.
///
/// Re-reads the kernel transaction from the block files, resolves its source
/// block, enforces maturity against the UTXO view, and delegates to
/// [`check_stake_kernel_hash`].
pub fn check_proof_of_stake(
    params: &ConsensusParams,
    index: &BlockIndex,
    prev_tip: BlockId,
    block: &Block,
    tx_db: &dyn BlockTreeDb,
    utxo: &dyn UtxoView,
    clock: &dyn Clock,
) -> Result<StakeKernelProof, KernelError> {
    let tx = block.vtx.get(1).ok_or(KernelError::NotCoinstake)?;
    if !tx.is_coinstake() {
        return Err(KernelError::NotCoinstake);
    }
    let txin = &tx.vin[0];

    // locate and re-read the kernel transaction from the block files
    let pos = tx_db
        .read_tx_index(&txin.prevout.txid)?
        .ok_or(KernelError::TxIndexMissing(txin.prevout.txid))?;
    let mut file = tx_db.open_block_file(&pos)?;
    let header_prev = BlockHeader::consensus_decode(&mut file)
        .map_err(|e| KernelError::CorruptBlockData(e.to_string()))?;
    skip_bytes(&mut file, u64::from(pos.tx_offset))
        .map_err(|e| KernelError::CorruptBlockData(e.to_string()))?;
    let tx_prev = Transaction::consensus_decode(&mut file)
        .map_err(|e| KernelError::CorruptBlockData(e.to_string()))?;
    // the stored offset counts from the end of the header
    let tx_prev_offset = pos.tx_offset + BlockHeader::SERIALIZED_SIZE as u32;

    let block_from = index
        .lookup(&header_prev.hash())
        .ok_or_else(|| KernelError::UnknownSourceBlock(header_prev.hash()))?;

    let coin = utxo
        .coin(&txin.prevout)?
        .ok_or(KernelError::MissingCoin(txin.prevout))?;
    let confirmations = i64::from(index.get(prev_tip).height) + 1 - i64::from(coin.height);
    if confirmations < i64::from(params.coinbase_maturity) {
        return Err(KernelError::ImmatureStake {
            confirmations,
            required: params.coinbase_maturity,
        });
    }

    check_stake_kernel_hash(
        params,
        index,
        clock,
        block.header.bits,
        block_from,
        &tx_prev,
        tx_prev_offset,
        &txin.prevout,
        tx.time,
    )
}

/// Coinstake timestamp rule (v0.3 protocol): the transaction timestamp must
/// equal the block timestamp.
pub fn check_coinstake_timestamp(time_block: i64, time_tx: i64) -> bool {
    time_block == time_tx
}

fn skip_bytes<R: Read>(reader: &mut R, count: u64) -> io::Result<()> {
    let copied = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
    if copied < count {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "block file ends inside transaction offset",
        ));
    }
    Ok(())
}
