//! Narrow collaborator traits.
//!
//! The kernel reads the surrounding node through these and nothing else:
//! the transaction index with its block files, the UTXO view, and a clock.
//! Every backend (the node's database, the in-memory doubles in
//! `onyx_nullables`) implements these traits.

use crate::error::StoreError;
use onyx_types::{Amount, Hash256, OutPoint};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

/// On-disk position of a transaction inside a block file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskTxPos {
    pub file: u32,
    /// Offset of the block record (its header) within the file.
    pub block_offset: u64,
    /// Offset of the transaction, counted from the end of the header.
    pub tx_offset: u32,
}

/// An unspent output as seen by the UTXO view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub value: Amount,
    /// Height of the block that created the output.
    pub height: u32,
    pub script_pubkey: Vec<u8>,
}

/// Read access to the node's transaction index and block files.
pub trait BlockTreeDb {
    /// Locate a transaction on disk by id.
    fn read_tx_index(&self, txid: &Hash256) -> Result<Option<DiskTxPos>, StoreError>;

    /// Open the block file at `pos`, positioned at the start of the block
    /// record (the header).
    fn open_block_file(&self, pos: &DiskTxPos) -> Result<Box<dyn Read + '_>, StoreError>;
}

/// Read access to the UTXO set.
pub trait UtxoView {
    fn coin(&self, outpoint: &OutPoint) -> Result<Option<Coin>, StoreError>;
}

/// Wall-clock seconds, abstracted so consensus checks stay deterministic
/// under test.
pub trait Clock {
    fn now(&self) -> i64;
}

/// The system clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs() as i64
    }
}
