//! Chain-view types for the Onyx protocol.
//!
//! The block index arena, the canonical consensus codec, the block and
//! transaction wire types, and the narrow traits through which consensus
//! code reads the surrounding node: transaction index, UTXO view, clock.

pub mod block_index;
pub mod codec;
pub mod error;
pub mod store;
pub mod tx;

pub use block_index::{BlockId, BlockIndex, BlockIndexEntry};
pub use codec::{Decodable, Encodable};
pub use error::StoreError;
pub use store::{BlockTreeDb, Clock, Coin, DiskTxPos, SystemClock, UtxoView};
pub use tx::{Block, BlockHeader, Transaction, TxIn, TxOut};
