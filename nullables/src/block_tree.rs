//! In-memory block files and transaction index for testing.

use onyx_chain::codec::write_compact_size;
use onyx_chain::{Block, BlockTreeDb, DiskTxPos, Encodable, StoreError};
use onyx_types::Hash256;
use std::collections::HashMap;
use std::io::Read;

/// An in-memory block tree: one "file" per added block, with a transaction
/// index recording where each transaction landed.
#[derive(Default)]
pub struct MemoryBlockTree {
    files: Vec<Vec<u8>>,
    tx_index: HashMap<Hash256, DiskTxPos>,
}

impl MemoryBlockTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize a block into a fresh file and index its transactions.
    pub fn add_block(&mut self, block: &Block) {
        let file = self.files.len() as u32;

        // transaction offsets count from the end of the header, so the
        // first transaction sits just past the count varint
        let mut count_prefix = Vec::new();
        write_compact_size(&mut count_prefix, block.vtx.len() as u64)
            .expect("writing to a Vec cannot fail");
        let mut tx_offset = count_prefix.len() as u32;
        for tx in &block.vtx {
            self.tx_index.insert(
                tx.txid(),
                DiskTxPos {
                    file,
                    block_offset: 0,
                    tx_offset,
                },
            );
            tx_offset += tx.encode_to_vec().len() as u32;
        }

        self.files.push(block.encode_to_vec());
    }
}

impl BlockTreeDb for MemoryBlockTree {
    fn read_tx_index(&self, txid: &Hash256) -> Result<Option<DiskTxPos>, StoreError> {
        Ok(self.tx_index.get(txid).copied())
    }

    fn open_block_file(&self, pos: &DiskTxPos) -> Result<Box<dyn Read + '_>, StoreError> {
        let file = self
            .files
            .get(pos.file as usize)
            .ok_or_else(|| StoreError::NotFound(format!("block file {}", pos.file)))?;
        if pos.block_offset as usize > file.len() {
            return Err(StoreError::Corruption(format!(
                "block offset {} past end of file {}",
                pos.block_offset, pos.file
            )));
        }
        Ok(Box::new(&file[pos.block_offset as usize..]))
    }
}
