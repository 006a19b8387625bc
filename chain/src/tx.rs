//! Block and transaction wire types.
//!
//! The minimal on-disk formats of the chain: enough to re-read a kernel
//! transaction from a block file and classify coinstakes. Script contents
//! are carried opaquely; script verification lives outside this workspace.

use crate::codec::{
    read_compact_size, read_var_bytes, write_compact_size, write_var_bytes, Decodable, Encodable,
};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use onyx_crypto::sha256d;
use onyx_types::{Amount, Hash256, OutPoint};
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// An 80-byte block header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block_hash: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    pub const SERIALIZED_SIZE: usize = 80;

    /// SHA-256d of the serialized header.
    pub fn hash(&self) -> Hash256 {
        sha256d(&self.encode_to_vec())
    }
}

impl Encodable for BlockHeader {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_i32::<LittleEndian>(self.version)?;
        self.prev_block_hash.consensus_encode(writer)?;
        self.merkle_root.consensus_encode(writer)?;
        writer.write_u32::<LittleEndian>(self.time)?;
        writer.write_u32::<LittleEndian>(self.bits)?;
        writer.write_u32::<LittleEndian>(self.nonce)?;
        Ok(Self::SERIALIZED_SIZE)
    }
}

impl Decodable for BlockHeader {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            version: reader.read_i32::<LittleEndian>()?,
            prev_block_hash: Hash256::consensus_decode(reader)?,
            merkle_root: Hash256::consensus_decode(reader)?,
            time: reader.read_u32::<LittleEndian>()?,
            bits: reader.read_u32::<LittleEndian>()?,
            nonce: reader.read_u32::<LittleEndian>()?,
        })
    }
}

/// A transaction input.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    pub prevout: OutPoint,
    pub script_sig: Vec<u8>,
    pub sequence: u32,
}

impl Encodable for TxIn {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut written = self.prevout.consensus_encode(writer)?;
        written += write_var_bytes(writer, &self.script_sig)?;
        writer.write_u32::<LittleEndian>(self.sequence)?;
        Ok(written + 4)
    }
}

impl Decodable for TxIn {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            prevout: OutPoint::consensus_decode(reader)?,
            script_sig: read_var_bytes(reader)?,
            sequence: reader.read_u32::<LittleEndian>()?,
        })
    }
}

/// A transaction output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    pub value: Amount,
    pub script_pubkey: Vec<u8>,
}

impl TxOut {
    /// Empty outputs mark the first slot of a coinstake.
    pub fn is_empty(&self) -> bool {
        self.value.is_zero() && self.script_pubkey.is_empty()
    }
}

impl Encodable for TxOut {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_i64::<LittleEndian>(self.value.raw())?;
        let written = write_var_bytes(writer, &self.script_pubkey)?;
        Ok(written + 8)
    }
}

impl Decodable for TxOut {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Self {
            value: Amount::new(reader.read_i64::<LittleEndian>()?),
            script_pubkey: read_var_bytes(reader)?,
        })
    }
}

/// A transaction. Transactions carry their own timestamp, separate from the
/// block time; the stake kernel hashes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: i32,
    pub time: u32,
    pub vin: Vec<TxIn>,
    pub vout: Vec<TxOut>,
    pub lock_time: u32,
}

impl Transaction {
    /// SHA-256d of the serialized transaction.
    pub fn txid(&self) -> Hash256 {
        sha256d(&self.encode_to_vec())
    }

    pub fn is_coinbase(&self) -> bool {
        self.vin.len() == 1 && self.vin[0].prevout.is_null()
    }

    /// A coinstake spends a real output and leaves its first output empty.
    pub fn is_coinstake(&self) -> bool {
        !self.vin.is_empty()
            && !self.vin[0].prevout.is_null()
            && self.vout.len() >= 2
            && self.vout[0].is_empty()
    }
}

impl Encodable for Transaction {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut written = 8;
        writer.write_i32::<LittleEndian>(self.version)?;
        writer.write_u32::<LittleEndian>(self.time)?;
        written += write_compact_size(writer, self.vin.len() as u64)?;
        for input in &self.vin {
            written += input.consensus_encode(writer)?;
        }
        written += write_compact_size(writer, self.vout.len() as u64)?;
        for output in &self.vout {
            written += output.consensus_encode(writer)?;
        }
        writer.write_u32::<LittleEndian>(self.lock_time)?;
        Ok(written + 4)
    }
}

impl Decodable for Transaction {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let version = reader.read_i32::<LittleEndian>()?;
        let time = reader.read_u32::<LittleEndian>()?;
        let vin_len = read_compact_size(reader)?;
        let mut vin = Vec::with_capacity(vin_len as usize);
        for _ in 0..vin_len {
            vin.push(TxIn::consensus_decode(reader)?);
        }
        let vout_len = read_compact_size(reader)?;
        let mut vout = Vec::with_capacity(vout_len as usize);
        for _ in 0..vout_len {
            vout.push(TxOut::consensus_decode(reader)?);
        }
        let lock_time = reader.read_u32::<LittleEndian>()?;
        Ok(Self {
            version,
            time,
            vin,
            vout,
            lock_time,
        })
    }
}

/// A full block: header, transactions, and the staker's block signature
/// (carried opaquely; verified outside this workspace).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
    pub vtx: Vec<Transaction>,
    pub signature: Vec<u8>,
}

impl Block {
    /// A proof-of-stake block's second transaction is its coinstake.
    pub fn is_proof_of_stake(&self) -> bool {
        self.vtx.len() > 1 && self.vtx[1].is_coinstake()
    }
}

impl Encodable for Block {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        let mut written = self.header.consensus_encode(writer)?;
        written += write_compact_size(writer, self.vtx.len() as u64)?;
        for tx in &self.vtx {
            written += tx.consensus_encode(writer)?;
        }
        written += write_var_bytes(writer, &self.signature)?;
        Ok(written)
    }
}

impl Decodable for Block {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let header = BlockHeader::consensus_decode(reader)?;
        let vtx_len = read_compact_size(reader)?;
        let mut vtx = Vec::with_capacity(vtx_len as usize);
        for _ in 0..vtx_len {
            vtx.push(Transaction::consensus_decode(reader)?);
        }
        let signature = read_var_bytes(reader)?;
        Ok(Self {
            header,
            vtx,
            signature,
        })
    }
}
