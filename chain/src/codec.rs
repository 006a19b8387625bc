//! Canonical consensus serialization.
//!
//! Integers are little-endian fixed width; hashes are 32 raw bytes in wire
//! order; collections are length-prefixed with the compact-size varint.
//! The encoding is consensus-binding: the kernel hashes these exact bytes.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use onyx_types::{Hash256, OutPoint};
use std::io::{self, Read, Write};

/// Largest collection length the decoder will accept.
const MAX_SIZE: u64 = 0x0200_0000;

/// Serialize into the canonical consensus encoding.
pub trait Encodable {
    /// Write the encoding to `writer`, returning the number of bytes written.
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize>;

    /// Encode into a fresh buffer.
    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.consensus_encode(&mut buf)
            .expect("writing to a Vec cannot fail");
        buf
    }
}

/// Deserialize from the canonical consensus encoding.
pub trait Decodable: Sized {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self>;
}

/// Write a compact-size varint.
pub fn write_compact_size<W: Write>(writer: &mut W, n: u64) -> io::Result<usize> {
    if n < 0xfd {
        writer.write_u8(n as u8)?;
        Ok(1)
    } else if n <= 0xffff {
        writer.write_u8(0xfd)?;
        writer.write_u16::<LittleEndian>(n as u16)?;
        Ok(3)
    } else if n <= 0xffff_ffff {
        writer.write_u8(0xfe)?;
        writer.write_u32::<LittleEndian>(n as u32)?;
        Ok(5)
    } else {
        writer.write_u8(0xff)?;
        writer.write_u64::<LittleEndian>(n)?;
        Ok(9)
    }
}

/// Read a compact-size varint, rejecting lengths past [`MAX_SIZE`].
pub fn read_compact_size<R: Read>(reader: &mut R) -> io::Result<u64> {
    let n = match reader.read_u8()? {
        0xff => reader.read_u64::<LittleEndian>()?,
        0xfe => u64::from(reader.read_u32::<LittleEndian>()?),
        0xfd => u64::from(reader.read_u16::<LittleEndian>()?),
        n => u64::from(n),
    };
    if n > MAX_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("compact size {n} exceeds maximum"),
        ));
    }
    Ok(n)
}

/// Write a length-prefixed byte string.
pub fn write_var_bytes<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<usize> {
    let mut written = write_compact_size(writer, bytes.len() as u64)?;
    writer.write_all(bytes)?;
    written += bytes.len();
    Ok(written)
}

/// Read a length-prefixed byte string.
pub fn read_var_bytes<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let len = read_compact_size(reader)? as usize;
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    Ok(bytes)
}

impl Encodable for Hash256 {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        writer.write_all(self.as_bytes())?;
        Ok(32)
    }
}

impl Decodable for Hash256 {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut bytes = [0u8; 32];
        reader.read_exact(&mut bytes)?;
        Ok(Hash256::new(bytes))
    }
}

impl Encodable for OutPoint {
    fn consensus_encode<W: Write>(&self, writer: &mut W) -> io::Result<usize> {
        self.txid.consensus_encode(writer)?;
        writer.write_u32::<LittleEndian>(self.n)?;
        Ok(36)
    }
}

impl Decodable for OutPoint {
    fn consensus_decode<R: Read>(reader: &mut R) -> io::Result<Self> {
        let txid = Hash256::consensus_decode(reader)?;
        let n = reader.read_u32::<LittleEndian>()?;
        Ok(OutPoint { txid, n })
    }
}
