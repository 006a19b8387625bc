//! 256-bit hash type in consensus wire order.
//!
//! A hash is stored as its 32 raw digest bytes. Whenever a hash is treated
//! as a number — target comparisons, checksum extraction — the bytes are
//! read as a little-endian magnitude, so the last wire byte is the most
//! significant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte hash (block hash, transaction id, or kernel proof).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hash256([u8; 32]);

impl Default for Hash256 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Hash256 {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The low bit of the hash as a little-endian integer (bit 0 of the
    /// first wire byte). Source of a block's stake entropy bit.
    pub fn low_bit(&self) -> u8 {
        self.0[0] & 1
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256(")?;
        for b in &self.0[..4] {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "\u{2026})")
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}
