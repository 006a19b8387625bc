//! 256-bit consensus arithmetic.
//!
//! Targets and hash magnitudes are 256-bit unsigned integers. A serialized
//! hash becomes a magnitude by reading its wire bytes little-endian, and a
//! magnitude becomes a hash by writing them back the same way. Compact
//! difficulty uses the Bitcoin mantissa/exponent encoding.

use crate::Hash256;
use primitive_types::U256;

/// Interpret a hash's wire bytes as a 256-bit magnitude.
pub fn hash_to_u256(hash: &Hash256) -> U256 {
    U256::from_little_endian(hash.as_bytes())
}

/// Serialize a 256-bit magnitude back into hash wire order.
pub fn u256_to_hash(value: &U256) -> Hash256 {
    let mut bytes = [0u8; 32];
    value.to_little_endian(&mut bytes);
    Hash256::new(bytes)
}

/// Expand a compact difficulty encoding into a 256-bit target.
///
/// The compact form packs an exponent byte and a 23-bit mantissa:
/// `target = mantissa * 256^(exponent - 3)`. Bit 0x0080_0000 is a sign flag
/// and never contributes to the magnitude. Oversized exponents shift every
/// bit out and decode as zero, never an error.
pub fn compact_to_u256(compact: u32) -> U256 {
    let size = compact >> 24;
    let word = compact & 0x007f_ffff;
    if size <= 3 {
        U256::from(word >> (8 * (3 - size)))
    } else {
        U256::from(word) << (8 * (size - 3) as usize)
    }
}

/// Compress a 256-bit target into its canonical compact encoding.
///
/// Inverse of [`compact_to_u256`] for every canonical encoding; targets with
/// more than 23 significant mantissa bits lose precision.
pub fn u256_to_compact(target: &U256) -> u32 {
    let mut size = (target.bits() as u32 + 7) / 8;
    let mut compact = if size <= 3 {
        (target.low_u64() << (8 * (3 - size))) as u32
    } else {
        (*target >> (8 * (size - 3) as usize)).low_u64() as u32
    };
    // a mantissa with its high bit set would read back as negative
    if compact & 0x0080_0000 != 0 {
        compact >>= 8;
        size += 1;
    }
    compact | (size << 24)
}
