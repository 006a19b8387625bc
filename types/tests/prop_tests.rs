use proptest::prelude::*;

use onyx_types::arith::{compact_to_u256, hash_to_u256, u256_to_compact, u256_to_hash};
use onyx_types::{Amount, Hash256, OutPoint};

proptest! {
    /// Hash256 roundtrip: new -> as_bytes -> new produces identical bytes.
    #[test]
    fn hash_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        prop_assert_eq!(hash.as_bytes(), &bytes);
    }

    /// Hash256::is_zero is true only for all-zero bytes.
    #[test]
    fn hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// The low bit tracks bit 0 of the first wire byte.
    #[test]
    fn hash_low_bit_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        prop_assert_eq!(hash.low_bit(), bytes[0] & 1);
    }

    /// Magnitude conversion roundtrips through wire order.
    #[test]
    fn hash_magnitude_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        prop_assert_eq!(u256_to_hash(&hash_to_u256(&hash)), hash);
    }

    /// Hash256 bincode serialization roundtrip.
    #[test]
    fn hash_bincode_roundtrip(bytes in prop::array::uniform32(0u8..)) {
        let hash = Hash256::new(bytes);
        let encoded = bincode::serialize(&hash).unwrap();
        let decoded: Hash256 = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, hash);
    }

    /// Compact encoding is a left inverse of expansion: re-encoding an
    /// expanded target reproduces the compact form for canonical encodings.
    #[test]
    fn compact_encode_decode_identity(mantissa in 0x0001u32..0x007f_ffff, exponent in 1u32..32) {
        let compact = mantissa | (exponent << 24);
        // canonicalize: decode once, re-encode
        let canonical = u256_to_compact(&compact_to_u256(compact));
        prop_assert_eq!(u256_to_compact(&compact_to_u256(canonical)), canonical);
    }

    /// Amount checked_add matches plain addition when no overflow.
    #[test]
    fn amount_checked_add(a in 0i64..i64::MAX / 2, b in 0i64..i64::MAX / 2) {
        let sum = Amount::new(a).checked_add(Amount::new(b));
        prop_assert_eq!(sum, Some(Amount::new(a + b)));
    }

    /// Amount checked_sub returns None exactly on underflow of the raw type.
    #[test]
    fn amount_checked_sub(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let result = Amount::new(a).checked_sub(Amount::new(b));
        prop_assert_eq!(result, Some(Amount::new(a - b)));
    }

    /// The null outpoint is the only null outpoint.
    #[test]
    fn outpoint_null_unique(bytes in prop::array::uniform32(0u8..), n in 0u32..u32::MAX) {
        let outpoint = OutPoint::new(Hash256::new(bytes), n);
        prop_assert_eq!(outpoint.is_null(), bytes == [0u8; 32] && n == u32::MAX);
        prop_assert!(OutPoint::null().is_null());
    }
}
