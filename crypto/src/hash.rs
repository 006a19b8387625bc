//! SHA-256d hashing.
//!
//! Every consensus hash in the protocol — block hashes, transaction ids,
//! kernel proofs, modifier checksums — is double SHA-256 over a canonical
//! little-endian serialization.

use onyx_types::Hash256;
use sha2::{Digest, Sha256};

/// Compute SHA-256d (double SHA-256) of arbitrary data.
pub fn sha256d(data: &[u8]) -> Hash256 {
    let first = Sha256::digest(data);
    let second = Sha256::digest(first);
    let mut output = [0u8; 32];
    output.copy_from_slice(&second);
    Hash256::new(output)
}

/// Hash multiple byte slices as one stream (avoids concatenation allocation).
pub fn sha256d_multi(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let first = hasher.finalize();
    let second = Sha256::digest(first);
    let mut output = [0u8; 32];
    output.copy_from_slice(&second);
    Hash256::new(output)
}
