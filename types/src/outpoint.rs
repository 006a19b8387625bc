//! Transaction output reference.

use crate::Hash256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A reference to a specific output of a prior transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub txid: Hash256,
    pub n: u32,
}

impl OutPoint {
    pub fn new(txid: Hash256, n: u32) -> Self {
        Self { txid, n }
    }

    /// The null outpoint marks coinbase inputs.
    pub fn null() -> Self {
        Self {
            txid: Hash256::ZERO,
            n: u32::MAX,
        }
    }

    pub fn is_null(&self) -> bool {
        self.txid.is_zero() && self.n == u32::MAX
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.n)
    }
}
