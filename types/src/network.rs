//! Network identifier.

use serde::{Deserialize, Serialize};

/// Identifies which Onyx network a node is validating against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// The production network.
    Main,
    /// The public test network.
    Test,
}

impl Network {
    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
        }
    }
}
