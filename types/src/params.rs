//! Consensus parameters.
//!
//! The stake tunables were process-wide mutables in ancestral clients; here
//! they are a value threaded into every consensus entry point. The
//! constructors bake in the live-chain values. Changing any of them on an
//! existing network forks consensus.

use crate::Network;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hard checkpoints of the stake-modifier checksum chain (mainnet).
///
/// Frozen history: a mismatch at any of these heights means the local chain
/// has diverged from the canonical one.
const MAINNET_MODIFIER_CHECKPOINTS: &[(u32, u32)] = &[
    (0, 0xfd11_f4e7),
    (1_000, 0x3536_53fe),
    (10_000, 0x8c34_1084),
    (50_008, 0x9f00_53f2),
    (100_000, 0xaf21_2909),
    (150_006, 0x3883_af95),
    (200_830, 0xf2da_ec0a),
    (250_008, 0x76bd_1777),
    (300_836, 0x18db_ac5e),
    (350_003, 0x1722_3fa8),
    (400_002, 0xd166_2b8f),
    (450_000, 0x0fc0_c8d3),
    (500_001, 0x17ac_1811),
    (550_004, 0xcfb3_340f),
    (600_014, 0x74d7_cf8c),
    (621_306, 0x4890_a081),
];

/// Hard checkpoints of the stake-modifier checksum chain (testnet).
const TESTNET_MODIFIER_CHECKPOINTS: &[(u32, u32)] = &[(0, 0xfd11_f4e7)];

/// All parameters consumed by the proof-of-stake kernel.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Minimum age before an output may stake (seconds).
    pub stake_min_age: i64,

    /// Age at which stake weight saturates (seconds).
    pub stake_max_age: i64,

    /// Cadence on which new stake modifiers are generated (seconds).
    pub modifier_interval: i64,

    /// Shape of the 64-section selection-interval curve.
    pub modifier_interval_ratio: i64,

    /// Confirmations required before a coinstake input may be spent.
    pub coinbase_maturity: u32,

    /// Target spacing between blocks (seconds). Sizes the modifier
    /// candidate buffer; does not participate in any hash.
    pub pos_target_spacing: i64,

    /// Hard checkpoints of the stake-modifier checksum chain.
    pub modifier_checkpoints: BTreeMap<u32, u32>,
}

impl ConsensusParams {
    pub fn mainnet() -> Self {
        Self {
            stake_min_age: 60 * 60 * 24,      // 1 day
            stake_max_age: 60 * 60 * 24 * 30, // 30 days
            modifier_interval: 8 * 60,
            modifier_interval_ratio: 3,
            coinbase_maturity: 500,
            pos_target_spacing: 4 * 60,
            modifier_checkpoints: MAINNET_MODIFIER_CHECKPOINTS.iter().copied().collect(),
        }
    }

    pub fn testnet() -> Self {
        Self {
            coinbase_maturity: 10,
            modifier_checkpoints: TESTNET_MODIFIER_CHECKPOINTS.iter().copied().collect(),
            ..Self::mainnet()
        }
    }

    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Main => Self::mainnet(),
            Network::Test => Self::testnet(),
        }
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_checkpoint_table_is_frozen() {
        let params = ConsensusParams::mainnet();
        assert_eq!(params.modifier_checkpoints.len(), 16);
        assert_eq!(params.modifier_checkpoints.get(&0), Some(&0xfd11_f4e7));
        assert_eq!(params.modifier_checkpoints.get(&621_306), Some(&0x4890_a081));
    }

    #[test]
    fn testnet_differs_only_where_it_should() {
        let main = ConsensusParams::mainnet();
        let test = ConsensusParams::testnet();
        assert_eq!(test.stake_min_age, main.stake_min_age);
        assert_eq!(test.modifier_interval, main.modifier_interval);
        assert_eq!(test.coinbase_maturity, 10);
        assert_eq!(test.modifier_checkpoints.len(), 1);
    }

    #[test]
    fn network_selects_the_matching_table() {
        let main = ConsensusParams::for_network(Network::Main);
        let test = ConsensusParams::for_network(Network::Test);
        assert_eq!(main.modifier_checkpoints.len(), 16);
        assert_eq!(test.modifier_checkpoints.len(), 1);
        assert_eq!(Network::Main.as_str(), "main");
        assert_eq!(Network::Test.as_str(), "test");
    }
}
