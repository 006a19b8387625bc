//! In-memory UTXO view for testing.

use onyx_chain::{Coin, StoreError, UtxoView};
use onyx_types::OutPoint;
use std::collections::HashMap;

/// An in-memory UTXO set.
#[derive(Default)]
pub struct MemoryUtxoView {
    coins: HashMap<OutPoint, Coin>,
}

impl MemoryUtxoView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_coin(&mut self, outpoint: OutPoint, coin: Coin) {
        self.coins.insert(outpoint, coin);
    }

    pub fn remove_coin(&mut self, outpoint: &OutPoint) {
        self.coins.remove(outpoint);
    }
}

impl UtxoView for MemoryUtxoView {
    fn coin(&self, outpoint: &OutPoint) -> Result<Option<Coin>, StoreError> {
        Ok(self.coins.get(outpoint).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onyx_types::{Amount, Hash256};

    #[test]
    fn coin_roundtrip() {
        let mut view = MemoryUtxoView::new();
        let outpoint = OutPoint::new(Hash256::new([1u8; 32]), 0);
        let coin = Coin {
            value: Amount::from_coins(50),
            height: 7,
            script_pubkey: vec![0x51],
        };
        view.add_coin(outpoint, coin.clone());
        assert_eq!(view.coin(&outpoint).unwrap(), Some(coin));

        view.remove_coin(&outpoint);
        assert_eq!(view.coin(&outpoint).unwrap(), None);
    }
}
