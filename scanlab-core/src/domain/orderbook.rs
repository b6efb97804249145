//! Orderbook — best-first price levels on each side of the book.

use serde::{Deserialize, Serialize};

/// A single price level. Serialized as a `[price, quantity]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Level(pub f64, pub f64);

impl Level {
    pub fn price(&self) -> f64 {
        self.0
    }

    pub fn quantity(&self) -> f64 {
        self.1
    }
}

/// Orderbook snapshot.
///
/// Bids are ordered best-first (descending price), asks best-first
/// (ascending price). Ordering is the producer's responsibility; nothing here
/// re-sorts levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    #[serde(default)]
    pub bids: Vec<Level>,
    #[serde(default)]
    pub asks: Vec<Level>,
}

impl OrderBook {
    pub fn new(bids: Vec<Level>, asks: Vec<Level>) -> Self {
        Self { bids, asks }
    }

    /// Build from `(price, quantity)` tuples.
    pub fn from_pairs(bids: &[(f64, f64)], asks: &[(f64, f64)]) -> Self {
        Self {
            bids: bids.iter().map(|&(p, q)| Level(p, q)).collect(),
            asks: asks.iter().map(|&(p, q)| Level(p, q)).collect(),
        }
    }

    /// Total bid quantity over the best `levels` levels.
    pub fn bid_depth(&self, levels: usize) -> f64 {
        self.bids.iter().take(levels).map(Level::quantity).sum()
    }

    /// Total ask quantity over the best `levels` levels.
    pub fn ask_depth(&self, levels: usize) -> f64 {
        self.asks.iter().take(levels).map(Level::quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_takes_top_levels_only() {
        let book = OrderBook::from_pairs(
            &[(100.0, 1.0), (99.0, 2.0), (98.0, 3.0), (97.0, 4.0), (96.0, 5.0), (95.0, 6.0)],
            &[(101.0, 1.0)],
        );
        assert_eq!(book.bid_depth(5), 15.0);
        assert_eq!(book.ask_depth(5), 1.0);
    }

    #[test]
    fn depth_of_short_side() {
        let book = OrderBook::from_pairs(&[(100.0, 2.0)], &[]);
        assert_eq!(book.bid_depth(5), 2.0);
        assert_eq!(book.ask_depth(5), 0.0);
        assert!(!book.is_empty());
    }

    #[test]
    fn level_serializes_as_pair() {
        let json = serde_json::to_string(&Level(101.5, 3.0)).unwrap();
        assert_eq!(json, "[101.5,3.0]");
        let back: Level = serde_json::from_str("[99, 2]").unwrap();
        assert_eq!(back, Level(99.0, 2.0));
    }
}
