//! Venue-qualified trading pair identifiers.

use serde::{Deserialize, Serialize};

/// Default quote currency.
pub const DEFAULT_QUOTE: &str = "USDT";

/// How a venue spells a trading pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairStyle {
    /// Linear perpetual swap: `BTC/USDT:USDT`.
    #[default]
    PerpetualSwap,
    /// Spot-style concatenation: `BTCUSDT`.
    FlatPair,
}

impl PairStyle {
    /// Derive the pair identifier for a bare base symbol.
    ///
    /// The base is trimmed and upper-cased; no other normalisation is done.
    pub fn derive(&self, symbol: &str, quote: &str) -> String {
        let base = symbol.trim().to_uppercase();
        let quote = quote.trim().to_uppercase();
        match self {
            Self::PerpetualSwap => format!("{base}/{quote}:{quote}"),
            Self::FlatPair => format!("{base}{quote}"),
        }
    }
}
