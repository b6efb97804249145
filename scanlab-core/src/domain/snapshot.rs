//! Market snapshot — everything a scorer may look at for one symbol.

use serde::{Deserialize, Serialize};

use super::kline::Kline;
use super::orderbook::OrderBook;

/// Per-symbol market state for a single scan cycle.
///
/// Rebuilt every cycle by the data collector and borrowed by the pipeline;
/// nothing downstream retains it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    #[serde(default)]
    pub orderbook: Option<OrderBook>,
    /// Time-ordered, oldest first.
    #[serde(default)]
    pub klines: Vec<Kline>,
    #[serde(default)]
    pub correlation: Option<CorrelationMatrix>,
}

impl MarketSnapshot {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    pub fn with_orderbook(mut self, orderbook: OrderBook) -> Self {
        self.orderbook = Some(orderbook);
        self
    }

    pub fn with_klines(mut self, klines: Vec<Kline>) -> Self {
        self.klines = klines;
        self
    }

    pub fn with_correlation(mut self, correlation: CorrelationMatrix) -> Self {
        self.correlation = Some(correlation);
        self
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.klines.iter().map(|k| k.volume).collect()
    }

    /// Remove klines that fail [`Kline::is_sane`]. Returns how many were dropped.
    pub fn retain_sane_klines(&mut self) -> usize {
        let before = self.klines.len();
        self.klines.retain(Kline::is_sane);
        before - self.klines.len()
    }

    /// The two most recent klines as `(previous, current)`.
    pub fn last_two(&self) -> Option<(&Kline, &Kline)> {
        match self.klines.as_slice() {
            [.., prev, cur] => Some((prev, cur)),
            _ => None,
        }
    }
}

/// Square cross-symbol correlation matrix, rows and columns in `symbols` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub symbols: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn new(symbols: Vec<String>, values: Vec<Vec<f64>>) -> Self {
        Self { symbols, values }
    }

    fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    /// Correlation between two symbols, if both are present and the cell exists.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.index_of(a)?;
        let j = self.index_of(b)?;
        self.values.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Largest absolute correlation between `symbol` and any other symbol in `peers`.
    ///
    /// NaN cells and the diagonal are ignored. Returns `None` when no peer has a
    /// usable cell.
    pub fn max_abs_correlation<'a>(
        &self,
        symbol: &str,
        peers: impl IntoIterator<Item = &'a str>,
    ) -> Option<f64> {
        peers
            .into_iter()
            .filter(|peer| *peer != symbol)
            .filter_map(|peer| self.get(symbol, peer))
            .filter(|c| !c.is_nan())
            .map(f64::abs)
            .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |m| m.max(c))))
    }
}
