//! Supertrend crossover scorer — strictly ternary output.
//!
//! Reads the raw bands from `indicators::supertrend` on the two most recent
//! klines:
//! - `+50` when `close[t-1] < band_a[t-1]` and `close[t] > band_a[t]`
//! - `-50` when `close[t-1] > band_b[t-1]` and `close[t] < band_b[t]`
//! - `0` otherwise
//!
//! `band_a` is the lower-valued band and `band_b` the higher-valued one. This
//! is not the textbook Supertrend (no ratcheting, no direction state); the
//! rules above are reproduced exactly because downstream tiers depend on them.

use serde::{Deserialize, Serialize};

use crate::domain::MarketSnapshot;
use crate::indicators::SupertrendBands;

use super::{Scorer, ScorerId};

pub const BULLISH: f64 = 50.0;
pub const BEARISH: f64 = -50.0;

/// Supertrend parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupertrendParams {
    pub atr_period: usize,
    pub multiplier: f64,
}

impl Default for SupertrendParams {
    fn default() -> Self {
        Self {
            atr_period: 10,
            multiplier: 3.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SupertrendScorer {
    params: SupertrendParams,
}

impl SupertrendScorer {
    pub fn new(atr_period: usize, multiplier: f64) -> Self {
        assert!(atr_period >= 1, "Supertrend atr_period must be >= 1");
        Self {
            params: SupertrendParams {
                atr_period,
                multiplier,
            },
        }
    }

    pub fn from_params(params: SupertrendParams) -> Self {
        Self::new(params.atr_period, params.multiplier)
    }

    pub fn params(&self) -> SupertrendParams {
        self.params
    }

    /// Minimum number of klines for a non-trivial score.
    pub fn min_klines(&self) -> usize {
        self.params.atr_period + 2
    }
}

impl Default for SupertrendScorer {
    fn default() -> Self {
        Self::from_params(SupertrendParams::default())
    }
}

impl Scorer for SupertrendScorer {
    fn id(&self) -> ScorerId {
        ScorerId::Supertrend
    }

    fn score(&self, snapshot: &MarketSnapshot) -> f64 {
        let klines = &snapshot.klines;
        let n = klines.len();
        if n < self.min_klines() {
            return 0.0;
        }

        let bands = SupertrendBands::compute(klines, self.params.atr_period, self.params.multiplier);
        let (cur, prev) = (n - 1, n - 2);
        let close_cur = klines[cur].close;
        let close_prev = klines[prev].close;

        // NaN comparisons are false, so a NaN anywhere falls through to 0.
        if close_prev < bands.band_a[prev] && close_cur > bands.band_a[cur] {
            BULLISH
        } else if close_prev > bands.band_b[prev] && close_cur < bands.band_b[cur] {
            BEARISH
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_klines, test_kline};

    fn flat_then(last_two: [(f64, f64, f64, f64); 2], period: usize) -> MarketSnapshot {
        // `period` quiet klines around 100 with a 2-point range, then two custom ones.
        let mut klines: Vec<_> = (0..period)
            .map(|i| test_kline(i, 100.0, 101.0, 99.0, 100.0, 1000.0))
            .collect();
        for (j, (o, h, l, c)) in last_two.into_iter().enumerate() {
            klines.push(test_kline(period + j, o, h, l, c, 1000.0));
        }
        MarketSnapshot::new("BTC").with_klines(klines)
    }

    #[test]
    fn too_few_klines_scores_zero() {
        let scorer = SupertrendScorer::new(3, 1.0);
        let snap = MarketSnapshot::new("BTC").with_klines(make_klines(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(scorer.min_klines(), 5);
        assert_eq!(scorer.score(&snap), 0.0);
    }

    #[test]
    fn bullish_crossover_of_lower_band() {
        // Previous kline closes just below its own lower band, current closes above.
        let snap = flat_then(
            [(100.0, 101.0, 90.0, 90.0), (90.0, 101.0, 89.0, 101.0)],
            4,
        );
        assert_eq!(SupertrendScorer::new(3, 1.0).score(&snap), BULLISH);
    }

    #[test]
    fn bearish_crossover_of_upper_band() {
        let snap = flat_then(
            [(100.0, 110.0, 99.0, 110.0), (110.0, 111.0, 99.0, 99.0)],
            4,
        );
        assert_eq!(SupertrendScorer::new(3, 1.0).score(&snap), BEARISH);
    }

    #[test]
    fn quiet_market_scores_zero() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + (i % 2) as f64 * 0.1).collect();
        let snap = MarketSnapshot::new("BTC").with_klines(make_klines(&closes));
        assert_eq!(SupertrendScorer::default().score(&snap), 0.0);
    }

    #[test]
    fn default_params() {
        let p = SupertrendParams::default();
        assert_eq!(p.atr_period, 10);
        assert_eq!(p.multiplier, 3.0);
        assert_eq!(SupertrendScorer::default().min_klines(), 12);
    }
}
