//! Supertrend bands — `hl2 ± multiplier × ATR`, unadjusted.
//!
//! These are the raw basic bands. There is no band ratcheting and no direction
//! state: the crossover scorer reads them as-is.
//!
//! Naming: `band_a` is the lower-valued band (`hl2 - m·ATR`) and `band_b` the
//! higher-valued one (`hl2 + m·ATR`). Upstream data feeds label these the other
//! way round ("upper" for the lower value); the crossover rules are defined on
//! the values, not the labels.

use crate::domain::Kline;
use crate::indicators::atr::atr;

/// Band series aligned with the input klines. NaN during ATR warmup.
#[derive(Debug, Clone, PartialEq)]
pub struct SupertrendBands {
    pub band_a: Vec<f64>,
    pub band_b: Vec<f64>,
}

impl SupertrendBands {
    pub fn compute(klines: &[Kline], period: usize, multiplier: f64) -> Self {
        let atr = atr(klines, period);
        let (band_a, band_b) = klines
            .iter()
            .zip(&atr)
            .map(|(k, a)| {
                let hl2 = k.hl2();
                (hl2 - multiplier * a, hl2 + multiplier * a)
            })
            .unzip();
        Self { band_a, band_b }
    }

    pub fn len(&self) -> usize {
        self.band_a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.band_a.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_klines, DEFAULT_EPSILON};

    #[test]
    fn bands_straddle_hl2() {
        let klines = make_ohlc_klines(&[
            (100.0, 105.0, 95.0, 102.0),
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
        ]);
        let bands = SupertrendBands::compute(&klines, 3, 2.0);
        assert_eq!(bands.len(), 4);
        assert!(bands.band_a[2].is_nan());
        // hl2 = 100, ATR = 23/3
        assert_approx(bands.band_a[3], 100.0 - 2.0 * 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(bands.band_b[3], 100.0 + 2.0 * 23.0 / 3.0, DEFAULT_EPSILON);
        assert!(bands.band_a[3] < bands.band_b[3]);
    }

    #[test]
    fn bands_empty_input() {
        let bands = SupertrendBands::compute(&[], 10, 3.0);
        assert!(bands.is_empty());
    }
}
