//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|)
//! ATR uses Wilder smoothing (EMA with alpha = 1/period).
//! Lookback: period (needs period+1 klines for the TR series, then average).

use crate::domain::Kline;

/// Compute the True Range series from klines.
/// TR[0] = high[0] - low[0] (no previous close).
/// TR[t] = max(high[t]-low[t], |high[t]-close[t-1]|, |low[t]-close[t-1]|).
pub fn true_range(klines: &[Kline]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(klines.len());

    for (i, k) in klines.iter().enumerate() {
        let value = if i == 0 {
            k.high - k.low
        } else {
            let pc = klines[i - 1].close;
            (k.high - k.low).max((k.high - pc).abs()).max((k.low - pc).abs())
        };
        tr.push(value);
    }

    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
///
/// Seed: mean of the first `period` consecutive non-NaN values; everything
/// before the seed is NaN. A NaN after the seed poisons the rest of the series.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let seed_start = (0..=n - period).find(|&i| values[i..i + period].iter().all(|v| !v.is_nan()));
    let Some(seed_start) = seed_start else {
        return result;
    };
    let seed_end = seed_start + period;

    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;

    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// ATR series aligned with `klines`.
///
/// TR[0] has no previous close, so it is excluded from the seed window; the
/// first valid ATR is at index `period`.
pub fn atr(klines: &[Kline], period: usize) -> Vec<f64> {
    let mut tr = true_range(klines);
    if let Some(first) = tr.first_mut() {
        *first = f64::NAN;
    }
    wilder_smooth(&tr, period)
}
