//! Indicator math shared by the scorers.
//!
//! Series-in, series-out helpers. Every output vector is aligned with its
//! input, with NaN during warmup.

pub mod atr;
pub mod supertrend;

pub use atr::{atr, true_range, wilder_smooth};
pub use supertrend::SupertrendBands;

/// Arithmetic mean of the trailing `window` values (or all of them if fewer).
///
/// Returns `None` for an empty slice or a zero window.
pub fn trailing_mean(values: &[f64], window: usize) -> Option<f64> {
    if values.is_empty() || window == 0 {
        return None;
    }
    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    Some(tail.iter().sum::<f64>() / tail.len() as f64)
}

/// Create synthetic klines from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for the first kline),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_klines(closes: &[f64]) -> Vec<crate::domain::Kline> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            test_kline(i, open, open.max(close) + 1.0, open.min(close) - 1.0, close, 1000.0)
        })
        .collect()
}

/// Create klines from explicit `(open, high, low, close)` tuples for testing.
#[cfg(test)]
pub fn make_ohlc_klines(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Kline> {
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| test_kline(i, open, high, low, close, 1000.0))
        .collect()
}

#[cfg(test)]
pub fn test_kline(
    i: usize,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
) -> crate::domain::Kline {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    crate::domain::Kline {
        open_time: base + chrono::Duration::hours(i as i64),
        open,
        high,
        low,
        close,
        volume,
    }
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
