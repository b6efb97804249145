//! Property-based tests for the scoring pipeline.
//!
//! Uses proptest to verify:
//! 1. Depth/Trend scores exactly 0 with fewer than 2 klines
//! 2. Supertrend scores 0 below `atr_period + 2` klines and is always ternary
//! 3. Volume-Anomaly never exceeds 1.0
//! 4. The classifier agrees with its threshold definition
//! 5. With every optional slot empty the composite is the weighted Depth/Trend score
//! 6. Scanner output is the universe order filtered to present snapshots

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use scanlab_core::scorers::{DepthTrendScorer, SupertrendScorer, VolumeAnomalyScorer};
use scanlab_core::{
    classify, FactorWeights, Kline, MarketScanner, MarketSnapshot, OrderBook, ScanVariant, Scorer,
    ScoringAggregator, SignalTier,
};
use std::collections::HashMap;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_kline_data() -> impl Strategy<Value = (f64, f64, f64, f64)> {
    // (close, up-wick, down-wick, volume)
    (10.0..500.0_f64, 0.0..20.0_f64, 0.0..20.0_f64, 0.0..10_000.0_f64)
}

fn to_klines(data: &[(f64, f64, f64, f64)]) -> Vec<Kline> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(close, up, down, volume))| {
            let open = if i == 0 { close } else { data[i - 1].0 };
            Kline {
                open_time: base + Duration::hours(i as i64),
                open,
                high: open.max(close) + up,
                low: open.min(close) - down,
                close,
                volume,
            }
        })
        .collect()
}

fn arb_levels() -> impl Strategy<Value = Vec<(f64, f64)>> {
    prop::collection::vec((1.0..1000.0_f64, 0.0..50.0_f64), 0..8)
}

fn arb_snapshot(max_klines: usize) -> impl Strategy<Value = MarketSnapshot> {
    (
        arb_levels(),
        arb_levels(),
        prop::collection::vec(arb_kline_data(), 0..max_klines),
    )
        .prop_map(|(bids, asks, klines)| {
            MarketSnapshot::new("X")
                .with_orderbook(OrderBook::from_pairs(&bids, &asks))
                .with_klines(to_klines(&klines))
        })
}

// ── 1. Depth/Trend ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn depth_trend_zero_below_two_klines(
        bids in arb_levels(),
        asks in arb_levels(),
        klines in prop::collection::vec(arb_kline_data(), 0..2),
    ) {
        let snap = MarketSnapshot::new("X")
            .with_orderbook(OrderBook::from_pairs(&bids, &asks))
            .with_klines(to_klines(&klines));
        prop_assert_eq!(DepthTrendScorer.score(&snap), 0.0);
    }
}

// ── 2. Supertrend ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn supertrend_zero_below_min_klines(
        period in 1usize..15,
        data in prop::collection::vec(arb_kline_data(), 0..16),
    ) {
        prop_assume!(data.len() < period + 2);
        let scorer = SupertrendScorer::new(period, 3.0);
        let snap = MarketSnapshot::new("X").with_klines(to_klines(&data));
        prop_assert_eq!(scorer.score(&snap), 0.0);
    }

    #[test]
    fn supertrend_is_ternary(
        period in 1usize..12,
        multiplier in 0.1..5.0_f64,
        data in prop::collection::vec(arb_kline_data(), 0..60),
    ) {
        let scorer = SupertrendScorer::new(period, multiplier);
        let snap = MarketSnapshot::new("X").with_klines(to_klines(&data));
        let s = scorer.score(&snap);
        prop_assert!(s == -50.0 || s == 0.0 || s == 50.0, "non-ternary score {}", s);
    }
}

// ── 3. Volume-Anomaly ────────────────────────────────────────────────

proptest! {
    #[test]
    fn volume_anomaly_bounded_above(volumes in prop::collection::vec(0.0..1e6_f64, 0..40)) {
        let s = VolumeAnomalyScorer::default().score_volumes(&volumes);
        prop_assert!(s <= 1.0);
        if volumes.len() < 10 {
            prop_assert_eq!(s, 0.0);
        }
    }
}

// ── 4. Classifier ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn classifier_matches_thresholds(score in -200.0..200.0_f64) {
        let tier = classify(score);
        let expected = if score > 50.0 {
            SignalTier::StrongBuy
        } else if score > 10.0 {
            SignalTier::Buy
        } else if score < -50.0 {
            SignalTier::StrongSell
        } else if score < -10.0 {
            SignalTier::Sell
        } else {
            SignalTier::Neutral
        };
        prop_assert_eq!(tier, expected);
    }
}

// ── 5. Aggregator degradation ────────────────────────────────────────

proptest! {
    #[test]
    fn empty_slots_leave_weighted_depth_trend(
        w in -2.0..2.0_f64,
        snap in arb_snapshot(30),
    ) {
        let weights = FactorWeights::new(w, 0.3, 0.2, 0.1);
        let agg = ScoringAggregator::depth_trend_only(weights);
        prop_assert_eq!(agg.score(&snap), w * DepthTrendScorer.score(&snap));
    }
}

// ── 6. Scanner ordering ──────────────────────────────────────────────

proptest! {
    #[test]
    fn scanner_preserves_universe_order(
        present in prop::collection::vec(any::<bool>(), 1..12),
    ) {
        let universe: Vec<String> = (0..present.len()).map(|i| format!("S{i}")).collect();
        let snapshots: HashMap<String, MarketSnapshot> = universe
            .iter()
            .zip(&present)
            .filter(|(_, p)| **p)
            .map(|(s, _)| (s.clone(), MarketSnapshot::new(s.clone())))
            .collect();

        let scanner = MarketScanner::new(
            ScoringAggregator::new(FactorWeights::default()),
            ScanVariant::Full,
        );
        let records = scanner.scan(&universe, &snapshots, None);

        let expected: Vec<&String> = universe
            .iter()
            .zip(&present)
            .filter(|(_, p)| **p)
            .map(|(s, _)| s)
            .collect();
        let actual: Vec<&String> = records.iter().map(|r| &r.symbol).collect();
        prop_assert_eq!(actual, expected);
    }
}
