//! Depth/Trend — orderbook imbalance plus last-interval price change.
//!
//! ```text
//! depth_ratio = sum(top 5 bid qty) / sum(top 5 ask qty)     (1.0 if asks are empty)
//! trend       = (close[t] - close[t-1]) / close[t-1]
//! score       = 0.5·100·(depth_ratio - 1) + 0.5·100·trend
//! ```

use crate::domain::MarketSnapshot;

use super::{Scorer, ScorerId};

/// Number of best levels summed on each side.
pub const DEPTH_LEVELS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct DepthTrendScorer;

impl DepthTrendScorer {
    pub fn new() -> Self {
        Self
    }

    /// `buy_depth / sell_depth`, or `1.0` when there is no ask depth.
    pub fn depth_ratio(snapshot: &MarketSnapshot) -> Option<f64> {
        let book = snapshot.orderbook.as_ref()?;
        let buy_depth = book.bid_depth(DEPTH_LEVELS);
        let sell_depth = book.ask_depth(DEPTH_LEVELS);
        if sell_depth == 0.0 {
            Some(1.0)
        } else {
            Some(buy_depth / sell_depth)
        }
    }

    /// Relative change between the two most recent closes.
    ///
    /// A zero previous close yields `0.0`.
    pub fn trend(snapshot: &MarketSnapshot) -> Option<f64> {
        let (prev, cur) = snapshot.last_two()?;
        if prev.close == 0.0 {
            return Some(0.0);
        }
        Some((cur.close - prev.close) / prev.close)
    }
}

impl Scorer for DepthTrendScorer {
    fn id(&self) -> ScorerId {
        ScorerId::DepthTrend
    }

    fn score(&self, snapshot: &MarketSnapshot) -> f64 {
        let (Some(depth_ratio), Some(trend)) = (Self::depth_ratio(snapshot), Self::trend(snapshot))
        else {
            return 0.0;
        };
        let depth_score = 0.5 * 100.0 * (depth_ratio - 1.0);
        let trend_score = 0.5 * 100.0 * trend;
        depth_score + trend_score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderBook;
    use crate::indicators::{assert_approx, make_klines};

    fn snapshot(bids: &[(f64, f64)], asks: &[(f64, f64)], closes: &[f64]) -> MarketSnapshot {
        MarketSnapshot::new("BTC")
            .with_orderbook(OrderBook::from_pairs(bids, asks))
            .with_klines(make_klines(closes))
    }

    #[test]
    fn reference_scenario() {
        let snap = snapshot(
            &[(100.0, 2.0), (99.0, 3.0)],
            &[(101.0, 1.0), (102.0, 1.0)],
            &[100.0, 105.0],
        );
        assert_eq!(DepthTrendScorer::depth_ratio(&snap), Some(2.5));
        assert_approx(DepthTrendScorer::trend(&snap).unwrap(), 0.05, 1e-12);
        assert_approx(DepthTrendScorer.score(&snap), 77.5, 1e-9);
    }

    #[test]
    fn fewer_than_two_klines_scores_zero() {
        let snap = snapshot(&[(100.0, 9.0)], &[(101.0, 1.0)], &[100.0]);
        assert_eq!(DepthTrendScorer.score(&snap), 0.0);
    }

    #[test]
    fn missing_orderbook_scores_zero() {
        let snap = MarketSnapshot::new("BTC").with_klines(make_klines(&[100.0, 110.0]));
        assert_eq!(DepthTrendScorer.score(&snap), 0.0);
    }

    #[test]
    fn empty_asks_fall_back_to_unit_ratio() {
        let snap = snapshot(&[(100.0, 50.0)], &[], &[100.0, 100.0]);
        assert_eq!(DepthTrendScorer::depth_ratio(&snap), Some(1.0));
        assert_eq!(DepthTrendScorer.score(&snap), 0.0);
    }

    #[test]
    fn only_top_five_levels_count() {
        let bids: Vec<(f64, f64)> = (0..8).map(|i| (100.0 - i as f64, 1.0)).collect();
        let snap = snapshot(&bids, &[(101.0, 5.0)], &[100.0, 100.0]);
        assert_eq!(DepthTrendScorer::depth_ratio(&snap), Some(1.0));
    }

    #[test]
    fn uses_two_most_recent_closes() {
        let snap = snapshot(&[(1.0, 1.0)], &[(2.0, 1.0)], &[10.0, 200.0, 100.0, 90.0]);
        assert_approx(DepthTrendScorer.score(&snap), 50.0 * -0.1, 1e-9);
    }
}
