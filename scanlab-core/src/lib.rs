//! ScanLab Core — market snapshots in, scores, tiers and scan records out.
//!
//! This crate contains the pure scoring pipeline:
//! - Domain types (klines, orderbooks, snapshots, correlation matrices)
//! - Indicator math (true range, Wilder-smoothed ATR, Supertrend bands)
//! - Scorers: Depth/Trend, Supertrend crossover, Volume-Anomaly, ML and Vortecs plugins
//! - Weighted aggregation with empty optional slots
//! - Five-tier signal classification
//! - Universe scanner with hybrid scores
//!
//! Nothing here performs I/O or spawns threads.

pub mod aggregator;
pub mod classifier;
pub mod domain;
pub mod indicators;
pub mod scanner;
pub mod scorers;

pub use aggregator::{CompositeScore, Factor, FactorWeights, ScoringAggregator};
pub use classifier::{classify, SignalTier};
pub use domain::{CorrelationMatrix, Kline, Level, MarketSnapshot, OrderBook};
pub use scanner::{MarketScanner, ScanRecord, ScanVariant};
pub use scorers::{ScoreResult, Scorer, ScorerId};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: pipeline types can be shared across a host's worker
    /// threads, and `Scorer` stays object-safe with a snapshot-only `score`.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}
        fn score_through_trait_object(scorer: &dyn Scorer, snapshot: &MarketSnapshot) -> f64 {
            scorer.score(snapshot)
        }

        require_send::<MarketSnapshot>();
        require_sync::<MarketSnapshot>();
        require_send::<CorrelationMatrix>();
        require_sync::<CorrelationMatrix>();
        require_send::<ScoreResult>();
        require_sync::<ScoreResult>();
        require_send::<CompositeScore>();
        require_sync::<CompositeScore>();
        require_send::<ScanRecord>();
        require_sync::<ScanRecord>();

        require_send::<scorers::PluginSlot>();
        require_sync::<scorers::PluginSlot>();
        require_send::<ScoringAggregator>();
        require_sync::<ScoringAggregator>();
        require_send::<MarketScanner>();
        require_sync::<MarketScanner>();
        require_send::<Box<dyn Scorer>>();
        require_sync::<Box<dyn Scorer>>();

        let _ = score_through_trait_object;
    }
}
