//! Market scanner — runs the scorers over a symbol universe.
//!
//! # Ordering
//! Output order equals universe order. Symbols without a snapshot are
//! skipped silently. The scanner never sorts; ranking is a later stage.
//!
//! Each symbol is scored independently from read-only state, so a host may
//! fan [`MarketScanner::scan_symbol`] out across threads and reassemble in
//! universe order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

use crate::aggregator::ScoringAggregator;
use crate::classifier::SignalTier;
use crate::domain::{CorrelationMatrix, MarketSnapshot};
use crate::scorers::{Scorer, ScorerId, VolumeAnomalyScorer};

/// Which sub-scores feed the hybrid score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanVariant {
    /// Depth/Trend and Supertrend.
    Basic,
    /// Everything present: Basic plus Volume-Anomaly and any plugins.
    #[default]
    Full,
}

impl ScanVariant {
    pub fn includes(&self, scorer: ScorerId) -> bool {
        match self {
            Self::Basic => matches!(scorer, ScorerId::DepthTrend | ScorerId::Supertrend),
            Self::Full => true,
        }
    }
}

/// Per-symbol scan output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub symbol: String,
    pub depth_trend: f64,
    pub supertrend: Option<f64>,
    pub volume_anomaly: Option<f64>,
    pub ml: Option<f64>,
    pub vortecs: Option<f64>,
    /// Mean of the sub-scores the scan variant makes available.
    pub hybrid: f64,
    /// Aggregator composite.
    pub composite: f64,
    pub tier: SignalTier,
    /// Largest absolute correlation to another scanned symbol.
    pub max_correlation: Option<f64>,
}

#[derive(Debug)]
pub struct MarketScanner {
    aggregator: ScoringAggregator,
    volume: Option<VolumeAnomalyScorer>,
    variant: ScanVariant,
}

impl MarketScanner {
    pub fn new(aggregator: ScoringAggregator, variant: ScanVariant) -> Self {
        Self {
            aggregator,
            volume: Some(VolumeAnomalyScorer::default()),
            variant,
        }
    }

    pub fn with_volume(mut self, volume: Option<VolumeAnomalyScorer>) -> Self {
        self.volume = volume;
        self
    }

    pub fn aggregator(&self) -> &ScoringAggregator {
        &self.aggregator
    }

    pub fn variant(&self) -> ScanVariant {
        self.variant
    }

    /// Scan `universe` in order, skipping symbols with no snapshot.
    pub fn scan<S: AsRef<str>>(
        &self,
        universe: &[S],
        snapshots: &HashMap<String, MarketSnapshot>,
        correlation: Option<&CorrelationMatrix>,
    ) -> Vec<ScanRecord> {
        let peers = scanned_peers(universe, snapshots);
        universe
            .iter()
            .filter_map(|symbol| {
                let symbol = symbol.as_ref();
                self.scan_symbol(symbol, snapshots.get(symbol), correlation, &peers)
            })
            .collect()
    }

    /// Score a single symbol. `None` when there is no snapshot.
    ///
    /// `peers` are the other symbols considered for `max_correlation`. When no
    /// matrix is passed, the one embedded in the snapshot (if any) is used.
    pub fn scan_symbol(
        &self,
        symbol: &str,
        snapshot: Option<&MarketSnapshot>,
        correlation: Option<&CorrelationMatrix>,
        peers: &[&str],
    ) -> Option<ScanRecord> {
        let Some(snapshot) = snapshot else {
            trace!(symbol, "no snapshot, skipped");
            return None;
        };

        let composite = self.aggregator.composite(snapshot);
        let volume = self.volume.as_ref().map(|v| v.evaluate(snapshot));

        let hybrid_inputs: Vec<f64> = composite
            .contributors
            .iter()
            .chain(volume.iter())
            .filter(|r| self.variant.includes(r.scorer))
            .map(|r| r.value)
            .collect();
        let hybrid = if hybrid_inputs.is_empty() {
            0.0
        } else {
            hybrid_inputs.iter().sum::<f64>() / hybrid_inputs.len() as f64
        };

        Some(ScanRecord {
            symbol: symbol.to_string(),
            depth_trend: composite.contribution(ScorerId::DepthTrend).unwrap_or(0.0),
            supertrend: composite.contribution(ScorerId::Supertrend),
            volume_anomaly: volume.map(|r| r.value),
            ml: composite.contribution(ScorerId::Ml),
            vortecs: composite.contribution(ScorerId::Vortecs),
            hybrid,
            composite: composite.value,
            tier: SignalTier::classify(composite.value),
            max_correlation: correlation
                .or(snapshot.correlation.as_ref())
                .and_then(|m| m.max_abs_correlation(symbol, peers.iter().copied())),
        })
    }
}

/// Universe symbols that have a snapshot, in universe order.
pub fn scanned_peers<'a, S: AsRef<str>>(
    universe: &'a [S],
    snapshots: &HashMap<String, MarketSnapshot>,
) -> Vec<&'a str> {
    universe
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| snapshots.contains_key(*s))
        .collect()
}
