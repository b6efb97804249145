//! Scan job — wires configuration into a pipeline and runs one scan cycle.
//!
//! ```text
//! snapshots ─► MarketScanner ─► partition ─► TargetRanker ─► HandoffDocument
//!                                                      └────► allocate (per exchange)
//! ```
//!
//! Plugin files are read here, once, when the job is built. A plugin that
//! cannot be read or parsed leaves its slot empty and the job carries on.

use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use scanlab_core::scanner::scanned_peers;
use scanlab_core::scorers::{
    ExternalScoreTable, LinearModelScorer, PluginError, PluginSlot, SupertrendScorer,
    VolumeAnomalyScorer,
};
use scanlab_core::{
    CorrelationMatrix, MarketScanner, MarketSnapshot, ScanRecord, ScorerId, ScoringAggregator,
};

use crate::config::{ConfigError, ScanlabConfig};
use crate::handoff::{HandoffDocument, HandoffError};
use crate::partition::{partition, PartitionConfig, Partitioned};
use crate::ranker::{allocate, ExchangeAllocation, RankedTargets, TargetRanker};
use crate::registry::ExchangeRegistry;

#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, JobError>;

/// Everything one scan cycle produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub records: Vec<ScanRecord>,
    pub partitioned: Partitioned,
    pub ranked: RankedTargets,
    pub handoff: HandoffDocument,
    pub allocations: Vec<ExchangeAllocation>,
}

#[derive(Debug)]
pub struct ScanJob {
    universe: Vec<String>,
    scanner: MarketScanner,
    partition: PartitionConfig,
    ranker: TargetRanker,
    registry: ExchangeRegistry,
    parallel: bool,
}

impl ScanJob {
    /// Validate `config`, load plugins and build the pipeline.
    pub fn from_config(config: &ScanlabConfig) -> Result<Self> {
        config.validate()?;

        let supertrend = config
            .supertrend
            .enabled
            .then(|| SupertrendScorer::from_params(config.supertrend.params()));
        let aggregator = ScoringAggregator::depth_trend_only(config.weights)
            .with_supertrend(supertrend)
            .with_ml(load_plugin(
                ScorerId::Ml,
                config.plugins.ml_model.as_deref(),
                LinearModelScorer::from_json_str,
            ))
            .with_vortecs(load_plugin(
                ScorerId::Vortecs,
                config.plugins.vortecs_scores.as_deref(),
                ExternalScoreTable::from_json_str,
            ));
        debug!(factors = ?aggregator.active_factors(), "aggregator built");

        let volume = config
            .volume
            .enabled
            .then(|| VolumeAnomalyScorer::new(config.volume.params()));
        let scanner = MarketScanner::new(aggregator, config.scanner.variant).with_volume(volume);

        Ok(Self {
            universe: config.universe.clone(),
            scanner,
            partition: config.partition,
            ranker: TargetRanker::new(config.ranker.clone()),
            registry: ExchangeRegistry::new(config.exchanges.iter().cloned()),
            parallel: config.scanner.parallel,
        })
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn scanner(&self) -> &MarketScanner {
        &self.scanner
    }

    pub fn registry(&self) -> &ExchangeRegistry {
        &self.registry
    }

    pub fn ranker(&self) -> &TargetRanker {
        &self.ranker
    }

    /// Run against the configured total balance.
    pub fn run(
        &self,
        snapshots: Vec<MarketSnapshot>,
        correlation: Option<&CorrelationMatrix>,
    ) -> ScanOutcome {
        self.run_with_balance(snapshots, correlation, self.ranker.config().total_balance)
    }

    /// Scan, partition, rank and allocate.
    ///
    /// With an empty configured universe the snapshot order is the universe.
    pub fn run_with_balance(
        &self,
        snapshots: Vec<MarketSnapshot>,
        correlation: Option<&CorrelationMatrix>,
        total_balance: f64,
    ) -> ScanOutcome {
        let universe = if self.universe.is_empty() {
            snapshot_order(&snapshots)
        } else {
            self.universe.clone()
        };
        let by_symbol: HashMap<String, MarketSnapshot> = snapshots
            .into_iter()
            .map(|s| (s.symbol.clone(), s))
            .collect();

        let records = self.scan(&universe, &by_symbol, correlation);
        let partitioned = partition(&records, &self.partition);
        let ranked = self
            .ranker
            .rank_with_balance(&partitioned.high, &partitioned.medium, total_balance);
        let handoff = HandoffDocument::from_ranked(&ranked, records.len());
        let allocations = allocate(
            &ranked.merged(),
            &self.registry,
            &self.ranker.config().quote,
            total_balance,
        );

        for a in &allocations {
            debug!(
                exchange = %a.exchange,
                targets = a.targets.len(),
                balance = a.balance,
                committed = a.committed(),
                "exchange allocation"
            );
        }
        info!(
            universe = universe.len(),
            scanned = records.len(),
            high = ranked.high.len(),
            medium = ranked.medium.len(),
            exchanges = allocations.len(),
            "scan cycle complete"
        );

        ScanOutcome {
            records,
            partitioned,
            ranked,
            handoff,
            allocations,
        }
    }

    /// Universe-ordered scan, on the rayon pool when parallel.
    pub fn scan(
        &self,
        universe: &[String],
        snapshots: &HashMap<String, MarketSnapshot>,
        correlation: Option<&CorrelationMatrix>,
    ) -> Vec<ScanRecord> {
        if !self.parallel {
            return self.scanner.scan(universe, snapshots, correlation);
        }
        let peers = scanned_peers(universe, snapshots);
        universe
            .par_iter()
            .filter_map(|symbol| {
                self.scanner
                    .scan_symbol(symbol, snapshots.get(symbol), correlation, &peers)
            })
            .collect()
    }
}

/// Build a plugin slot from an optional file. Any failure leaves it empty.
fn load_plugin<S, F>(id: ScorerId, path: Option<&Path>, parse: F) -> PluginSlot
where
    S: scanlab_core::Scorer + 'static,
    F: FnOnce(&str) -> std::result::Result<S, PluginError>,
{
    let Some(path) = path else {
        debug!(plugin = %id, "no plugin source configured");
        return PluginSlot::absent(id);
    };
    let attempt = std::fs::read_to_string(path)
        .map_err(|e| PluginError::Unavailable(format!("{}: {e}", path.display())))
        .and_then(|text| parse(&text));
    PluginSlot::resolve(id, attempt)
}

/// Distinct snapshot symbols, first occurrence wins.
fn snapshot_order(snapshots: &[MarketSnapshot]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    snapshots
        .iter()
        .filter(|s| seen.insert(s.symbol.as_str()))
        .map(|s| s.symbol.clone())
        .collect()
}

/// Read a JSON array of snapshots.
///
/// Klines that fail the OHLC sanity check (NaN fields, `high < low`, negative
/// volume, ...) are dropped before any scorer sees them.
pub fn load_snapshots(path: impl AsRef<Path>) -> Result<Vec<MarketSnapshot>> {
    let mut snapshots: Vec<MarketSnapshot> = read_json(path.as_ref())?;
    for snapshot in &mut snapshots {
        let dropped = snapshot.retain_sane_klines();
        if dropped > 0 {
            warn!(symbol = %snapshot.symbol, dropped, "dropped malformed klines");
        }
    }
    Ok(snapshots)
}

/// Read a JSON correlation matrix.
pub fn load_correlation(path: impl AsRef<Path>) -> Result<CorrelationMatrix> {
    read_json(path.as_ref())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|source| JobError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| JobError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
