//! Indicator scorers — market snapshot in, one number out.
//!
//! Scorers are stateless per call and never fail: a snapshot without enough
//! data for a scorer scores exactly `0.0`. Any setup that can fail (loading a
//! model, reading an external table) happens when the scorer is constructed,
//! never inside `score`.

pub mod depth_trend;
pub mod plugin;
pub mod supertrend;
pub mod volume_anomaly;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::MarketSnapshot;

pub use depth_trend::DepthTrendScorer;
pub use plugin::{
    ExternalScoreTable, LinearCoefficients, LinearModelScorer, PluginError, PluginSlot,
};
pub use supertrend::SupertrendScorer;
pub use volume_anomaly::VolumeAnomalyScorer;

/// Identity of a scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerId {
    DepthTrend,
    Supertrend,
    VolumeAnomaly,
    Ml,
    Vortecs,
}

impl ScorerId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DepthTrend => "depth_trend",
            Self::Supertrend => "supertrend",
            Self::VolumeAnomaly => "volume_anomaly",
            Self::Ml => "ml",
            Self::Vortecs => "vortecs",
        }
    }
}

impl fmt::Display for ScorerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of one scorer for one snapshot.
///
/// Ranges are scorer-specific: Depth/Trend is unbounded, Supertrend is one of
/// `{-50, 0, 50}`, Volume-Anomaly is at most `1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub scorer: ScorerId,
    pub value: f64,
}

/// Trait for scorers.
///
/// # Contract
/// `score` is a pure function of the snapshot: no I/O, no interior mutation,
/// identical input gives identical output. Insufficient data returns `0.0`.
pub trait Scorer: Send + Sync {
    fn id(&self) -> ScorerId;

    fn score(&self, snapshot: &MarketSnapshot) -> f64;

    fn evaluate(&self, snapshot: &MarketSnapshot) -> ScoreResult {
        ScoreResult {
            scorer: self.id(),
            value: self.score(snapshot),
        }
    }
}
