//! Optional plugin scorers (ML, Vortecs) and the slot that holds them.
//!
//! A plugin is resolved exactly once, when the pipeline is built. If
//! construction fails the slot is simply empty: an absent plugin scores
//! nothing and the rest of the pipeline carries on. Absence is a normal
//! configuration state, so it is logged at debug level only.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::domain::MarketSnapshot;

use super::depth_trend::DepthTrendScorer;
use super::volume_anomaly::VolumeAnomalyScorer;
use super::{Scorer, ScorerId};

/// Errors from plugin construction. Never surfaced by `score`.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed plugin definition: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Present/absent holder for an optional scorer.
pub struct PluginSlot {
    id: ScorerId,
    scorer: Option<Box<dyn Scorer>>,
}

impl PluginSlot {
    pub fn absent(id: ScorerId) -> Self {
        Self { id, scorer: None }
    }

    pub fn present(scorer: impl Scorer + 'static) -> Self {
        Self {
            id: scorer.id(),
            scorer: Some(Box::new(scorer)),
        }
    }

    /// Turn a construction attempt into a slot. Failure leaves the slot absent.
    pub fn resolve<S: Scorer + 'static>(id: ScorerId, attempt: Result<S, PluginError>) -> Self {
        match attempt {
            Ok(scorer) => Self::present(scorer),
            Err(e) => {
                debug!(plugin = %id, error = %e, "plugin unavailable, slot left empty");
                Self::absent(id)
            }
        }
    }

    pub fn id(&self) -> ScorerId {
        self.id
    }

    pub fn is_present(&self) -> bool {
        self.scorer.is_some()
    }

    /// `None` when the slot is empty.
    pub fn score(&self, snapshot: &MarketSnapshot) -> Option<f64> {
        self.scorer.as_ref().map(|s| s.score(snapshot))
    }
}

impl fmt::Debug for PluginSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginSlot")
            .field("id", &self.id)
            .field("present", &self.is_present())
            .finish()
    }
}

/// Coefficients of the linear ML model. Unknown keys are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinearCoefficients {
    pub depth_imbalance: f64,
    pub trend: f64,
    pub volume_change: f64,
}

/// Linear model over the snapshot's microstructure features.
///
/// Features: `depth_ratio - 1`, last-interval `trend`, and the volume anomaly.
/// A feature whose data is missing contributes 0; a snapshot with neither an
/// orderbook nor two klines scores 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearModelScorer {
    #[serde(default)]
    pub bias: f64,
    pub coefficients: LinearCoefficients,
    #[serde(skip)]
    volume: VolumeAnomalyScorer,
}

impl LinearModelScorer {
    pub fn new(bias: f64, coefficients: LinearCoefficients) -> Result<Self, PluginError> {
        let model = Self {
            bias,
            coefficients,
            volume: VolumeAnomalyScorer::default(),
        };
        model.validate()?;
        Ok(model)
    }

    /// Parse a model definition such as
    /// `{"bias": 0.5, "coefficients": {"depth_imbalance": 40.0, "trend": 200.0}}`.
    pub fn from_json_str(json: &str) -> Result<Self, PluginError> {
        let model: Self = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), PluginError> {
        let c = &self.coefficients;
        let all_finite = [self.bias, c.depth_imbalance, c.trend, c.volume_change]
            .iter()
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(PluginError::InvalidModel(
                "bias and coefficients must be finite".into(),
            ));
        }
        Ok(())
    }
}

impl Scorer for LinearModelScorer {
    fn id(&self) -> ScorerId {
        ScorerId::Ml
    }

    fn score(&self, snapshot: &MarketSnapshot) -> f64 {
        let depth = DepthTrendScorer::depth_ratio(snapshot).map(|r| r - 1.0);
        let trend = DepthTrendScorer::trend(snapshot);
        if depth.is_none() && trend.is_none() {
            return 0.0;
        }
        let c = &self.coefficients;
        self.bias
            + c.depth_imbalance * depth.unwrap_or(0.0)
            + c.trend * trend.unwrap_or(0.0)
            + c.volume_change * self.volume.score(snapshot)
    }
}

/// Per-symbol externally computed scores (the Vortecs feed).
///
/// Symbols missing from the table score 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalScoreTable {
    scores: HashMap<String, f64>,
}

impl ExternalScoreTable {
    pub fn new(scores: HashMap<String, f64>) -> Self {
        Self { scores }
    }

    /// Parse a `{"SYMBOL": score, ...}` object.
    pub fn from_json_str(json: &str) -> Result<Self, PluginError> {
        let scores: HashMap<String, f64> = serde_json::from_str(json)?;
        if scores.is_empty() {
            return Err(PluginError::Unavailable("score table is empty".into()));
        }
        Ok(Self { scores })
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Scorer for ExternalScoreTable {
    fn id(&self) -> ScorerId {
        ScorerId::Vortecs
    }

    fn score(&self, snapshot: &MarketSnapshot) -> f64 {
        self.scores.get(&snapshot.symbol).copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderBook;
    use crate::indicators::make_klines;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::new("ETH")
            .with_orderbook(OrderBook::from_pairs(&[(10.0, 3.0)], &[(11.0, 2.0)]))
            .with_klines(make_klines(&[100.0, 110.0]))
    }

    #[test]
    fn linear_model_parses_and_scores() {
        let model = LinearModelScorer::from_json_str(
            r#"{"bias": 1.0, "coefficients": {"depth_imbalance": 10.0, "trend": 100.0}}"#,
        )
        .unwrap();
        // 1 + 10 * 0.5 + 100 * 0.1 + 0 * volume
        let s = model.score(&snapshot());
        assert!((s - 16.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn linear_model_rejects_unknown_coefficient() {
        let err = LinearModelScorer::from_json_str(
            r#"{"coefficients": {"sentiment": 1.0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, PluginError::Malformed(_)));
    }

    #[test]
    fn linear_model_rejects_non_finite() {
        let coeffs = LinearCoefficients {
            trend: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            LinearModelScorer::new(0.0, coeffs),
            Err(PluginError::InvalidModel(_))
        ));
    }

    #[test]
    fn linear_model_without_data_scores_zero() {
        let model = LinearModelScorer::new(5.0, LinearCoefficients::default()).unwrap();
        assert_eq!(model.score(&MarketSnapshot::new("ETH")), 0.0);
    }

    #[test]
    fn score_table_lookup() {
        let table = ExternalScoreTable::from_json_str(r#"{"ETH": 12.5, "BTC": -3.0}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.score(&snapshot()), 12.5);
        assert_eq!(table.score(&MarketSnapshot::new("DOGE")), 0.0);
    }

    #[test]
    fn empty_score_table_is_unavailable() {
        assert!(matches!(
            ExternalScoreTable::from_json_str("{}"),
            Err(PluginError::Unavailable(_))
        ));
    }

    #[test]
    fn failed_resolution_leaves_slot_absent() {
        let slot = PluginSlot::resolve(
            ScorerId::Ml,
            LinearModelScorer::from_json_str("not json"),
        );
        assert!(!slot.is_present());
        assert_eq!(slot.id(), ScorerId::Ml);
        assert_eq!(slot.score(&snapshot()), None);
    }

    #[test]
    fn present_slot_scores() {
        let table = ExternalScoreTable::new(HashMap::from([("ETH".to_string(), 7.0)]));
        let slot = PluginSlot::present(table);
        assert_eq!(slot.id(), ScorerId::Vortecs);
        assert_eq!(slot.score(&snapshot()), Some(7.0));
    }
}
