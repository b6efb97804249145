//! Scoring aggregator — weighted sum over the enabled scorers.
//!
//! Depth/Trend is always present. Supertrend, ML and Vortecs are optional
//! slots; an empty slot contributes nothing and is not reported as a
//! contributor. The weights are not normalised: their nominal sum is 1.0 but
//! nothing enforces it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::MarketSnapshot;
use crate::scorers::{
    DepthTrendScorer, PluginSlot, ScoreResult, Scorer, ScorerId, SupertrendScorer,
};

/// Weighted factors of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    DepthTrend,
    Supertrend,
    Ml,
    Vortecs,
}

impl Factor {
    pub const ALL: [Factor; 4] = [
        Factor::DepthTrend,
        Factor::Supertrend,
        Factor::Ml,
        Factor::Vortecs,
    ];

    pub fn scorer_id(&self) -> ScorerId {
        match self {
            Self::DepthTrend => ScorerId::DepthTrend,
            Self::Supertrend => ScorerId::Supertrend,
            Self::Ml => ScorerId::Ml,
            Self::Vortecs => ScorerId::Vortecs,
        }
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scorer_id().as_str())
    }
}

/// Weight per factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorWeights {
    pub depth_trend: f64,
    pub supertrend: f64,
    pub ml: f64,
    pub vortecs: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            depth_trend: 0.4,
            supertrend: 0.3,
            ml: 0.2,
            vortecs: 0.1,
        }
    }
}

impl FactorWeights {
    pub fn new(depth_trend: f64, supertrend: f64, ml: f64, vortecs: f64) -> Self {
        Self {
            depth_trend,
            supertrend,
            ml,
            vortecs,
        }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::DepthTrend => self.depth_trend,
            Factor::Supertrend => self.supertrend,
            Factor::Ml => self.ml,
            Factor::Vortecs => self.vortecs,
        }
    }

    /// Sum of all weights (informational).
    pub fn total(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    pub fn all_finite(&self) -> bool {
        Factor::ALL.iter().all(|f| self.get(*f).is_finite())
    }
}

/// Composite score for one symbol, with the raw results that fed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub symbol: String,
    pub value: f64,
    /// Raw (unweighted) results of the scorers that actually ran.
    pub contributors: Vec<ScoreResult>,
}

impl CompositeScore {
    pub fn contribution(&self, scorer: ScorerId) -> Option<f64> {
        self.contributors
            .iter()
            .find(|r| r.scorer == scorer)
            .map(|r| r.value)
    }
}

/// Immutable once built: holds the weights and the scorer slots.
#[derive(Debug)]
pub struct ScoringAggregator {
    weights: FactorWeights,
    depth_trend: DepthTrendScorer,
    supertrend: Option<SupertrendScorer>,
    ml: PluginSlot,
    vortecs: PluginSlot,
}

impl ScoringAggregator {
    /// Depth/Trend and a default Supertrend; no plugins.
    pub fn new(weights: FactorWeights) -> Self {
        Self {
            weights,
            depth_trend: DepthTrendScorer::new(),
            supertrend: Some(SupertrendScorer::default()),
            ml: PluginSlot::absent(ScorerId::Ml),
            vortecs: PluginSlot::absent(ScorerId::Vortecs),
        }
    }

    /// Depth/Trend only: every optional slot empty.
    pub fn depth_trend_only(weights: FactorWeights) -> Self {
        Self::new(weights).with_supertrend(None)
    }

    pub fn with_supertrend(mut self, supertrend: Option<SupertrendScorer>) -> Self {
        self.supertrend = supertrend;
        self
    }

    pub fn with_ml(mut self, slot: PluginSlot) -> Self {
        self.ml = slot;
        self
    }

    pub fn with_vortecs(mut self, slot: PluginSlot) -> Self {
        self.vortecs = slot;
        self
    }

    pub fn weights(&self) -> &FactorWeights {
        &self.weights
    }

    /// Factors whose scorer is present, in `Factor::ALL` order.
    pub fn active_factors(&self) -> Vec<Factor> {
        Factor::ALL
            .into_iter()
            .filter(|f| match f {
                Factor::DepthTrend => true,
                Factor::Supertrend => self.supertrend.is_some(),
                Factor::Ml => self.ml.is_present(),
                Factor::Vortecs => self.vortecs.is_present(),
            })
            .collect()
    }

    /// Raw result of every present scorer, in `Factor::ALL` order.
    pub fn evaluate_all(&self, snapshot: &MarketSnapshot) -> Vec<ScoreResult> {
        let mut results = vec![self.depth_trend.evaluate(snapshot)];
        if let Some(st) = &self.supertrend {
            results.push(st.evaluate(snapshot));
        }
        for slot in [&self.ml, &self.vortecs] {
            if let Some(value) = slot.score(snapshot) {
                results.push(ScoreResult {
                    scorer: slot.id(),
                    value,
                });
            }
        }
        results
    }

    /// Weighted composite with its contributors.
    pub fn composite(&self, snapshot: &MarketSnapshot) -> CompositeScore {
        let contributors = self.evaluate_all(snapshot);
        let value = self.weighted_sum(&contributors);
        CompositeScore {
            symbol: snapshot.symbol.clone(),
            value,
            contributors,
        }
    }

    /// Weighted composite value only.
    pub fn score(&self, snapshot: &MarketSnapshot) -> f64 {
        self.weighted_sum(&self.evaluate_all(snapshot))
    }

    fn weighted_sum(&self, results: &[ScoreResult]) -> f64 {
        results
            .iter()
            .filter_map(|r| self.weight_for(r.scorer).map(|w| w * r.value))
            .fold(0.0, |acc, v| acc + v)
    }

    fn weight_for(&self, scorer: ScorerId) -> Option<f64> {
        Factor::ALL
            .into_iter()
            .find(|f| f.scorer_id() == scorer)
            .map(|f| self.weights.get(f))
    }
}
