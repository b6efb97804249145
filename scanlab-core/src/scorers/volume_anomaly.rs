//! Volume-Anomaly — last volume relative to its trailing average.
//!
//! `min(last / mean(last window) - 1, 1.0)`: capped above at `1.0`, unbounded
//! below (down to `-1.0` for a zero last volume).

use serde::{Deserialize, Serialize};

use crate::domain::MarketSnapshot;
use crate::indicators::trailing_mean;

use super::{Scorer, ScorerId};

pub const MAX_SCORE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParams {
    /// Fewer volume samples than this score 0.
    pub min_samples: usize,
    /// Trailing window for the average (the last volume is included).
    pub window: usize,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            min_samples: 10,
            window: 20,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VolumeAnomalyScorer {
    params: VolumeParams,
}

impl VolumeAnomalyScorer {
    pub fn new(params: VolumeParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> VolumeParams {
        self.params
    }

    /// Score a raw volume series directly.
    pub fn score_volumes(&self, volumes: &[f64]) -> f64 {
        if volumes.len() < self.params.min_samples {
            return 0.0;
        }
        let (Some(avg), Some(&last)) = (trailing_mean(volumes, self.params.window), volumes.last())
        else {
            return 0.0;
        };
        if avg == 0.0 || !avg.is_finite() || !last.is_finite() {
            return 0.0;
        }
        (last / avg - 1.0).min(MAX_SCORE)
    }
}

impl Scorer for VolumeAnomalyScorer {
    fn id(&self) -> ScorerId {
        ScorerId::VolumeAnomaly
    }

    fn score(&self, snapshot: &MarketSnapshot) -> f64 {
        self.score_volumes(&snapshot.volumes())
    }
}
