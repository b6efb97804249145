//! Serializable scan configuration.
//!
//! One TOML document describes a whole run: which symbols to scan, how the
//! factors are weighted, indicator parameters, partition and ranker settings,
//! plugin sources, exchange profiles and logging. Every section is defaulted,
//! so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use scanlab_core::scorers::supertrend::SupertrendParams;
use scanlab_core::scorers::volume_anomaly::VolumeParams;
use scanlab_core::{FactorWeights, ScanVariant};

use crate::logging::LoggingConfig;
use crate::partition::PartitionConfig;
use crate::ranker::RankerConfig;
use crate::registry::ExchangeProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanlabConfig {
    /// Symbols to scan, in output order. Empty means "every supplied snapshot".
    pub universe: Vec<String>,
    pub weights: FactorWeights,
    pub supertrend: SupertrendConfig,
    pub volume: VolumeConfig,
    pub scanner: ScannerConfig,
    pub partition: PartitionConfig,
    pub ranker: RankerConfig,
    pub plugins: PluginsConfig,
    /// Declaration order is preserved.
    pub exchanges: Vec<ExchangeProfile>,
    pub logging: LoggingConfig,
}

/// The Supertrend slot. Disabling it removes the factor from the composite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupertrendConfig {
    pub enabled: bool,
    pub atr_period: usize,
    pub multiplier: f64,
}

impl Default for SupertrendConfig {
    fn default() -> Self {
        let params = SupertrendParams::default();
        Self {
            enabled: true,
            atr_period: params.atr_period,
            multiplier: params.multiplier,
        }
    }
}

impl SupertrendConfig {
    pub fn params(&self) -> SupertrendParams {
        SupertrendParams {
            atr_period: self.atr_period,
            multiplier: self.multiplier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub enabled: bool,
    pub min_samples: usize,
    pub window: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        let params = VolumeParams::default();
        Self {
            enabled: true,
            min_samples: params.min_samples,
            window: params.window,
        }
    }
}

impl VolumeConfig {
    pub fn params(&self) -> VolumeParams {
        VolumeParams {
            min_samples: self.min_samples,
            window: self.window,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub variant: ScanVariant,
    /// Score symbols on the rayon pool.
    pub parallel: bool,
}

/// Plugin sources. A missing path leaves the slot empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// JSON linear model for the ML slot.
    pub ml_model: Option<PathBuf>,
    /// JSON `{symbol: score}` table for the Vortecs slot.
    pub vortecs_scores: Option<PathBuf>,
}

impl ScanlabConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if !self.weights.all_finite() {
            return invalid("weights must be finite");
        }
        if self.supertrend.atr_period == 0 {
            return invalid("supertrend.atr_period must be at least 1");
        }
        if !self.supertrend.multiplier.is_finite() || self.supertrend.multiplier <= 0.0 {
            return invalid("supertrend.multiplier must be positive");
        }
        if self.volume.window == 0 {
            return invalid("volume.window must be at least 1");
        }

        let p = &self.partition;
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);
        if !in_unit(p.high_confidence) || !in_unit(p.medium_confidence) {
            return invalid("partition confidence thresholds must lie in [0, 1]");
        }
        if p.medium_confidence > p.high_confidence {
            return invalid("partition.medium_confidence exceeds high_confidence");
        }
        if p.confidence_scale.is_nan() || p.confidence_scale <= 0.0 {
            return invalid("partition.confidence_scale must be positive");
        }
        if is_negative_or_nan(p.max_position_fraction) {
            return invalid("partition.max_position_fraction must not be negative");
        }
        if is_negative_or_nan(self.ranker.total_balance) {
            return invalid("ranker.total_balance must not be negative");
        }
        if self
            .exchanges
            .iter()
            .any(|e| is_negative_or_nan(e.capital_allocation))
        {
            return invalid("exchange capital_allocation must not be negative");
        }
        Ok(())
    }
}

fn is_negative_or_nan(v: f64) -> bool {
    v.is_nan() || v < 0.0
}
