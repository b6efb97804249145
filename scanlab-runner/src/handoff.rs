//! Hand-off document between the scanning stage and downstream consumers.
//!
//! JSON shape:
//!
//! ```json
//! {
//!   "trading_targets": {
//!     "high_priority":   [{"symbol", "score", "confidence", "derived_pair", "position_size"}],
//!     "medium_priority": [...]
//!   },
//!   "summary": {"total_coins_analyzed", "high_priority_targets", "medium_priority_targets"}
//! }
//! ```
//!
//! Summary counts describe the tiers as emitted, after the medium cap.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::ranker::{RankedTargets, Target};

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("hand-off document not found: {0}")]
    NotFound(PathBuf),
    #[error("malformed hand-off document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("hand-off I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize hand-off document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The five-field target record consumers read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    pub symbol: String,
    pub score: f64,
    pub confidence: f64,
    pub derived_pair: String,
    pub position_size: f64,
}

impl From<&Target> for TargetRecord {
    fn from(t: &Target) -> Self {
        Self {
            symbol: t.symbol.clone(),
            score: t.score,
            confidence: t.confidence,
            derived_pair: t.derived_pair.clone(),
            position_size: t.position_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingTargets {
    #[serde(default)]
    pub high_priority: Vec<TargetRecord>,
    #[serde(default)]
    pub medium_priority: Vec<TargetRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub total_coins_analyzed: usize,
    pub high_priority_targets: usize,
    pub medium_priority_targets: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandoffDocument {
    pub trading_targets: TradingTargets,
    #[serde(default)]
    pub summary: ScanSummary,
}

impl HandoffDocument {
    pub fn from_ranked(ranked: &RankedTargets, total_coins_analyzed: usize) -> Self {
        let trading_targets = TradingTargets {
            high_priority: ranked.high.iter().map(TargetRecord::from).collect(),
            medium_priority: ranked.medium.iter().map(TargetRecord::from).collect(),
        };
        let summary = ScanSummary {
            total_coins_analyzed,
            high_priority_targets: trading_targets.high_priority.len(),
            medium_priority_targets: trading_targets.medium_priority.len(),
        };
        Self {
            trading_targets,
            summary,
        }
    }

    pub fn to_json(&self) -> Result<String, HandoffError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write pretty JSON, creating parent directories as needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HandoffError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), targets = self.len(), "hand-off document written");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, HandoffError> {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HandoffError::NotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|source| HandoffError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `None` (with a warning) when the document is missing or unreadable.
    pub fn load_or_degraded(path: impl AsRef<Path>) -> Option<Self> {
        match Self::load(path) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(error = %e, "hand-off document unavailable, continuing degraded");
                None
            }
        }
    }

    /// High tier followed by medium tier.
    pub fn targets(&self) -> impl Iterator<Item = &TargetRecord> {
        self.trading_targets
            .high_priority
            .iter()
            .chain(self.trading_targets.medium_priority.iter())
    }

    pub fn len(&self) -> usize {
        self.trading_targets.high_priority.len() + self.trading_targets.medium_priority.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Plain-text report for terminals.
    pub fn render_report(&self) -> String {
        let mut out = String::new();
        let s = &self.summary;
        let _ = writeln!(out, "coins analyzed: {}", s.total_coins_analyzed);
        for (title, records) in [
            ("high priority", &self.trading_targets.high_priority),
            ("medium priority", &self.trading_targets.medium_priority),
        ] {
            let _ = writeln!(out, "{title} ({}):", records.len());
            for r in records {
                let _ = writeln!(
                    out,
                    "  {:<10} {:<16} score {:>8.2}  conf {:>5.2}  size {:>10.2}",
                    r.symbol, r.derived_pair, r.score, r.confidence, r.position_size
                );
            }
        }
        out
    }
}
