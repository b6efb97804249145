//! Candidate partitioning — scan records into high/medium priority lists.
//!
//! This is the stage that feeds the ranker. Each tier comes out sorted by
//! descending confidence, ties broken by descending score, otherwise stable
//! (universe order).
//!
//! ```text
//! confidence        = min(|hybrid| / confidence_scale, 1)
//! position_fraction = confidence × max_position_fraction
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use scanlab_core::ScanRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    pub high_confidence: f64,
    pub medium_confidence: f64,
    /// Hybrid magnitude that maps to full confidence.
    pub confidence_scale: f64,
    /// Fraction of balance committed at full confidence.
    pub max_position_fraction: f64,
    /// Drop candidates whose hybrid score is not positive.
    pub long_only: bool,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            high_confidence: 0.7,
            medium_confidence: 0.4,
            confidence_scale: 100.0,
            max_position_fraction: 0.1,
            long_only: true,
        }
    }
}

/// A ranked-but-unsized trading candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub symbol: String,
    pub score: f64,
    /// In `[0, 1]`.
    pub confidence: f64,
    /// Fraction of balance to commit.
    pub position_fraction: f64,
}

impl Candidate {
    pub fn new(symbol: impl Into<String>, score: f64, confidence: f64, position_fraction: f64) -> Self {
        Self {
            symbol: symbol.into(),
            score,
            confidence,
            position_fraction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitioned {
    pub high: Vec<Candidate>,
    pub medium: Vec<Candidate>,
}

/// Split scan records into priority tiers. Records below the medium threshold
/// or with a non-finite hybrid score are dropped.
pub fn partition(records: &[ScanRecord], config: &PartitionConfig) -> Partitioned {
    let mut out = Partitioned::default();

    for record in records {
        let score = record.hybrid;
        if !score.is_finite() || (config.long_only && score <= 0.0) {
            continue;
        }
        let confidence = confidence_for(score, config.confidence_scale);
        let candidate = Candidate {
            symbol: record.symbol.clone(),
            score,
            confidence,
            position_fraction: confidence * config.max_position_fraction,
        };
        if confidence >= config.high_confidence {
            out.high.push(candidate);
        } else if confidence >= config.medium_confidence {
            out.medium.push(candidate);
        }
    }

    out.high.sort_by(by_confidence_then_score);
    out.medium.sort_by(by_confidence_then_score);
    out
}

/// `min(|score| / scale, 1)`, or 0 for a non-positive scale.
pub fn confidence_for(score: f64, scale: f64) -> f64 {
    if scale <= 0.0 {
        return 0.0;
    }
    (score.abs() / scale).min(1.0)
}

fn by_confidence_then_score(a: &Candidate, b: &Candidate) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then_with(|| b.score.total_cmp(&a.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanlab_core::SignalTier;

    fn record(symbol: &str, hybrid: f64) -> ScanRecord {
        ScanRecord {
            symbol: symbol.into(),
            depth_trend: hybrid,
            supertrend: None,
            volume_anomaly: None,
            ml: None,
            vortecs: None,
            hybrid,
            composite: hybrid,
            tier: SignalTier::classify(hybrid),
            max_correlation: None,
        }
    }

    #[test]
    fn splits_by_confidence() {
        let records = [record("A", 90.0), record("B", 50.0), record("C", 10.0)];
        let p = partition(&records, &PartitionConfig::default());
        assert_eq!(p.high.len(), 1);
        assert_eq!(p.high[0].symbol, "A");
        assert_eq!(p.medium.len(), 1);
        assert_eq!(p.medium[0].symbol, "B");
    }

    #[test]
    fn tiers_sorted_descending_and_stable() {
        let records = [
            record("A", 45.0),
            record("B", 60.0),
            record("C", 45.0),
            record("D", 200.0),
            record("E", 150.0),
        ];
        let p = partition(&records, &PartitionConfig::default());
        // D and E both saturate confidence at 1.0; score breaks the tie.
        let high: Vec<_> = p.high.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(high, vec!["D", "E"]);
        let medium: Vec<_> = p.medium.iter().map(|c| c.symbol.as_str()).collect();
        assert_eq!(medium, vec!["B", "A", "C"]);
    }

    #[test]
    fn long_only_drops_bearish() {
        let records = [record("A", -90.0)];
        assert!(partition(&records, &PartitionConfig::default()).high.is_empty());

        let both_sides = PartitionConfig {
            long_only: false,
            ..Default::default()
        };
        assert_eq!(partition(&records, &both_sides).high.len(), 1);
    }

    #[test]
    fn position_fraction_scales_with_confidence() {
        let p = partition(&[record("A", 80.0)], &PartitionConfig::default());
        let c = &p.high[0];
        assert!((c.confidence - 0.8).abs() < 1e-12);
        assert!((c.position_fraction - 0.08).abs() < 1e-12);
    }

    #[test]
    fn non_finite_hybrid_is_dropped() {
        let p = partition(&[record("A", f64::NAN)], &PartitionConfig::default());
        assert!(p.high.is_empty() && p.medium.is_empty());
    }

    #[test]
    fn confidence_guards_scale() {
        assert_eq!(confidence_for(50.0, 0.0), 0.0);
        assert_eq!(confidence_for(-250.0, 100.0), 1.0);
    }
}
