//! Target ranker and allocator.
//!
//! Takes the high and medium candidate lists (already sorted upstream), caps
//! the medium list to a preview length, derives venue pair identifiers and
//! sizes each target as `position_fraction × balance`. Output is the full
//! high tier followed by the capped medium tier; neither tier is reordered.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

use crate::pair::{PairStyle, DEFAULT_QUOTE};
use crate::partition::Candidate;
use crate::registry::{ExchangeProfile, ExchangeRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    High,
    Medium,
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
        }
    }
}

/// An allocation-ready target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub symbol: String,
    pub score: f64,
    pub confidence: f64,
    pub derived_pair: String,
    pub position_fraction: f64,
    pub position_size: f64,
    pub priority: PriorityTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankerConfig {
    /// Maximum number of medium-priority targets emitted.
    pub medium_preview_len: usize,
    pub pair_style: PairStyle,
    pub quote: String,
    /// Total account balance targets are sized against.
    pub total_balance: f64,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            medium_preview_len: 10,
            pair_style: PairStyle::PerpetualSwap,
            quote: DEFAULT_QUOTE.to_string(),
            total_balance: 0.0,
        }
    }
}

/// Ranked output, tier by tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTargets {
    pub high: Vec<Target>,
    pub medium: Vec<Target>,
}

impl RankedTargets {
    /// High tier followed by medium tier.
    pub fn merged(&self) -> Vec<Target> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.high.iter().chain(self.medium.iter())
    }

    pub fn len(&self) -> usize {
        self.high.len() + self.medium.len()
    }

    pub fn is_empty(&self) -> bool {
        self.high.is_empty() && self.medium.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TargetRanker {
    config: RankerConfig,
}

impl TargetRanker {
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// The leading `medium_preview_len` medium candidates, order untouched.
    pub fn cap_medium<'a>(&self, medium: &'a [Candidate]) -> &'a [Candidate] {
        &medium[..medium.len().min(self.config.medium_preview_len)]
    }

    pub fn derive_pair(&self, symbol: &str) -> String {
        self.config.pair_style.derive(symbol, &self.config.quote)
    }

    /// Rank against the configured total balance.
    pub fn rank(&self, high: &[Candidate], medium: &[Candidate]) -> RankedTargets {
        self.rank_with_balance(high, medium, self.config.total_balance)
    }

    /// Rank against an explicit balance. An empty tier yields an empty tier.
    pub fn rank_with_balance(
        &self,
        high: &[Candidate],
        medium: &[Candidate],
        total_balance: f64,
    ) -> RankedTargets {
        let capped = self.cap_medium(medium);
        if capped.len() < medium.len() {
            debug!(
                kept = capped.len(),
                dropped = medium.len() - capped.len(),
                "medium tier capped"
            );
        }

        let to_target = |c: &Candidate, priority| Target {
            symbol: c.symbol.clone(),
            score: c.score,
            confidence: c.confidence,
            derived_pair: self.derive_pair(&c.symbol),
            position_fraction: c.position_fraction,
            position_size: c.position_fraction * total_balance,
            priority,
        };

        let ranked = RankedTargets {
            high: high.iter().map(|c| to_target(c, PriorityTier::High)).collect(),
            medium: capped.iter().map(|c| to_target(c, PriorityTier::Medium)).collect(),
        };
        info!(
            high = ranked.high.len(),
            medium = ranked.medium.len(),
            "targets ranked"
        );
        ranked
    }
}

/// Targets assigned to one exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeAllocation {
    pub exchange: String,
    pub sandbox: bool,
    /// `total_balance × capital_allocation / 100`.
    pub balance: f64,
    pub targets: Vec<Target>,
}

impl ExchangeAllocation {
    pub fn committed(&self) -> f64 {
        self.targets.iter().map(|t| t.position_size).sum()
    }
}

/// Spread `targets` over every registry profile, in declaration order.
///
/// Each profile receives the first `max_positions` targets, re-derived with its
/// own pair style and sized against its share of `total_balance`.
pub fn allocate(
    targets: &[Target],
    registry: &ExchangeRegistry,
    quote: &str,
    total_balance: f64,
) -> Vec<ExchangeAllocation> {
    registry
        .iter()
        .map(|profile| allocate_to(profile, targets, quote, total_balance))
        .collect()
}

fn allocate_to(
    profile: &ExchangeProfile,
    targets: &[Target],
    quote: &str,
    total_balance: f64,
) -> ExchangeAllocation {
    let balance = total_balance * profile.capital_allocation / 100.0;
    let targets = targets
        .iter()
        .take(profile.max_positions)
        .map(|t| Target {
            derived_pair: profile.pair_style.derive(&t.symbol, quote),
            position_size: t.position_fraction * balance,
            ..t.clone()
        })
        .collect();
    ExchangeAllocation {
        exchange: profile.name.clone(),
        sandbox: profile.sandbox,
        balance,
        targets,
    }
}
