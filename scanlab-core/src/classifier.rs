//! Signal classifier — composite score to one of five tiers.
//!
//! Strict inequalities throughout, so boundary values fall toward neutral:
//! `50.0` is `Buy`, `10.0` and `-10.0` are `Neutral`, `-50.0` is `Sell`.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const STRONG_THRESHOLD: f64 = 50.0;
pub const THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTier {
    StrongBuy,
    Buy,
    Neutral,
    Sell,
    StrongSell,
}

impl SignalTier {
    pub fn classify(score: f64) -> Self {
        if score > STRONG_THRESHOLD {
            Self::StrongBuy
        } else if score > THRESHOLD {
            Self::Buy
        } else if score < -STRONG_THRESHOLD {
            Self::StrongSell
        } else if score < -THRESHOLD {
            Self::Sell
        } else {
            Self::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongBuy => "strong_buy",
            Self::Buy => "buy",
            Self::Neutral => "neutral",
            Self::Sell => "sell",
            Self::StrongSell => "strong_sell",
        }
    }
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-function form of [`SignalTier::classify`].
pub fn classify(score: f64) -> SignalTier {
    SignalTier::classify(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_table() {
        let table = [
            (51.0, SignalTier::StrongBuy),
            (50.0, SignalTier::Buy),
            (11.0, SignalTier::Buy),
            (10.0, SignalTier::Neutral),
            (0.0, SignalTier::Neutral),
            (-10.0, SignalTier::Neutral),
            (-11.0, SignalTier::Sell),
            (-50.0, SignalTier::Sell),
            (-51.0, SignalTier::StrongSell),
        ];
        for (score, expected) in table {
            assert_eq!(classify(score), expected, "score {score}");
        }
    }

    #[test]
    fn nan_is_neutral() {
        assert_eq!(classify(f64::NAN), SignalTier::Neutral);
    }

    #[test]
    fn tier_serializes_snake_case() {
        let json = serde_json::to_string(&SignalTier::StrongBuy).unwrap();
        assert_eq!(json, "\"strong_buy\"");
        assert_eq!(SignalTier::StrongSell.to_string(), "strong_sell");
    }
}
