//! Exchange registry — the venue profiles capital is allocated across.
//!
//! Profiles are declared in configuration and passed in explicitly; nothing is
//! read from the process environment. The registry keeps a profile only if it
//! is enabled AND has a non-empty key AND a non-empty secret. Declaration
//! order is preserved; `priority` is carried along but never used to reorder.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

use crate::pair::PairStyle;

/// API credentials. `Debug` never prints the secret material.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_secret: String,
    #[serde(default)]
    pub passphrase: Option<String>,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            passphrase: None,
        }
    }

    pub fn with_passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Some(passphrase.into());
        self
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(s: &str) -> &'static str {
            if s.is_empty() {
                "<empty>"
            } else {
                "<redacted>"
            }
        }
        f.debug_struct("Credentials")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("passphrase", &self.passphrase.as_deref().map(redact))
            .finish()
    }
}

/// One declared venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeProfile {
    pub name: String,
    #[serde(flatten)]
    pub credentials: Credentials,
    #[serde(default)]
    pub sandbox: bool,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Lower is higher priority. Advisory only.
    #[serde(default)]
    pub priority: u32,
    #[serde(default = "default_max_positions")]
    pub max_positions: usize,
    /// Percentage of total capital.
    #[serde(default)]
    pub capital_allocation: f64,
    #[serde(default)]
    pub pair_style: PairStyle,
}

fn default_enabled() -> bool {
    true
}

fn default_max_positions() -> usize {
    5
}

impl ExchangeProfile {
    pub fn new(name: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            name: name.into(),
            credentials,
            sandbox: false,
            enabled: default_enabled(),
            priority: 0,
            max_positions: default_max_positions(),
            capital_allocation: 0.0,
            pair_style: PairStyle::default(),
        }
    }

    pub fn is_usable(&self) -> bool {
        self.enabled && self.credentials.is_complete()
    }
}

/// Usable exchange profiles in declaration order. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRegistry {
    profiles: Vec<ExchangeProfile>,
}

impl ExchangeRegistry {
    /// Filter `declared` down to usable profiles, keeping declaration order.
    pub fn new(declared: impl IntoIterator<Item = ExchangeProfile>) -> Self {
        let profiles: Vec<ExchangeProfile> = declared
            .into_iter()
            .filter(|p| {
                if p.is_usable() {
                    return true;
                }
                if p.enabled {
                    warn!(exchange = %p.name, "exchange enabled but missing api key or secret, skipped");
                } else {
                    debug!(exchange = %p.name, "exchange disabled");
                }
                false
            })
            .collect();

        let registry = Self { profiles };
        info!(
            exchanges = registry.len(),
            capital_allocation = registry.total_capital_allocation(),
            "exchange registry built"
        );
        registry
    }

    pub fn profiles(&self) -> &[ExchangeProfile] {
        &self.profiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExchangeProfile> {
        self.profiles.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ExchangeProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Sum of `capital_allocation` over the kept profiles. Not required to be 100.
    pub fn total_capital_allocation(&self) -> f64 {
        self.profiles.iter().map(|p| p.capital_allocation).sum()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
