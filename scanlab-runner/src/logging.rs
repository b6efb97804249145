//! Logging configuration and subscriber initialization.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over `level` when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `"json"` for JSON lines, anything else for human-readable output.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: format.into(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }

    /// Install the global subscriber. Logs go to stderr so stdout stays free
    /// for command output. Returns `false` if a subscriber was already set.
    pub fn init(&self) -> bool {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let installed = if self.is_json() {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        } else {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
        };
        installed.is_ok()
    }
}
