//! ScanLab Runner — everything around the pure scoring pipeline.
//!
//! This crate builds on `scanlab-core` to provide:
//! - TOML configuration with validation
//! - Exchange registry (credential filtering, declaration order)
//! - Candidate partitioning into high/medium priority tiers
//! - Target ranking, pair derivation, position sizing and per-exchange allocation
//! - Hand-off document persistence with a degraded read path
//! - Scan jobs, optionally fanned out over rayon
//! - Tracing subscriber setup

pub mod config;
pub mod handoff;
pub mod job;
pub mod logging;
pub mod pair;
pub mod partition;
pub mod ranker;
pub mod registry;

pub use config::{ConfigError, ScanlabConfig};
pub use handoff::{HandoffDocument, HandoffError, ScanSummary, TargetRecord};
pub use job::{load_correlation, load_snapshots, JobError, ScanJob, ScanOutcome};
pub use logging::LoggingConfig;
pub use pair::PairStyle;
pub use partition::{partition, Candidate, PartitionConfig, Partitioned};
pub use ranker::{
    allocate, ExchangeAllocation, PriorityTier, RankedTargets, RankerConfig, Target, TargetRanker,
};
pub use registry::{Credentials, ExchangeProfile, ExchangeRegistry};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn registry_is_send_sync() {
        assert_send::<ExchangeRegistry>();
        assert_sync::<ExchangeRegistry>();
    }

    #[test]
    fn job_is_send_sync() {
        assert_send::<ScanJob>();
        assert_sync::<ScanJob>();
        assert_send::<ScanOutcome>();
        assert_sync::<ScanOutcome>();
    }

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScanlabConfig>();
        assert_sync::<ScanlabConfig>();
        assert_send::<HandoffDocument>();
        assert_sync::<HandoffDocument>();
    }
}
