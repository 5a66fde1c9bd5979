//! PairLab Runner: pair backtest orchestration, data loading, artifacts.
//!
//! This crate builds on `pairlab-core` to provide:
//! - TOML configuration with CLI override merging
//! - CSV price loading and dataset fingerprinting
//! - Single-pair runner with run ids and derived metrics
//! - Parallel batch runs over independent pairs
//! - JSON / CSV / Markdown artifact export

pub mod batch;
pub mod config;
pub mod data_loader;
pub mod export;
pub mod metrics;
pub mod runner;

pub use batch::{run_batch, BatchItem};
pub use config::{BacktestConfig, ConfigError, ConfigOverrides, RunId};
pub use data_loader::{dataset_hash, load_pair, load_price_csv, LoadError, LoadedPair};
pub use export::{load_artifacts, save_artifacts};
pub use metrics::PerformanceMetrics;
pub use runner::{
    calibrate_from_config, run_from_series, run_pair_backtest, PairRunResult, RunError,
    SCHEMA_VERSION,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<BacktestConfig>();
        assert_sync::<BacktestConfig>();
        assert_send::<ConfigOverrides>();
        assert_sync::<ConfigOverrides>();
    }

    #[test]
    fn result_types_are_send_sync() {
        assert_send::<PairRunResult>();
        assert_sync::<PairRunResult>();
        assert_send::<PerformanceMetrics>();
        assert_sync::<PerformanceMetrics>();
        assert_send::<LoadedPair>();
        assert_sync::<LoadedPair>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
