//! Pair runner: wires together config, data loading, engine, and metrics.
//!
//! Two entry points:
//! - `run_pair_backtest()`: loads both legs from disk, then runs. Used by the CLI.
//! - `run_from_series()`: takes pre-loaded series. Used by tests and hosts that
//!   source prices elsewhere.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use pairlab_core::calibration::CalibrationResult;
use pairlab_core::domain::PriceSeries;
use pairlab_core::engine::{calibrate_pair, run_backtest, BacktestReport};
use pairlab_core::BacktestError;

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::data_loader::{load_pair, LoadError};
use crate::metrics::PerformanceMetrics;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("data error: {0}")]
    Data(#[from] LoadError),
    #[error("backtest error: {0}")]
    Backtest(#[from] BacktestError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of one pair backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairRunResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub dataset_hash: String,
    pub config: BacktestConfig,
    pub report: BacktestReport,
    pub metrics: PerformanceMetrics,
}

/// Default schema version for serde deserialization of older JSON without the field.
fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl PairRunResult {
    /// `A/B` label.
    pub fn pair_label(&self) -> String {
        format!("{}/{}", self.report.symbol_a, self.report.symbol_b)
    }

    /// First twelve hex digits of the run id.
    pub fn short_id(&self) -> &str {
        self.run_id.get(..12).unwrap_or(&self.run_id)
    }

    /// One-line summary for batch listings.
    pub fn summary_line(&self) -> String {
        format!(
            "{:<14} {}  hedge={:.4}  trades={:<4} test_sharpe={:>7.3}  return={:>+7.2}%",
            self.pair_label(),
            self.short_id(),
            self.report.hedge_ratio,
            self.report.trade_count,
            self.report.test_sharpe,
            self.metrics.total_return * 100.0,
        )
    }
}

/// Load both legs from disk and run the backtest.
pub fn run_pair_backtest(config: &BacktestConfig) -> Result<PairRunResult, RunError> {
    config.validate()?;
    let loaded = load_pair(&config.pair)?;
    run_from_series(
        config,
        &loaded.series_a,
        &loaded.series_b,
        &loaded.dataset_hash,
    )
}

/// Run on pre-loaded series: no I/O.
pub fn run_from_series(
    config: &BacktestConfig,
    series_a: &PriceSeries,
    series_b: &PriceSeries,
    dataset_hash: &str,
) -> Result<PairRunResult, RunError> {
    config.validate()?;
    let run_id = config.run_id(dataset_hash)?;
    info!(
        pair = %config.pair_label(),
        run_id = %run_id,
        rows_a = series_a.len(),
        rows_b = series_b.len(),
        "starting pair backtest"
    );

    let report = run_backtest(series_a, series_b, &config.to_engine_config())?;
    let metrics = PerformanceMetrics::compute(&report, config.portfolio.initial_capital);

    Ok(PairRunResult {
        schema_version: SCHEMA_VERSION,
        run_id,
        dataset_hash: dataset_hash.to_string(),
        config: config.clone(),
        report,
        metrics,
    })
}

/// Load both legs and calibrate only.
pub fn calibrate_from_config(config: &BacktestConfig) -> Result<CalibrationResult, RunError> {
    config.validate()?;
    let loaded = load_pair(&config.pair)?;
    Ok(calibrate_pair(
        &loaded.series_a,
        &loaded.series_b,
        &config.to_engine_config(),
    )?)
}
