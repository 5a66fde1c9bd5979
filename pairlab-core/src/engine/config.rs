//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::accounting::TrainingPnlMode;
use crate::error::BacktestError;
use crate::signal::{Thresholds, DEFAULT_ENTRY_THRESHOLD, DEFAULT_EXIT_THRESHOLD};
use crate::stats::RegressionForm;

/// One trading year.
pub const DEFAULT_TRAINING_PERIOD: usize = 252;
pub const DEFAULT_LEG_WEIGHT: f64 = 0.5;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;

/// Configuration for a single pair backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Observations used for calibration. Trading starts at this index.
    pub training_period: usize,
    pub entry_zscore: f64,
    pub exit_zscore: f64,
    pub regression_has_intercept: bool,
    /// Absolute target weight per leg while a spread position is open.
    pub leg_weight: f64,
    pub training_pnl: TrainingPnlMode,
    /// Observations required after the training window (0 = none).
    pub min_test_period: usize,
    pub initial_capital: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            training_period: DEFAULT_TRAINING_PERIOD,
            entry_zscore: DEFAULT_ENTRY_THRESHOLD,
            exit_zscore: DEFAULT_EXIT_THRESHOLD,
            regression_has_intercept: false,
            leg_weight: DEFAULT_LEG_WEIGHT,
            training_pnl: TrainingPnlMode::Zero,
            min_test_period: 0,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
        }
    }
}

impl EngineConfig {
    /// Validate every parameter and return the checked thresholds.
    pub fn validate(&self) -> Result<Thresholds, BacktestError> {
        let thresholds = Thresholds::new(self.entry_zscore, self.exit_zscore)?;
        if self.training_period == 0 {
            return Err(BacktestError::InvalidConfig(
                "training_period must be at least 1".into(),
            ));
        }
        if !(self.leg_weight > 0.0 && self.leg_weight <= 1.0) {
            return Err(BacktestError::InvalidConfig(format!(
                "leg_weight must be in (0, 1], got {}",
                self.leg_weight
            )));
        }
        if !(self.initial_capital.is_finite() && self.initial_capital > 0.0) {
            return Err(BacktestError::InvalidConfig(format!(
                "initial_capital must be positive, got {}",
                self.initial_capital
            )));
        }
        Ok(thresholds)
    }

    pub fn regression_form(&self) -> RegressionForm {
        RegressionForm::from_flag(self.regression_has_intercept)
    }

    /// Aligned observations needed before a run can start.
    pub fn required_observations(&self) -> usize {
        self.training_period.saturating_add(self.min_test_period)
    }
}
