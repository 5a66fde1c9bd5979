//! Mutable run state threaded through the driver loop.

use serde::{Deserialize, Serialize};

use crate::accounting::PnlLedger;
use crate::calibration::CalibrationResult;
use crate::domain::{PositionState, TradeEvent};

use super::report::EquityPoint;

/// Where the driver is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverPhase {
    /// Filling the training window; nothing is traded.
    Collecting,
    /// Calibrated; the state machine runs every step.
    Trading,
    /// Series exhausted.
    Finished,
}

/// Everything that evolves step by step during a backtest.
///
/// One owned value, passed by `&mut` into each step. No other state survives
/// between steps.
#[derive(Debug, Clone)]
pub struct BacktestState {
    pub phase: DriverPhase,
    /// Index of the step being processed.
    pub step: usize,
    pub position: PositionState,
    /// Set exactly once, at the step where the training window fills.
    pub calibration: Option<CalibrationResult>,
    pub ledger: PnlLedger,
    pub events: Vec<TradeEvent>,
    pub equity_curve: Vec<EquityPoint>,
    /// Portfolio value reported by the sink at the end of the previous step.
    pub last_portfolio_value: f64,
}

impl BacktestState {
    pub fn new(initial_capital: f64, training_period: usize, total_steps: usize) -> Self {
        Self {
            phase: DriverPhase::Collecting,
            step: 0,
            position: PositionState::Flat,
            calibration: None,
            ledger: PnlLedger::with_capacity(
                training_period,
                total_steps.saturating_sub(training_period),
            ),
            events: Vec::new(),
            equity_curve: Vec::with_capacity(total_steps),
            last_portfolio_value: initial_capital,
        }
    }

    /// Number of position transitions so far.
    pub fn trade_count(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_flat_and_collecting() {
        let state = BacktestState::new(1_000.0, 10, 30);
        assert_eq!(state.phase, DriverPhase::Collecting);
        assert_eq!(state.position, PositionState::Flat);
        assert!(state.calibration.is_none());
        assert_eq!(state.trade_count(), 0);
        assert_eq!(state.last_portfolio_value, 1_000.0);
    }
}
