//! Return / P&L accountant.
//!
//! P&L for step t is attributed with the position held during step t−1 and
//! each leg's simple return from t−1 to t. The position decided at step t only
//! earns from t+1 onward, so nothing here can see the future.

use serde::{Deserialize, Serialize};

use crate::domain::PositionState;

/// What the training bucket records while the strategy is still calibrating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPnlMode {
    /// A zero per step: nothing is held before calibration.
    #[default]
    Zero,
    /// The execution sink's fractional portfolio value change per step.
    PortfolioDelta,
}

/// Simple return `(curr − prev) / prev`.
pub fn simple_return(prev: f64, curr: f64) -> f64 {
    (curr - prev) / prev
}

/// One step's simple returns on both legs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegReturns {
    pub a: f64,
    pub b: f64,
}

impl LegReturns {
    pub fn between(prev_a: f64, prev_b: f64, curr_a: f64, curr_b: f64) -> Self {
        Self {
            a: simple_return(prev_a, curr_a),
            b: simple_return(prev_b, curr_b),
        }
    }
}

/// P&L earned over one step by the position held during the prior step.
///
/// Long spread: `w·(r_A − r_B)`; short spread: `w·(r_B − r_A)`; flat: 0.
pub fn attributed_pnl(held: PositionState, returns: LegReturns, leg_weight: f64) -> f64 {
    match held {
        PositionState::Flat => 0.0,
        PositionState::LongSpread => leg_weight * (returns.a - returns.b),
        PositionState::ShortSpread => leg_weight * (returns.b - returns.a),
    }
}

/// Per-step P&L split into the calibration and trading buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PnlLedger {
    training: Vec<f64>,
    test: Vec<f64>,
}

impl PnlLedger {
    pub fn with_capacity(training: usize, test: usize) -> Self {
        Self {
            training: Vec::with_capacity(training),
            test: Vec::with_capacity(test),
        }
    }

    pub fn record_training(&mut self, pnl: f64) {
        self.training.push(pnl);
    }

    pub fn record_test(&mut self, pnl: f64) {
        self.test.push(pnl);
    }

    pub fn training(&self) -> &[f64] {
        &self.training
    }

    pub fn test(&self) -> &[f64] {
        &self.test
    }

    /// Compounded return of the test bucket: `Π(1 + pnl) − 1`.
    pub fn test_cumulative_return(&self) -> f64 {
        self.test.iter().fold(1.0, |acc, pnl| acc * (1.0 + pnl)) - 1.0
    }
}
