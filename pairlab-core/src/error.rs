//! Engine error types.
//!
//! Every variant is raised eagerly at configuration, alignment, or calibration
//! time. Nothing in the trading loop can fail once calibration succeeds.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::stats::RegressionError;

/// The stage of a run at which an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Configuration,
    Alignment,
    Calibration,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Configuration => write!(f, "configuration"),
            Phase::Alignment => write!(f, "alignment"),
            Phase::Calibration => write!(f, "calibration"),
        }
    }
}

/// Errors that abort a backtest run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BacktestError {
    #[error(
        "insufficient data for {symbol_a}/{symbol_b} during {phase}: \
         {available} aligned observations, {required} required"
    )]
    InsufficientData {
        symbol_a: String,
        symbol_b: String,
        phase: Phase,
        available: usize,
        required: usize,
    },

    #[error("invalid price for {symbol} on {date} during alignment: {price}")]
    InvalidPrice {
        symbol: String,
        date: chrono::NaiveDate,
        price: f64,
    },

    #[error("degenerate regression of {dependent} on {independent} during calibration: {source}")]
    DegenerateRegression {
        dependent: String,
        independent: String,
        #[source]
        source: RegressionError,
    },

    #[error(
        "degenerate calibration for {symbol_a}/{symbol_b}: spread standard deviation \
         is {std_dev} over {window} training observations"
    )]
    DegenerateCalibration {
        symbol_a: String,
        symbol_b: String,
        window: usize,
        std_dev: f64,
    },

    #[error("invalid threshold configuration (entry={entry}, exit={exit}): {reason}")]
    InvalidThresholds {
        entry: f64,
        exit: f64,
        reason: &'static str,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BacktestError {
    /// The phase at which this error was raised.
    pub fn phase(&self) -> Phase {
        match self {
            BacktestError::InsufficientData { phase, .. } => *phase,
            BacktestError::InvalidPrice { .. } => Phase::Alignment,
            BacktestError::DegenerateRegression { .. }
            | BacktestError::DegenerateCalibration { .. } => Phase::Calibration,
            BacktestError::InvalidThresholds { .. } | BacktestError::InvalidConfig(_) => {
                Phase::Configuration
            }
        }
    }
}
