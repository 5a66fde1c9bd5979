//! PairLab Core: pairs-trading calibration, signal, and accounting engine.
//!
//! This crate contains the heart of the backtesting harness:
//! - Domain types (observations, price series, spread positions, trade events)
//! - Two-instrument date alignment
//! - OLS hedge-ratio estimation (with or without intercept)
//! - Spread calibration and z-scores
//! - Position state machine driven by entry/exit thresholds
//! - Lagged P&L attribution and Sharpe ratio
//! - Execution-sink boundary with a frictionless reference portfolio
//! - Step-by-step backtest driver
//!
//! The crate is synchronous and performs no I/O. Identical inputs always
//! produce identical reports.

pub mod accounting;
pub mod calibration;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod execution;
pub mod metrics;
pub mod signal;
pub mod stats;

pub use calibration::CalibrationResult;
pub use domain::{EventKind, Observation, PositionState, PriceSeries, TradeEvent};
pub use engine::{run_backtest, BacktestReport, EngineConfig};
pub use error::{BacktestError, Phase};
