//! Backtest driver and supporting types.
//!
//! The driver consumes an aligned price pair and runs two phases over it:
//!
//! 1. Collecting: fill the training window, calibrate once when it is full
//! 2. Trading: per step, attribute P&L, compute the z-score, run the state machine
//!
//! All run state lives in one `BacktestState` passed through each step.

pub mod config;
pub mod loop_runner;
pub mod report;
pub mod state;

pub use config::EngineConfig;
pub use loop_runner::{calibrate_pair, run_aligned, run_backtest, run_backtest_with_sink};
pub use report::{BacktestReport, EquityPoint};
pub use state::{BacktestState, DriverPhase};
