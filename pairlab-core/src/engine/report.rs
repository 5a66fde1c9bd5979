//! Terminal report of a pair backtest.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::TradeEvent;

/// Portfolio value at the end of one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Everything a finished run exposes.
///
/// Sharpe ratios come from the engine's own P&L attribution; portfolio value,
/// total return, and the equity curve come from the execution sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    pub symbol_a: String,
    pub symbol_b: String,

    // ── Calibration ──
    pub hedge_ratio: f64,
    pub intercept: f64,
    pub spread_mean: f64,
    pub spread_std_dev: f64,

    // ── Performance ──
    pub training_sharpe: f64,
    pub test_sharpe: f64,
    pub final_portfolio_value: f64,
    pub total_return: f64,
    /// Compounded attributed P&L over the test bucket.
    pub test_cumulative_return: f64,
    pub max_drawdown: f64,

    // ── Activity ──
    /// Number of position transitions (entries plus exits).
    pub trade_count: usize,
    pub training_steps: usize,
    pub test_steps: usize,
    pub trade_events: Vec<TradeEvent>,
    pub equity_curve: Vec<EquityPoint>,
}

impl BacktestReport {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.equity_curve.first().map(|p| p.date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.equity_curve.last().map(|p| p.date)
    }

    /// Entries only (round trips opened).
    pub fn entry_count(&self) -> usize {
        self.trade_events.iter().filter(|e| e.kind.is_entry()).count()
    }
}
