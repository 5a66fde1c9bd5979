//! Performance metrics: pure functions that compute run statistics.
//!
//! Every metric is a pure function: equity curve in, scalar out. The two
//! Sharpe ratios are not recomputed here; they come from the engine's own P&L
//! attribution and are copied from the report.

use serde::{Deserialize, Serialize};

use pairlab_core::engine::BacktestReport;
use pairlab_core::metrics::{max_drawdown, TRADING_DAYS_PER_YEAR};

/// Aggregate performance metrics for a single pair backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return: f64,
    pub cagr: f64,
    pub max_drawdown: f64,
    pub sortino: f64,
    pub training_sharpe: f64,
    pub test_sharpe: f64,
    /// Position transitions (entries plus exits).
    pub trade_count: usize,
    /// Spread positions opened.
    pub round_trips: usize,
}

impl PerformanceMetrics {
    /// Compute all metrics from a finished report.
    pub fn compute(report: &BacktestReport, initial_capital: f64) -> Self {
        let equity: Vec<f64> = report.equity_curve.iter().map(|p| p.value).collect();
        Self {
            total_return: total_return(&equity, initial_capital),
            cagr: cagr(&equity, initial_capital),
            max_drawdown: max_drawdown(&equity),
            sortino: sortino_ratio(&equity),
            training_sharpe: report.training_sharpe,
            test_sharpe: report.test_sharpe,
            trade_count: report.trade_count,
            round_trips: report.entry_count(),
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Total return as a fraction of starting capital.
pub fn total_return(equity_curve: &[f64], initial_capital: f64) -> f64 {
    match equity_curve.last() {
        Some(&final_eq) if initial_capital > 0.0 => final_eq / initial_capital - 1.0,
        _ => 0.0,
    }
}

/// Compound Annual Growth Rate.
///
/// One curve point per trading day, 252 days per year. Returns 0.0 for
/// fewer than two points or a non-positive start or end value.
pub fn cagr(equity_curve: &[f64], initial_capital: f64) -> f64 {
    let Some(&final_eq) = equity_curve.last() else {
        return 0.0;
    };
    if equity_curve.len() < 2 || initial_capital <= 0.0 || final_eq <= 0.0 {
        return 0.0;
    }
    let years = equity_curve.len() as f64 / TRADING_DAYS_PER_YEAR;
    (final_eq / initial_capital).powf(1.0 / years) - 1.0
}

/// Annualized Sortino ratio (downside deviation only).
///
/// Downside deviation is the root mean square of negative daily returns over
/// all returns (population form). Returns 0.0 with no downside or fewer than
/// two returns.
pub fn sortino_ratio(equity_curve: &[f64]) -> f64 {
    let returns = daily_returns(equity_curve);
    if returns.len() < 2 {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;

    let downside_sq: f64 = returns
        .iter()
        .filter(|&&r| r < 0.0)
        .map(|r| r * r)
        .sum();
    let downside_std = (downside_sq / returns.len() as f64).sqrt();
    if downside_std < 1e-15 {
        return 0.0;
    }
    (mean / downside_std) * TRADING_DAYS_PER_YEAR.sqrt()
}

// ─── Helpers ────────────────────────────────────────────────────────

/// Daily simple returns of an equity curve.
pub fn daily_returns(equity_curve: &[f64]) -> Vec<f64> {
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}
