//! Sharpe ratio and equity-curve diagnostics: pure functions over finished series.

use tracing::{debug, warn};

use crate::stats;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Standard deviations below this are treated as zero.
const ZERO_STD_TOLERANCE: f64 = 1e-15;

/// Annualized Sharpe ratio of a per-step P&L series.
///
/// `sqrt(252) · mean / population_std`. Returns 0.0 for fewer than two
/// observations or zero dispersion, never an error: the test-period Sharpe is
/// a terminal diagnostic, not a control input.
pub fn sharpe_ratio(pnl: &[f64]) -> f64 {
    if pnl.len() < 2 {
        return 0.0;
    }
    let std = stats::population_std_dev(pnl);
    if !std.is_finite() {
        warn!(observations = pnl.len(), "non-finite P&L in Sharpe input");
        return 0.0;
    }
    if std < ZERO_STD_TOLERANCE {
        debug!(observations = pnl.len(), "zero-dispersion P&L, Sharpe set to 0");
        return 0.0;
    }
    TRADING_DAYS_PER_YEAR.sqrt() * stats::mean(pnl) / std
}

/// Maximum drawdown as a negative fraction (e.g. -0.15 = 15% below the peak).
///
/// Returns 0.0 for an empty, constant, or monotonically rising curve.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    drawdown_series(equity)
        .into_iter()
        .fold(0.0_f64, |worst, dd| worst.min(dd))
}

/// Drawdown from the running peak at every point of the curve.
pub fn drawdown_series(equity: &[f64]) -> Vec<f64> {
    let mut peak = f64::NEG_INFINITY;
    equity
        .iter()
        .map(|&eq| {
            if eq > peak {
                peak = eq;
            }
            if peak > 0.0 {
                (eq - peak) / peak
            } else {
                0.0
            }
        })
        .collect()
}
