//! Hedge-ratio calibration and spread z-scores.
//!
//! Calibration runs exactly once over the training window:
//! 1. regress leg A on leg B to get the hedge ratio (and optional intercept)
//! 2. form the training spread `a[i] − hedge·b[i] − intercept`
//! 3. take its population mean and standard deviation
//!
//! Every later z-score is measured against those frozen statistics.

use serde::{Deserialize, Serialize};

use crate::data::AlignedSeriesPair;
use crate::error::{BacktestError, Phase};
use crate::stats::{self, OlsFit, RegressionForm};

/// Spread standard deviations at or below this fraction of the average leg A
/// price are rounding noise, not dispersion.
const SPREAD_STD_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Frozen output of calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationResult {
    pub hedge_ratio: f64,
    pub intercept: f64,
    pub spread_mean: f64,
    pub spread_std_dev: f64,
    /// Number of observations the statistics were computed over.
    pub window: usize,
}

impl CalibrationResult {
    /// `price_a − hedge_ratio·price_b − intercept`.
    pub fn spread(&self, price_a: f64, price_b: f64) -> f64 {
        price_a - self.hedge_ratio * price_b - self.intercept
    }

    /// Standard deviations the current spread lies from the training mean.
    ///
    /// `spread_std_dev` is guaranteed non-zero by `calibrate`.
    pub fn zscore(&self, price_a: f64, price_b: f64) -> f64 {
        (self.spread(price_a, price_b) - self.spread_mean) / self.spread_std_dev
    }
}

/// Calibrate on the first `training_period` observations of `aligned`.
pub fn calibrate(
    aligned: &AlignedSeriesPair,
    training_period: usize,
    form: RegressionForm,
) -> Result<CalibrationResult, BacktestError> {
    aligned.require_len(training_period, Phase::Calibration)?;
    let (a, b) = aligned.training_window(training_period);
    calibrate_window(aligned.symbol_a(), aligned.symbol_b(), a, b, form)
}

/// Calibrate on an explicit window. `a` is the dependent leg, `b` the independent.
pub fn calibrate_window(
    symbol_a: &str,
    symbol_b: &str,
    a: &[f64],
    b: &[f64],
    form: RegressionForm,
) -> Result<CalibrationResult, BacktestError> {
    let OlsFit { slope, intercept } =
        stats::fit(b, a, form).map_err(|source| BacktestError::DegenerateRegression {
            dependent: symbol_a.to_string(),
            independent: symbol_b.to_string(),
            source,
        })?;

    let spread: Vec<f64> = a
        .iter()
        .zip(b)
        .map(|(&pa, &pb)| pa - slope * pb - intercept)
        .collect();
    let spread_mean = stats::mean(&spread);
    let spread_std_dev = stats::population_std_dev(&spread);

    let scale = stats::mean(a).abs().max(1.0);
    if !spread_std_dev.is_finite() || spread_std_dev <= SPREAD_STD_RELATIVE_TOLERANCE * scale {
        return Err(BacktestError::DegenerateCalibration {
            symbol_a: symbol_a.to_string(),
            symbol_b: symbol_b.to_string(),
            window: a.len(),
            std_dev: spread_std_dev,
        });
    }

    Ok(CalibrationResult {
        hedge_ratio: slope,
        intercept,
        spread_mean,
        spread_std_dev,
        window: a.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::align_pair;
    use crate::domain::PriceSeries;
    use chrono::NaiveDate;

    fn pair(a: &[f64], b: &[f64]) -> AlignedSeriesPair {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dates = (0..a.len()).map(|i| start + chrono::Duration::days(i as i64));
        let sa = PriceSeries::from_pairs("A", dates.clone().zip(a.iter().copied()));
        let sb = PriceSeries::from_pairs("B", dates.zip(b.iter().copied()));
        align_pair(&sa, &sb)
    }

    #[test]
    fn spread_stats_are_population_moments() {
        let a = [10.0, 12.0, 11.0, 13.0, 12.5, 11.5];
        let b = [5.0, 5.5, 5.4, 6.1, 6.0, 5.6];
        let cal = calibrate(&pair(&a, &b), 6, RegressionForm::NoIntercept).unwrap();

        let spread: Vec<f64> = a
            .iter()
            .zip(&b)
            .map(|(pa, pb)| pa - cal.hedge_ratio * pb - cal.intercept)
            .collect();
        let n = spread.len() as f64;
        let mean = spread.iter().sum::<f64>() / n;
        let var = spread.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        assert!((cal.spread_mean - mean).abs() < 1e-12);
        assert!((cal.spread_std_dev - var.sqrt()).abs() < 1e-12);
        assert_eq!(cal.intercept, 0.0);
        assert_eq!(cal.window, 6);
    }

    #[test]
    fn only_training_window_is_used() {
        let a = [10.0, 12.0, 11.0, 13.0, 1000.0];
        let b = [5.0, 5.5, 5.4, 6.1, 1.0];
        let full = pair(&a, &b);
        let head = pair(&a[..4], &b[..4]);
        let cal_full = calibrate(&full, 4, RegressionForm::WithIntercept).unwrap();
        let cal_head = calibrate(&head, 4, RegressionForm::WithIntercept).unwrap();
        assert_eq!(cal_full, cal_head);
    }

    #[test]
    fn perfect_fit_is_degenerate() {
        // a = 2b exactly: the no-intercept spread is identically zero.
        let b = [1.0, 2.0, 3.0, 4.0];
        let a = [2.0, 4.0, 6.0, 8.0];
        let err = calibrate(&pair(&a, &b), 4, RegressionForm::NoIntercept).unwrap_err();
        assert!(matches!(err, BacktestError::DegenerateCalibration { window: 4, .. }));
    }

    #[test]
    fn constant_leg_b_is_degenerate_regression_with_intercept() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 4.0, 4.0];
        let err = calibrate(&pair(&a, &b), 3, RegressionForm::WithIntercept).unwrap_err();
        match err {
            BacktestError::DegenerateRegression {
                dependent,
                independent,
                ..
            } => {
                assert_eq!(dependent, "A");
                assert_eq!(independent, "B");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_series_is_insufficient() {
        let err = calibrate(&pair(&[1.0, 2.0], &[1.0, 3.0]), 5, RegressionForm::NoIntercept)
            .unwrap_err();
        assert!(matches!(
            err,
            BacktestError::InsufficientData {
                available: 2,
                required: 5,
                phase: Phase::Calibration,
                ..
            }
        ));
    }

    #[test]
    fn zscore_against_frozen_stats() {
        let cal = CalibrationResult {
            hedge_ratio: 2.0,
            intercept: 1.0,
            spread_mean: 0.5,
            spread_std_dev: 0.25,
            window: 10,
        };
        // spread = 10 - 2*4 - 1 = 1.0; z = (1.0 - 0.5)/0.25 = 2.0
        assert_eq!(cal.spread(10.0, 4.0), 1.0);
        assert_eq!(cal.zscore(10.0, 4.0), 2.0);
    }
}
