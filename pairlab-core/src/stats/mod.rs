//! Descriptive statistics and regression.
//!
//! All dispersion measures here are population statistics (divide by N).

pub mod ols;

pub use ols::{fit, OlsFit, RegressionError, RegressionForm};

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance (divides by N, not N−1). Returns 0.0 for an empty slice.
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
pub fn population_std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0]), 2.5);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn population_not_sample() {
        // Population variance of [2,4,4,4,5,5,7,9] is exactly 4; sample would be 32/7.
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_variance(&v), 4.0);
        assert_eq!(population_std_dev(&v), 2.0);
    }

    #[test]
    fn constant_series_has_zero_dispersion() {
        assert_eq!(population_std_dev(&[3.0, 3.0, 3.0]), 0.0);
        assert_eq!(population_std_dev(&[]), 0.0);
    }
}
