//! Ordinary least squares for the hedge ratio.
//!
//! Two forms are supported because both appear in practice:
//! - no intercept: `slope = Σxy / Σx²`, intercept fixed at 0
//! - with intercept: `slope = (nΣxy − ΣxΣy) / (nΣx² − (Σx)²)`,
//!   `intercept = (Σy − slope·Σx) / n`

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Relative tolerance below which the intercept-form denominator is treated
/// as zero. `nΣx² − (Σx)²` suffers cancellation when all x are (nearly) equal.
const DENOMINATOR_RELATIVE_TOLERANCE: f64 = 1e-12;

/// Which regression equation to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegressionForm {
    #[default]
    NoIntercept,
    WithIntercept,
}

impl RegressionForm {
    pub fn from_flag(with_intercept: bool) -> Self {
        if with_intercept {
            RegressionForm::WithIntercept
        } else {
            RegressionForm::NoIntercept
        }
    }

    pub fn has_intercept(&self) -> bool {
        matches!(self, RegressionForm::WithIntercept)
    }
}

impl fmt::Display for RegressionForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionForm::NoIntercept => write!(f, "no-intercept"),
            RegressionForm::WithIntercept => write!(f, "intercept"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("input lengths differ: x has {x}, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("no observations to fit")]
    Empty,

    #[error("zero denominator in {form} regression (independent series has no variation)")]
    ZeroDenominator { form: RegressionForm },
}

/// Fitted line `y ≈ slope·x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OlsFit {
    pub slope: f64,
    pub intercept: f64,
}

impl OlsFit {
    /// Residual `y − slope·x − intercept`.
    pub fn residual(&self, x: f64, y: f64) -> f64 {
        y - self.slope * x - self.intercept
    }
}

/// Regress `y` on `x` over every observation supplied.
pub fn fit(x: &[f64], y: &[f64], form: RegressionForm) -> Result<OlsFit, RegressionError> {
    if x.len() != y.len() {
        return Err(RegressionError::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(RegressionError::Empty);
    }

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_xx = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        sum_x += xi;
        sum_y += yi;
        sum_xy += xi * yi;
        sum_xx += xi * xi;
    }

    match form {
        RegressionForm::NoIntercept => {
            if sum_xx == 0.0 {
                return Err(RegressionError::ZeroDenominator { form });
            }
            Ok(OlsFit {
                slope: sum_xy / sum_xx,
                intercept: 0.0,
            })
        }
        RegressionForm::WithIntercept => {
            let n = x.len() as f64;
            let denom = n * sum_xx - sum_x * sum_x;
            if denom == 0.0 || denom.abs() <= DENOMINATOR_RELATIVE_TOLERANCE * n * sum_xx {
                return Err(RegressionError::ZeroDenominator { form });
            }
            let slope = (n * sum_xy - sum_x * sum_y) / denom;
            let intercept = (sum_y - slope * sum_x) / n;
            Ok(OlsFit { slope, intercept })
        }
    }
}
