//! Two-instrument time alignment.
//!
//! Given raw observations for both legs of a pair, keep only the dates both
//! instruments traded on. Unlike a union-with-gaps alignment, no missing price
//! is ever fabricated: a date absent from either leg is dropped entirely.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::PriceSeries;
use crate::error::{BacktestError, Phase};

/// Price columns for both legs on their shared, ascending date axis.
///
/// Invariant: `dates`, `a`, and `b` have equal length and `a[i]`, `b[i]` were
/// observed on `dates[i]`. Fields are private so the invariant cannot be broken
/// after alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeriesPair {
    symbol_a: String,
    symbol_b: String,
    dates: Vec<NaiveDate>,
    a: Vec<f64>,
    b: Vec<f64>,
}

impl AlignedSeriesPair {
    pub fn symbol_a(&self) -> &str {
        &self.symbol_a
    }

    pub fn symbol_b(&self) -> &str {
        &self.symbol_b
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Leg A prices (the regression's dependent series).
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Leg B prices (the regression's independent series).
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Fail with `InsufficientData` unless at least `required` aligned
    /// observations are available. Never truncates.
    pub fn require_len(&self, required: usize, phase: Phase) -> Result<(), BacktestError> {
        if self.len() < required {
            return Err(BacktestError::InsufficientData {
                symbol_a: self.symbol_a.clone(),
                symbol_b: self.symbol_b.clone(),
                phase,
                available: self.len(),
                required,
            });
        }
        Ok(())
    }

    /// The first `n` observations of each leg, as `(a, b)`.
    ///
    /// Callers must check `require_len(n, ..)` first.
    pub fn training_window(&self, n: usize) -> (&[f64], &[f64]) {
        (&self.a[..n], &self.b[..n])
    }
}

/// Align two instruments on the sorted intersection of their trading dates.
pub fn align_pair(series_a: &PriceSeries, series_b: &PriceSeries) -> AlignedSeriesPair {
    align_price_maps(
        &series_a.symbol,
        &series_a.to_map(),
        &series_b.symbol,
        &series_b.to_map(),
    )
}

/// Align two date → price mappings on the intersection of their keys.
pub fn align_price_maps(
    symbol_a: &str,
    prices_a: &BTreeMap<NaiveDate, f64>,
    symbol_b: &str,
    prices_b: &BTreeMap<NaiveDate, f64>,
) -> AlignedSeriesPair {
    let capacity = prices_a.len().min(prices_b.len());
    let mut dates = Vec::with_capacity(capacity);
    let mut a = Vec::with_capacity(capacity);
    let mut b = Vec::with_capacity(capacity);

    // BTreeMap iteration is ascending, so the output is sorted by construction.
    for (date, &price_a) in prices_a {
        if let Some(&price_b) = prices_b.get(date) {
            dates.push(*date);
            a.push(price_a);
            b.push(price_b);
        }
    }

    AlignedSeriesPair {
        symbol_a: symbol_a.to_string(),
        symbol_b: symbol_b.to_string(),
        dates,
        a,
        b,
    }
}
