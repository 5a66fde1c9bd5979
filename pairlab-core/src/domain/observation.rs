//! Observation and PriceSeries: the raw market data units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single dated price for one instrument.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// A price is usable when it is finite and strictly positive; anything else
    /// makes the simple return undefined.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// One instrument's raw observation sequence, as supplied by a market-data provider.
///
/// Order and date coverage are not guaranteed here; the aligner sorts and
/// intersects two series before anything downstream reads them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub observations: Vec<Observation>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, observations: Vec<Observation>) -> Self {
        Self {
            symbol: symbol.into(),
            observations,
        }
    }

    /// Build a series from `(date, price)` pairs.
    pub fn from_pairs(
        symbol: impl Into<String>,
        pairs: impl IntoIterator<Item = (NaiveDate, f64)>,
    ) -> Self {
        Self::new(
            symbol,
            pairs
                .into_iter()
                .map(|(date, price)| Observation::new(date, price))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Date → price mapping. A repeated date keeps its last observation.
    pub fn to_map(&self) -> BTreeMap<NaiveDate, f64> {
        self.observations
            .iter()
            .map(|obs| (obs.date, obs.price))
            .collect()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).min()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.iter().map(|o| o.date).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn observation_validity() {
        assert!(Observation::new(d(2), 10.0).is_valid());
        assert!(!Observation::new(d(2), 0.0).is_valid());
        assert!(!Observation::new(d(2), -1.0).is_valid());
        assert!(!Observation::new(d(2), f64::NAN).is_valid());
        assert!(!Observation::new(d(2), f64::INFINITY).is_valid());
    }

    #[test]
    fn to_map_keeps_last_duplicate() {
        let series = PriceSeries::from_pairs("XOM", [(d(2), 10.0), (d(3), 11.0), (d(2), 12.0)]);
        let map = series.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&d(2)], 12.0);
    }

    #[test]
    fn date_bounds_ignore_input_order() {
        let series = PriceSeries::from_pairs("XOM", [(d(5), 1.0), (d(2), 1.0), (d(9), 1.0)]);
        assert_eq!(series.first_date(), Some(d(2)));
        assert_eq!(series.last_date(), Some(d(9)));
        assert!(PriceSeries::new("CVX", vec![]).first_date().is_none());
    }
}
