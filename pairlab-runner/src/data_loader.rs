//! Price loading for the runner.
//!
//! Reads one instrument's history from a headered CSV file:
//! 1. Date column: first header named `date`, `time`, or `timestamp`
//! 2. Price column: `adj_close` if present, else `close`, else `price`
//! 3. Rows with an unparseable date or a non-finite / non-positive price are
//!    skipped with a warning
//! 4. Repeated dates keep the last row
//!
//! The output series is sorted by date. A BLAKE3 hash over both legs
//! fingerprints the dataset a run saw.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use tracing::{debug, warn};

use pairlab_core::domain::{Observation, PriceSeries};

use crate::config::PairConfig;

const DATE_COLUMNS: [&str; 3] = ["date", "time", "timestamp"];
const PRICE_COLUMNS: [&str; 3] = ["adj_close", "close", "price"];

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: no date column (expected one of date, time, timestamp)", path.display())]
    MissingDateColumn { path: PathBuf },

    #[error("{}: no price column (expected one of adj_close, close, price)", path.display())]
    MissingPriceColumn { path: PathBuf },

    #[error("{}: no usable rows for '{symbol}'", path.display())]
    NoRows { path: PathBuf, symbol: String },
}

/// Both legs of a pair plus the fingerprint of the data.
#[derive(Debug, Clone)]
pub struct LoadedPair {
    pub series_a: PriceSeries,
    pub series_b: PriceSeries,
    /// BLAKE3 over both series; see [`dataset_hash`].
    pub dataset_hash: String,
}

/// Load both legs named in a pair config.
pub fn load_pair(pair: &PairConfig) -> Result<LoadedPair, LoadError> {
    let series_a = load_price_csv(&pair.path_a, &pair.symbol_a)?;
    let series_b = load_price_csv(&pair.path_b, &pair.symbol_b)?;
    let dataset_hash = dataset_hash(&series_a, &series_b);
    Ok(LoadedPair {
        series_a,
        series_b,
        dataset_hash,
    })
}

/// Load one instrument's price history from a CSV file.
pub fn load_price_csv(path: &Path, symbol: &str) -> Result<PriceSeries, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_price_csv(file, path, symbol)
}

/// Parse price CSV from any reader. `path` labels errors and log lines.
pub fn read_price_csv<R: Read>(
    reader: R,
    path: &Path,
    symbol: &str,
) -> Result<PriceSeries, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect();
    let date_idx = find_column(&headers, &DATE_COLUMNS).ok_or_else(|| {
        LoadError::MissingDateColumn {
            path: path.to_path_buf(),
        }
    })?;
    let price_idx = find_column(&headers, &PRICE_COLUMNS).ok_or_else(|| {
        LoadError::MissingPriceColumn {
            path: path.to_path_buf(),
        }
    })?;
    debug!(
        symbol,
        date_column = %headers[date_idx],
        price_column = %headers[price_idx],
        "reading price CSV"
    );

    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut skipped = 0usize;
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(csv_err)?;
        // Header is line 1.
        let line = row + 2;

        let Some(date) = record.get(date_idx).and_then(parse_date) else {
            warn!(symbol, line, value = record.get(date_idx).unwrap_or(""), "skipping row: bad date");
            skipped += 1;
            continue;
        };
        let price = match record.get(price_idx).map(str::parse::<f64>) {
            Some(Ok(p)) if p.is_finite() && p > 0.0 => p,
            _ => {
                warn!(symbol, line, %date, value = record.get(price_idx).unwrap_or(""), "skipping row: bad price");
                skipped += 1;
                continue;
            }
        };

        if let Some(previous) = by_date.insert(date, price) {
            warn!(symbol, %date, previous, kept = price, "duplicate date, keeping last row");
        }
    }

    if by_date.is_empty() {
        return Err(LoadError::NoRows {
            path: path.to_path_buf(),
            symbol: symbol.to_string(),
        });
    }
    debug!(symbol, rows = by_date.len(), skipped, "loaded prices");

    Ok(PriceSeries::new(
        symbol,
        by_date
            .into_iter()
            .map(|(date, price)| Observation::new(date, price))
            .collect(),
    ))
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h == name))
}

/// Accepts `YYYY-MM-DD`, `YYYYMMDD`, or any value whose first ten characters
/// are `YYYY-MM-DD` (timestamps with a time part or offset).
fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(d);
    }
    if value.len() == 8 {
        if let Ok(d) = NaiveDate::parse_from_str(value, "%Y%m%d") {
            return Some(d);
        }
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.date());
    }
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Deterministic BLAKE3 hash over both legs.
///
/// Covers symbols, dates, and exact price bit patterns in leg order, so any
/// change to the inputs of a run changes the hash.
pub fn dataset_hash(series_a: &PriceSeries, series_b: &PriceSeries) -> String {
    let mut hasher = blake3::Hasher::new();
    for series in [series_a, series_b] {
        hasher.update(series.symbol.as_bytes());
        hasher.update(&(series.len() as u64).to_le_bytes());
        for obs in &series.observations {
            hasher.update(obs.date.to_string().as_bytes());
            hasher.update(&obs.price.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}
