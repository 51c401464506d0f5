//! Price history loading.
//!
//! A `DataProvider` turns a symbol and an optional date window into a
//! validated `PriceSeries`. Two providers ship with the runner:
//! 1. `CsvProvider` reads `{dir}/{SYMBOL}.csv` with a `date,open,high,low,close,volume` header
//! 2. `SyntheticProvider` generates a seeded random walk (developer-only, tagged)
//!
//! Results produced on synthetic data are flagged in the report.

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use pricecast_core::domain::{Bar, PriceSeries, SeriesError};

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data file for '{symbol}' at {}", path.display())]
    NotFound { symbol: String, path: PathBuf },

    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("no usable rows for '{symbol}' in the requested range")]
    Empty { symbol: String },

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),
}

/// Source of daily price history.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Daily bars for `symbol`, restricted to `[start, end]` when given.
    fn fetch(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, DataError>;

    /// Whether this provider fabricates data.
    fn is_synthetic(&self) -> bool {
        false
    }
}

/// One CSV row. Unlisted columns (`open`, `adj_close`) are ignored; missing
/// high/low fall back to close.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    #[serde(default)]
    high: Option<f64>,
    #[serde(default)]
    low: Option<f64>,
    close: Option<f64>,
    #[serde(default)]
    volume: Option<f64>,
}

/// Reads `{dir}/{SYMBOL}.csv`.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.csv"))
    }
}

impl DataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, DataError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(DataError::NotFound {
                symbol: symbol.to_string(),
                path,
            });
        }

        let csv_err = |source| DataError::Csv {
            path: path.clone(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(csv_err)?;

        let mut bars = Vec::new();
        let mut dropped = 0usize;
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(csv_err)?;
            if start.is_some_and(|s| row.date < s) || end.is_some_and(|e| row.date > e) {
                continue;
            }
            // rows with a missing or non-positive close are holidays or bad prints
            let Some(close) = row.close.filter(|c| c.is_finite() && *c > 0.0) else {
                dropped += 1;
                continue;
            };
            let high = row.high.filter(|h| h.is_finite() && *h > 0.0).unwrap_or(close);
            let low = row.low.filter(|l| l.is_finite() && *l > 0.0).unwrap_or(close);
            let volume = row.volume.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0) as u64;
            bars.push(Bar::new(row.date, close, high, low, volume));
        }

        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
            });
        }
        bars.sort_by_key(|b| b.date);
        debug!(symbol, bars = bars.len(), dropped, "loaded CSV history");

        Ok(PriceSeries::new(symbol, bars)?)
    }
}

/// Seeded random walk on weekdays, starting at 100.0.
///
/// The walk is derived from the symbol alone, so repeated fetches agree.
#[derive(Debug, Clone)]
pub struct SyntheticProvider {
    default_start: NaiveDate,
    default_end: NaiveDate,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            default_start: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap_or(NaiveDate::MIN),
            default_end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or(NaiveDate::MAX),
        }
    }
}

impl SyntheticProvider {
    pub fn new(default_start: NaiveDate, default_end: NaiveDate) -> Self {
        Self {
            default_start,
            default_end,
        }
    }
}

impl DataProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<PriceSeries, DataError> {
        let start = start.unwrap_or(self.default_start);
        let end = end.unwrap_or(self.default_end);
        let bars = generate_synthetic_bars(symbol, start, end);
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
            });
        }
        Ok(PriceSeries::new(symbol, bars)?)
    }

    fn is_synthetic(&self) -> bool {
        true
    }
}

fn generate_synthetic_bars(symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut bars = Vec::new();
    let mut price = 100.0_f64;
    let mut current = start;

    while current <= end {
        let weekday = current.weekday();
        if weekday == chrono::Weekday::Sat || weekday == chrono::Weekday::Sun {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.02..0.021);
        let close = price * (1.0 + daily_return);
        let high = price.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = price.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64);
        bars.push(Bar::new(current, close, high, low, volume));

        price = close;
        current += chrono::Duration::days(1);
    }

    bars
}
