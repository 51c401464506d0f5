//! Price and return series.
//!
//! A `PriceSeries` is validated on construction: dates strictly increasing and
//! every price field finite and positive. Returns are derived from it and are
//! keyed by the date of the later close.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::bar::Bar;
use crate::stats::{mean, sample_std};

/// Validation failures for series construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("{symbol}: dates not strictly increasing at {date} (previous {previous})")]
    NonIncreasingDates {
        symbol: String,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("{symbol}: invalid price on {date} (close={close}, high={high}, low={low})")]
    InvalidPrice {
        symbol: String,
        date: NaiveDate,
        close: f64,
        high: f64,
        low: f64,
    },
}

/// Date-ordered bars for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, SeriesError> {
        let symbol = symbol.into();

        for bar in &bars {
            if !bar.has_valid_prices() {
                return Err(SeriesError::InvalidPrice {
                    symbol,
                    date: bar.date,
                    close: bar.close,
                    high: bar.high,
                    low: bar.low,
                });
            }
        }

        for pair in bars.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::NonIncreasingDates {
                    symbol,
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }

        Ok(Self { symbol, bars })
    }

    /// Build a series from closes on consecutive calendar days (high = low = close).
    pub fn from_closes(
        symbol: impl Into<String>,
        start: NaiveDate,
        closes: &[f64],
    ) -> Result<Self, SeriesError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::new(start + chrono::Duration::days(i as i64), close, close, close, 0)
            })
            .collect();
        Self::new(symbol, bars)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn latest_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Simple returns between consecutive closes. One element shorter than the series.
    pub fn returns(&self) -> ReturnSeries {
        let (dates, values) = self
            .bars
            .windows(2)
            .map(|pair| (pair[1].date, pair[1].close / pair[0].close - 1.0))
            .unzip();
        ReturnSeries { dates, values }
    }
}

/// Dated simple returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Undated returns on consecutive calendar days starting at `start`.
    pub fn from_values(start: NaiveDate, values: Vec<f64>) -> Self {
        let dates = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        Self { dates, values }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    pub fn mean(&self) -> f64 {
        mean(&self.values)
    }

    pub fn sample_std(&self) -> f64 {
        sample_std(&self.values)
    }
}
