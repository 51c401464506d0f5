//! Bar: one daily observation of an instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily close/high/low/volume for a single instrument on a single date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(date: NaiveDate, close: f64, high: f64, low: f64, volume: u64) -> Self {
        Self {
            date,
            close,
            high,
            low,
            volume,
        }
    }

    /// All price fields are finite and strictly positive.
    pub fn has_valid_prices(&self) -> bool {
        [self.close, self.high, self.low]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> Bar {
        Bar::new(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            103.0,
            105.0,
            98.0,
            50_000,
        )
    }

    #[test]
    fn bar_with_positive_prices_is_valid() {
        assert!(sample_bar().has_valid_prices());
    }

    #[test]
    fn bar_detects_nan_close() {
        let mut bar = sample_bar();
        bar.close = f64::NAN;
        assert!(!bar.has_valid_prices());
    }

    #[test]
    fn bar_detects_zero_low() {
        let mut bar = sample_bar();
        bar.low = 0.0;
        assert!(!bar.has_valid_prices());
    }

    #[test]
    fn bar_serialization_roundtrip() {
        let bar = sample_bar();
        let json = serde_json::to_string(&bar).unwrap();
        let deser: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(bar, deser);
    }
}
