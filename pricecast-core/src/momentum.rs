//! Momentum snapshot: the latest reading of every indicator the model uses.
//!
//! Each field falls back to a neutral constant when the history is too short
//! for its window: RSI 50, MACD 0, Bollinger position 0.5, MA momentum 0,
//! price-vs-MA 0.

use serde::{Deserialize, Serialize};

use crate::indicators::bollinger::band_position;
use crate::indicators::{Bollinger, Indicator, Macd, MacdLine, Rsi, Sma};

pub const NEUTRAL_RSI: f64 = 50.0;
pub const NEUTRAL_MACD: f64 = 0.0;
pub const NEUTRAL_BOLLINGER_POSITION: f64 = 0.5;
pub const NEUTRAL_RATIO: f64 = 0.0;

/// Indicator windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_width: f64,
    pub short_ma: usize,
    pub long_ma: usize,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_width: 2.0,
            short_ma: 50,
            long_ma: 200,
        }
    }
}

/// Point-in-time indicator values for one stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSnapshot {
    pub rsi: f64,
    /// MACD line (fast EMA - slow EMA).
    pub macd: f64,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_position: f64,
    /// (MA_short - MA_long) / MA_long
    pub ma_momentum: f64,
    pub price_vs_ma50: f64,
    pub price_vs_ma200: f64,
}

impl Default for MomentumSnapshot {
    fn default() -> Self {
        Self {
            rsi: NEUTRAL_RSI,
            macd: NEUTRAL_MACD,
            macd_signal: None,
            macd_histogram: None,
            bollinger_position: NEUTRAL_BOLLINGER_POSITION,
            ma_momentum: NEUTRAL_RATIO,
            price_vs_ma50: NEUTRAL_RATIO,
            price_vs_ma200: NEUTRAL_RATIO,
        }
    }
}

impl MomentumSnapshot {
    /// Compute the snapshot from a close series using the default windows.
    pub fn from_closes(closes: &[f64]) -> Self {
        Self::with_config(closes, &MomentumConfig::default())
    }

    pub fn with_config(closes: &[f64], config: &MomentumConfig) -> Self {
        let Some(&price) = closes.last() else {
            return Self::default();
        };

        let rsi = Rsi::new(config.rsi_period)
            .latest(closes)
            .unwrap_or(NEUTRAL_RSI);

        let macd_of = |line| {
            Macd::new(line, config.macd_fast, config.macd_slow, config.macd_signal).latest(closes)
        };
        let macd = macd_of(MacdLine::Macd).unwrap_or(NEUTRAL_MACD);
        let macd_signal = macd_of(MacdLine::Signal);
        let macd_histogram = macd_of(MacdLine::Histogram);

        let (period, width) = (config.bollinger_period, config.bollinger_width);
        let upper = Bollinger::upper(period, width).latest(closes);
        let lower = Bollinger::lower(period, width).latest(closes);
        let bollinger_position = match (lower, upper) {
            (Some(lo), Some(hi)) => band_position(price, lo, hi),
            _ => NEUTRAL_BOLLINGER_POSITION,
        };

        let ma_short = Sma::new(config.short_ma).latest(closes);
        let ma_long = Sma::new(config.long_ma).latest(closes);

        let ma_momentum = match (ma_short, ma_long) {
            (Some(short), Some(long)) => relative_gap(short, long),
            _ => NEUTRAL_RATIO,
        };

        Self {
            rsi,
            macd,
            macd_signal,
            macd_histogram,
            bollinger_position,
            ma_momentum,
            price_vs_ma50: ma_short.map_or(NEUTRAL_RATIO, |ma| relative_gap(price, ma)),
            price_vs_ma200: ma_long.map_or(NEUTRAL_RATIO, |ma| relative_gap(price, ma)),
        }
    }
}

/// (value - base) / base, with 0.0 when the base is exactly zero.
pub fn relative_gap(value: f64, base: f64) -> f64 {
    if base == 0.0 {
        return NEUTRAL_RATIO;
    }
    (value - base) / base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_approx, DEFAULT_EPSILON};

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.001_f64.powi(i as i32)).collect()
    }

    #[test]
    fn empty_history_is_neutral() {
        assert_eq!(MomentumSnapshot::from_closes(&[]), MomentumSnapshot::default());
    }

    #[test]
    fn short_history_falls_back_per_indicator() {
        // 30 closes: RSI, MACD and Bollinger are available; 50/200 MAs are not.
        let closes = rising(30);
        let snap = MomentumSnapshot::from_closes(&closes);
        assert_approx(snap.rsi, 100.0, 1e-9);
        assert!(snap.macd > 0.0);
        assert!(snap.macd_signal.is_none());
        assert!(snap.bollinger_position > 0.5);
        assert_eq!(snap.ma_momentum, NEUTRAL_RATIO);
        assert_eq!(snap.price_vs_ma50, NEUTRAL_RATIO);
        assert_eq!(snap.price_vs_ma200, NEUTRAL_RATIO);
    }

    #[test]
    fn long_uptrend_has_positive_ma_readings() {
        let closes = rising(260);
        let snap = MomentumSnapshot::from_closes(&closes);
        assert!(snap.ma_momentum > 0.0);
        assert!(snap.price_vs_ma50 > 0.0);
        assert!(snap.price_vs_ma200 > snap.price_vs_ma50);
        assert!(snap.macd_signal.is_some());
        assert!(snap.macd_histogram.is_some());
    }

    #[test]
    fn flat_history_is_neutral_everywhere() {
        let closes = vec![42.0; 250];
        let snap = MomentumSnapshot::from_closes(&closes);
        assert_approx(snap.rsi, 50.0, DEFAULT_EPSILON);
        assert_approx(snap.macd, 0.0, DEFAULT_EPSILON);
        assert_approx(snap.bollinger_position, 0.5, DEFAULT_EPSILON);
        assert_approx(snap.ma_momentum, 0.0, DEFAULT_EPSILON);
        assert_approx(snap.price_vs_ma200, 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn relative_gap_zero_base_sentinel() {
        assert_eq!(relative_gap(5.0, 0.0), 0.0);
        assert_approx(relative_gap(110.0, 100.0), 0.1, DEFAULT_EPSILON);
    }

    #[test]
    fn price_vs_ma_known_value() {
        // 49 closes at 100 then one at 150: MA50 = 101, price_vs_ma50 = 49/101
        let mut closes = vec![100.0; 49];
        closes.push(150.0);
        let snap = MomentumSnapshot::from_closes(&closes);
        assert_approx(snap.price_vs_ma50, 49.0 / 101.0, 1e-12);
    }
}
