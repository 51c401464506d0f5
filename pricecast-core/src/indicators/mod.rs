//! Series indicators over closing prices.
//!
//! Every indicator is a pure function of the close series and returns a
//! `Vec<f64>` of the same length. Values inside the warmup window are
//! `f64::NAN`; callers that need a single reading take the latest value and
//! substitute a neutral constant when it is NaN (see `momentum`).
//!
//! Multi-line indicators (Bollinger, MACD) are exposed as separate named
//! instances per line so the single-series `Indicator` trait stays unchanged.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdLine};
pub use rsi::Rsi;
pub use sma::Sma;

/// Trait for close-series indicators.
///
/// No output value at index t may depend on a close after t.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_50", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading values that are warmup (NaN).
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire close series.
    fn compute(&self, closes: &[f64]) -> Vec<f64>;

    /// Most recent value, or `None` while still warming up.
    fn latest(&self, closes: &[f64]) -> Option<f64> {
        self.compute(closes).last().copied().filter(|v| !v.is_nan())
    }
}
