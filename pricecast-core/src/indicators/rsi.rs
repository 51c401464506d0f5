//! Relative Strength Index (RSI).
//!
//! Simple rolling averages over the last `period` percentage returns:
//! gain = mean(max(r, 0)), loss = mean(max(-r, 0)),
//! RSI = 100 - 100 / (1 + gain / loss).
//! Lookback: period (one return needs two closes).
//! Sentinels: loss == 0 with gain > 0 → 100; gain == loss == 0 → 50.

use super::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, closes: &[f64]) -> Vec<f64> {
        let n = closes.len();
        let mut result = vec![f64::NAN; n];
        if n < self.period + 1 {
            return result;
        }

        // returns[i] is the return into close i; returns[0] is undefined
        let mut returns = vec![f64::NAN; n];
        for i in 1..n {
            returns[i] = closes[i] / closes[i - 1] - 1.0;
        }

        for i in self.period..n {
            let window = &returns[(i + 1 - self.period)..=i];
            if window.iter().any(|r| r.is_nan()) {
                continue;
            }
            let gain = window.iter().map(|&r| r.max(0.0)).sum::<f64>() / self.period as f64;
            let loss = window.iter().map(|&r| (-r).max(0.0)).sum::<f64>() / self.period as f64;
            result[i] = rsi_from_averages(gain, loss);
        }

        result
    }
}

/// RSI from average gain and average loss, with the zero-loss sentinels.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
