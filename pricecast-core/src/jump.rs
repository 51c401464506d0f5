//! Jump-risk estimation from historical returns.
//!
//! Method of moments: returns beyond `JUMP_SIGMA_MULTIPLE` sample standard
//! deviations are treated as jumps. Their annualized count is the intensity;
//! their sample mean and standard deviation parameterize the jump size.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ReturnSeries;
use crate::stats::{mean, sample_std};
use crate::TRADING_DAYS_PER_YEAR;

/// Outlier threshold in standard deviations.
pub const JUMP_SIGMA_MULTIPLE: f64 = 3.0;

/// Fewer outliers than this disables the jump overlay.
pub const MIN_JUMP_EVENTS: usize = 5;

/// Jump process parameters. All zero means "no jump overlay".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct JumpParameters {
    /// Expected jumps per year.
    pub intensity: f64,
    pub mean_size: f64,
    pub size_volatility: f64,
}

impl JumpParameters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.intensity > 0.0
    }
}

/// Estimate jump parameters from a return series.
pub fn estimate_jumps(returns: &ReturnSeries) -> JumpParameters {
    estimate_jumps_from_values(returns.values())
}

pub fn estimate_jumps_from_values(returns: &[f64]) -> JumpParameters {
    let threshold = JUMP_SIGMA_MULTIPLE * sample_std(returns);
    let outliers: Vec<f64> = returns
        .iter()
        .copied()
        .filter(|r| r.abs() > threshold)
        .collect();

    if outliers.len() < MIN_JUMP_EVENTS {
        debug!(
            outliers = outliers.len(),
            "too few jump events, jump overlay disabled"
        );
        return JumpParameters::none();
    }

    let years = returns.len() as f64 / TRADING_DAYS_PER_YEAR;
    let params = JumpParameters {
        intensity: outliers.len() as f64 / years,
        mean_size: mean(&outliers),
        size_volatility: sample_std(&outliers),
    };
    debug!(
        events = outliers.len(),
        intensity = params.intensity,
        mean_size = params.mean_size,
        size_volatility = params.size_volatility,
        "jump parameters estimated"
    );
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::assert_approx;

    /// Small alternating returns with `shocks` planted at regular intervals.
    fn returns_with_shocks(n: usize, shocks: &[f64]) -> Vec<f64> {
        let mut r: Vec<f64> = (0..n)
            .map(|i| if i % 2 == 0 { 0.001 } else { -0.001 })
            .collect();
        let spacing = n / (shocks.len() + 1);
        for (k, &s) in shocks.iter().enumerate() {
            r[(k + 1) * spacing] = s;
        }
        r
    }

    #[test]
    fn four_outliers_disable_the_overlay() {
        let r = returns_with_shocks(1000, &[0.15, -0.15, 0.12, -0.2]);
        let params = estimate_jumps_from_values(&r);
        assert_eq!(params, JumpParameters::none());
        assert!(!params.is_active());
    }

    #[test]
    fn five_outliers_estimate_moments() {
        let shocks = [0.15, -0.15, 0.12, -0.2, 0.18];
        let r = returns_with_shocks(1008, &shocks);
        let params = estimate_jumps_from_values(&r);

        // 5 events over 1008 / 252 = 4 years
        assert_approx(params.intensity, 1.25, 1e-12);
        assert_approx(params.mean_size, mean(&shocks), 1e-12);
        assert_approx(params.size_volatility, sample_std(&shocks), 1e-12);
        assert!(params.is_active());
    }

    #[test]
    fn calm_series_has_no_jumps() {
        let r: Vec<f64> = (0..500).map(|i| ((i as f64) * 0.37).sin() * 0.01).collect();
        assert_eq!(estimate_jumps_from_values(&r), JumpParameters::none());
    }

    #[test]
    fn empty_series_has_no_jumps() {
        assert_eq!(estimate_jumps_from_values(&[]), JumpParameters::none());
    }
}
