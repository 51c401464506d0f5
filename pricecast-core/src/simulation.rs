//! Monte Carlo path simulation: geometric diffusion with a Bernoulli jump overlay.
//!
//! Per step and path:
//!   log_return = (mu - sigma^2 / 2) * dt + sigma * sqrt(dt) * z
//!   with probability intensity * dt, log_return += N(jump_mean, jump_vol)
//!   price[t] = price[t-1] * exp(log_return)
//!
//! The update is multiplicative, so prices stay strictly positive.
//!
//! Paths are split into fixed-size chunks. Each chunk owns an RNG seeded from
//! `(seed, stream, chunk_index)`, so the ensemble does not depend on the rayon
//! thread count or on scheduling order.

use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SimulationError;
use crate::jump::JumpParameters;
use crate::params::ModelParameters;
use crate::rng::RngHierarchy;
use crate::TRADING_DAYS_PER_YEAR;

/// Paths simulated by one RNG stream.
pub const CHUNK_PATHS: usize = 1024;

/// Simulation size and time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub path_count: usize,
    /// Number of steps after the initial price.
    pub horizon_days: usize,
    pub steps_per_year: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            path_count: 50_000,
            horizon_days: 504,
            steps_per_year: TRADING_DAYS_PER_YEAR,
            seed: 42,
        }
    }
}

impl SimulationConfig {
    pub fn dt(&self) -> f64 {
        1.0 / self.steps_per_year
    }

    pub fn horizon_years(&self) -> f64 {
        self.horizon_days as f64 / self.steps_per_year
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.path_count == 0 {
            return Err(SimulationError::InvalidPathCount);
        }
        if self.horizon_days == 0 {
            return Err(SimulationError::InvalidHorizon);
        }
        self.cell_count()?;
        if !(self.steps_per_year.is_finite() && self.steps_per_year > 0.0) {
            return Err(SimulationError::InvalidStepsPerYear(self.steps_per_year));
        }
        Ok(())
    }

    /// Number of prices in the ensemble, `path_count * (horizon_days + 1)`.
    pub fn cell_count(&self) -> Result<usize, SimulationError> {
        let too_large = SimulationError::EnsembleTooLarge {
            path_count: self.path_count,
            horizon_days: self.horizon_days,
        };
        let cells = self
            .horizon_days
            .checked_add(1)
            .and_then(|width| self.path_count.checked_mul(width))
            .ok_or_else(|| too_large.clone())?;
        // Vec<f64> is capped at isize::MAX bytes
        if cells > isize::MAX as usize / std::mem::size_of::<f64>() {
            return Err(too_large);
        }
        Ok(cells)
    }
}

/// Simulated prices, stored path-major: `prices[path * (steps + 1) + step]`.
///
/// Step 0 is the current price on every path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEnsemble {
    path_count: usize,
    steps: usize,
    prices: Vec<f64>,
}

impl PathEnsemble {
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Steps after the initial price (horizon in days).
    pub fn step_count(&self) -> usize {
        self.steps
    }

    fn width(&self) -> usize {
        self.steps + 1
    }

    pub fn initial_price(&self) -> f64 {
        self.prices[0]
    }

    /// One path, `step_count() + 1` prices long.
    pub fn path(&self, index: usize) -> &[f64] {
        let w = self.width();
        &self.prices[index * w..(index + 1) * w]
    }

    pub fn paths(&self) -> impl Iterator<Item = &[f64]> {
        self.prices.chunks_exact(self.width())
    }

    pub fn price_at(&self, step: usize, path: usize) -> f64 {
        self.prices[path * self.width() + step]
    }

    /// Prices across all paths at one step.
    pub fn step_prices(&self, step: usize) -> Vec<f64> {
        assert!(step <= self.steps, "step {step} beyond horizon {}", self.steps);
        self.paths().map(|p| p[step]).collect()
    }

    pub fn terminal_prices(&self) -> Vec<f64> {
        self.step_prices(self.steps)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.prices
    }
}

fn validate_inputs(
    current_price: f64,
    params: &ModelParameters,
    jumps: &JumpParameters,
) -> Result<(), SimulationError> {
    if !(current_price.is_finite() && current_price > 0.0) {
        return Err(SimulationError::InvalidPrice(current_price));
    }
    if !params.adjusted_drift.is_finite() {
        return Err(SimulationError::InvalidDrift(params.adjusted_drift));
    }
    let vol = params.adjusted_volatility;
    if !(vol.is_finite() && vol >= 0.0) {
        return Err(SimulationError::InvalidVolatility(vol));
    }
    let checks = [
        ("intensity", jumps.intensity, jumps.intensity >= 0.0),
        ("mean_size", jumps.mean_size, true),
        ("size_volatility", jumps.size_volatility, jumps.size_volatility >= 0.0),
    ];
    for (field, value, in_range) in checks {
        if !value.is_finite() || !in_range {
            return Err(SimulationError::InvalidJump { field, value });
        }
    }
    Ok(())
}

/// Simulate `config.path_count` price paths from `current_price`.
///
/// `stream` selects the random stream (see `SeedPolicy::stream_for`).
pub fn simulate_paths(
    current_price: f64,
    params: &ModelParameters,
    jumps: &JumpParameters,
    config: &SimulationConfig,
    stream: &str,
) -> Result<PathEnsemble, SimulationError> {
    config.validate()?;
    validate_inputs(current_price, params, jumps)?;

    let dt = config.dt();
    let mu = params.adjusted_drift;
    let sigma = params.adjusted_volatility;
    let drift_term = (mu - 0.5 * sigma * sigma) * dt;
    let diffusion_term = sigma * dt.sqrt();

    let jump_overlay = if jumps.is_active() {
        let size = Normal::new(jumps.mean_size, jumps.size_volatility).map_err(|_| {
            SimulationError::InvalidJump {
                field: "size_volatility",
                value: jumps.size_volatility,
            }
        })?;
        Some(((jumps.intensity * dt).min(1.0), size))
    } else {
        None
    };

    debug!(
        paths = config.path_count,
        steps = config.horizon_days,
        drift = mu,
        volatility = sigma,
        jumps = jump_overlay.is_some(),
        "simulating price paths"
    );

    let width = config.horizon_days + 1;
    let mut prices = vec![0.0; config.cell_count()?];
    let hierarchy = RngHierarchy::new(config.seed);

    prices
        .par_chunks_mut(CHUNK_PATHS * width)
        .enumerate()
        .for_each(|(chunk, block)| {
            let mut rng = hierarchy.rng_for(stream, chunk as u64);
            for path in block.chunks_exact_mut(width) {
                path[0] = current_price;
                for t in 1..width {
                    let z: f64 = rng.sample(StandardNormal);
                    let mut log_return = drift_term + diffusion_term * z;
                    if let Some((probability, size)) = &jump_overlay {
                        if rng.gen_bool(*probability) {
                            log_return += size.sample(&mut rng);
                        }
                    }
                    path[t] = path[t - 1] * log_return.exp();
                }
            }
        });

    Ok(PathEnsemble {
        path_count: config.path_count,
        steps: config.horizon_days,
        prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{mean, sample_std};

    fn small_config(path_count: usize, horizon_days: usize) -> SimulationConfig {
        SimulationConfig {
            path_count,
            horizon_days,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn shape_and_initial_row() {
        let params = ModelParameters::unadjusted(0.05, 0.2);
        let ens = simulate_paths(50.0, &params, &JumpParameters::none(), &small_config(10, 5), "")
            .unwrap();
        assert_eq!(ens.path_count(), 10);
        assert_eq!(ens.step_count(), 5);
        assert_eq!(ens.as_slice().len(), 60);
        assert!(ens.step_prices(0).iter().all(|&p| p == 50.0));
        assert_eq!(ens.paths().count(), 10);
        assert_eq!(ens.path(3).len(), 6);
        assert_eq!(ens.price_at(5, 3), ens.path(3)[5]);
    }

    #[test]
    fn same_seed_same_ensemble() {
        let params = ModelParameters::unadjusted(0.05, 0.3);
        let jumps = JumpParameters {
            intensity: 4.0,
            mean_size: -0.05,
            size_volatility: 0.1,
        };
        let cfg = small_config(3000, 20);
        let a = simulate_paths(100.0, &params, &jumps, &cfg, "").unwrap();
        let b = simulate_paths(100.0, &params, &jumps, &cfg, "").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn thread_count_does_not_change_ensemble() {
        let params = ModelParameters::unadjusted(0.05, 0.3);
        let jumps = JumpParameters {
            intensity: 6.0,
            mean_size: -0.04,
            size_volatility: 0.08,
        };
        let cfg = small_config(CHUNK_PATHS * 4 + 17, 30);
        let run_on = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| simulate_paths(100.0, &params, &jumps, &cfg, "SPY").unwrap())
        };
        let single = run_on(1);
        let many = run_on(7);
        assert_eq!(single.path_count(), cfg.path_count);
        assert_eq!(single, many);
    }

    #[test]
    fn oversized_ensemble_is_rejected() {
        let params = ModelParameters::unadjusted(0.05, 0.2);
        let cfg = small_config(usize::MAX / 4, 504);
        assert!(matches!(
            cfg.validate(),
            Err(SimulationError::EnsembleTooLarge { .. })
        ));
        let err = simulate_paths(100.0, &params, &JumpParameters::none(), &cfg, "").unwrap_err();
        assert!(matches!(err, SimulationError::EnsembleTooLarge { .. }));

        let cfg = small_config(2, usize::MAX);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn different_streams_differ() {
        let params = ModelParameters::unadjusted(0.05, 0.3);
        let cfg = small_config(100, 10);
        let a = simulate_paths(100.0, &params, &JumpParameters::none(), &cfg, "AAPL").unwrap();
        let b = simulate_paths(100.0, &params, &JumpParameters::none(), &cfg, "MSFT").unwrap();
        assert_ne!(a.terminal_prices(), b.terminal_prices());
    }

    #[test]
    fn zero_volatility_is_deterministic_growth() {
        let params = ModelParameters::unadjusted(0.10, 0.0);
        let cfg = small_config(4, 252);
        let ens = simulate_paths(100.0, &params, &JumpParameters::none(), &cfg, "").unwrap();
        let expected = 100.0 * 0.10_f64.exp();
        for p in ens.terminal_prices() {
            assert!((p - expected).abs() < 1e-9, "terminal {p} vs {expected}");
        }
    }

    #[test]
    fn prices_strictly_positive_with_violent_jumps() {
        let params = ModelParameters::unadjusted(-0.5, 1.2);
        let jumps = JumpParameters {
            intensity: 50.0,
            mean_size: -0.3,
            size_volatility: 0.2,
        };
        let ens = simulate_paths(10.0, &params, &jumps, &small_config(500, 252), "").unwrap();
        assert!(ens.as_slice().iter().all(|&p| p > 0.0 && p.is_finite()));
    }

    #[test]
    fn jumps_shift_terminal_distribution() {
        let params = ModelParameters::unadjusted(0.0, 0.1);
        let cfg = small_config(4000, 252);
        let calm = simulate_paths(100.0, &params, &JumpParameters::none(), &cfg, "").unwrap();
        let crashy = JumpParameters {
            intensity: 10.0,
            mean_size: -0.05,
            size_volatility: 0.01,
        };
        let jumpy = simulate_paths(100.0, &params, &crashy, &cfg, "").unwrap();
        // ~10 jumps of -5% in log space over one year
        assert!(mean(&jumpy.terminal_prices()) < mean(&calm.terminal_prices()) * 0.75);
    }

    #[test]
    fn log_return_mean_matches_ito_drift() {
        let params = ModelParameters::unadjusted(0.08, 0.2);
        let cfg = small_config(20_000, 252);
        let ens = simulate_paths(100.0, &params, &JumpParameters::none(), &cfg, "").unwrap();
        let log_returns: Vec<f64> = ens
            .terminal_prices()
            .iter()
            .map(|p| (p / 100.0).ln())
            .collect();
        // expected 0.08 - 0.02 = 0.06 per year, standard error 0.2 / sqrt(20000)
        assert!((mean(&log_returns) - 0.06).abs() < 0.01);
        assert!((sample_std(&log_returns) - 0.2).abs() < 0.01);
    }

    #[test]
    fn rejects_invalid_inputs() {
        let params = ModelParameters::unadjusted(0.05, 0.2);
        let none = JumpParameters::none();
        let cfg = small_config(10, 10);

        assert_eq!(
            simulate_paths(0.0, &params, &none, &cfg, ""),
            Err(SimulationError::InvalidPrice(0.0))
        );
        assert_eq!(
            simulate_paths(-5.0, &params, &none, &cfg, ""),
            Err(SimulationError::InvalidPrice(-5.0))
        );
        assert_eq!(
            simulate_paths(10.0, &params, &none, &small_config(0, 10), ""),
            Err(SimulationError::InvalidPathCount)
        );
        assert_eq!(
            simulate_paths(10.0, &params, &none, &small_config(10, 0), ""),
            Err(SimulationError::InvalidHorizon)
        );
        let bad_vol = ModelParameters::unadjusted(0.05, -0.1);
        assert_eq!(
            simulate_paths(10.0, &bad_vol, &none, &cfg, ""),
            Err(SimulationError::InvalidVolatility(-0.1))
        );
        let bad_jump = JumpParameters {
            intensity: -1.0,
            mean_size: 0.0,
            size_volatility: 0.0,
        };
        assert!(matches!(
            simulate_paths(10.0, &params, &bad_jump, &cfg, ""),
            Err(SimulationError::InvalidJump { field: "intensity", .. })
        ));
    }

    #[test]
    fn horizon_years_for_default_config() {
        let cfg = SimulationConfig::default();
        assert_eq!(cfg.horizon_years(), 2.0);
        assert_eq!(cfg.dt(), 1.0 / 252.0);
    }
}
