//! Chart data derived from a path ensemble.
//!
//! Rendering lives outside this crate; these types carry exactly what a
//! fan chart and a return histogram need.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::simulation::PathEnsemble;
use crate::stats::{percentile_sorted, sorted};

/// Percentile levels drawn in the fan chart.
pub const FAN_PERCENTILES: [f64; 5] = [5.0, 25.0, 50.0, 75.0, 95.0];

/// Default histogram resolution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

/// Cross-sectional percentiles at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FanPoint {
    pub step: usize,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

/// Percentile bands over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileFan {
    pub points: Vec<FanPoint>,
}

impl PercentileFan {
    /// Bands at every `stride`-th step. The final step is always included.
    pub fn from_ensemble(ensemble: &PathEnsemble, stride: usize) -> Self {
        let stride = stride.max(1);
        let last = ensemble.step_count();
        let mut steps: Vec<usize> = (0..=last).step_by(stride).collect();
        if steps.last() != Some(&last) {
            steps.push(last);
        }

        let points = steps
            .par_iter()
            .map(|&step| {
                let s = sorted(&ensemble.step_prices(step));
                let [p5, p25, p50, p75, p95] = FAN_PERCENTILES.map(|p| percentile_sorted(&s, p));
                FanPoint {
                    step,
                    p5,
                    p25,
                    p50,
                    p75,
                    p95,
                }
            })
            .collect();

        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of terminal total return %.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnHistogram {
    pub bins: Vec<HistogramBin>,
}

impl ReturnHistogram {
    pub fn from_ensemble(ensemble: &PathEnsemble, bin_count: usize) -> Self {
        let current = ensemble.initial_price();
        let returns: Vec<f64> = ensemble
            .terminal_prices()
            .iter()
            .map(|p| (p / current - 1.0) * 100.0)
            .collect();
        Self::from_values(&returns, bin_count)
    }

    /// Bins span [min, max]; the maximum lands in the last bin.
    pub fn from_values(values: &[f64], bin_count: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bin_count == 0 {
            return Self { bins: Vec::new() };
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if max == min {
            return Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: finite.len(),
                }],
            };
        }

        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for v in finite {
            let idx = (((v - min) / width) as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
