//! Correlation of a stock's returns with each macro benchmark.
//!
//! Returns are aligned on the intersection of their dates. A benchmark with
//! fewer than `MIN_OBSERVATIONS` returns, or fewer than `MIN_OBSERVATIONS`
//! aligned non-NaN pairs, gets an explicit 0.0. So does any NaN coefficient.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{MacroBenchmark, MacroSeries, ReturnSeries};
use crate::stats::pearson;

/// Minimum aligned observations for a non-degenerate correlation.
pub const MIN_OBSERVATIONS: usize = 30;

/// Correlation per benchmark. Every benchmark key is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationSet {
    values: BTreeMap<MacroBenchmark, f64>,
}

impl Default for CorrelationSet {
    fn default() -> Self {
        Self {
            values: MacroBenchmark::ALL.iter().map(|&b| (b, 0.0)).collect(),
        }
    }
}

impl CorrelationSet {
    pub fn get(&self, benchmark: MacroBenchmark) -> f64 {
        self.values.get(&benchmark).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, benchmark: MacroBenchmark, value: f64) {
        self.values.insert(benchmark, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (MacroBenchmark, f64)> + '_ {
        self.values.iter().map(|(&b, &v)| (b, v))
    }
}

/// Correlate `stock` against every benchmark.
///
/// Benchmarks missing from `macros` default to 0.0.
pub fn estimate_correlations(
    stock: &ReturnSeries,
    macros: &HashMap<MacroBenchmark, MacroSeries>,
) -> CorrelationSet {
    let mut set = CorrelationSet::default();
    if macros.is_empty() {
        debug!("no macro data available, all correlations default to 0.0");
        return set;
    }

    for benchmark in MacroBenchmark::ALL {
        if let Some(series) = macros.get(&benchmark) {
            set.set(benchmark, correlate(stock, &series.returns, benchmark));
        }
    }
    set
}

/// Pearson correlation of two dated return series after date alignment.
pub fn correlate(stock: &ReturnSeries, benchmark: &ReturnSeries, label: MacroBenchmark) -> f64 {
    if benchmark.len() < MIN_OBSERVATIONS {
        debug!(
            benchmark = %label,
            observations = benchmark.len(),
            "benchmark history too short, correlation set to 0.0"
        );
        return 0.0;
    }

    let lookup: HashMap<NaiveDate, f64> = benchmark.iter().collect();
    let (xs, ys): (Vec<f64>, Vec<f64>) = stock
        .iter()
        .filter_map(|(date, x)| lookup.get(&date).map(|&y| (x, y)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .unzip();

    if xs.len() < MIN_OBSERVATIONS {
        debug!(
            benchmark = %label,
            aligned = xs.len(),
            "too few aligned observations, correlation set to 0.0"
        );
        return 0.0;
    }

    let r = pearson(&xs, &ys);
    if r.is_nan() {
        warn!(benchmark = %label, "correlation is NaN (zero variance), set to 0.0");
        return 0.0;
    }
    r.clamp(-1.0, 1.0)
}
