//! Macro benchmark returns, loaded once per run and shared read-only.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use pricecast_core::domain::{MacroBenchmark, MacroSeries};

use crate::config::MacroSymbols;
use crate::data_loader::DataProvider;

/// Benchmark return series keyed by benchmark.
///
/// A benchmark whose data failed to load is absent, and the correlation
/// estimator treats it as 0.0.
#[derive(Debug, Clone, Default)]
pub struct MacroCache {
    series: HashMap<MacroBenchmark, MacroSeries>,
    failures: Vec<(MacroBenchmark, String)>,
}

impl MacroCache {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fetch every configured benchmark. Never fails: load errors are logged
    /// and recorded in `failures()`.
    pub fn load(
        provider: &dyn DataProvider,
        symbols: &MacroSymbols,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        let mut cache = Self::default();
        for (benchmark, symbol) in symbols.entries() {
            match provider.fetch(symbol, start, end) {
                Ok(prices) => {
                    let returns = prices.returns();
                    debug!(%benchmark, symbol, returns = returns.len(), "macro series loaded");
                    cache.insert(MacroSeries::new(benchmark, returns));
                }
                Err(e) => {
                    warn!(
                        %benchmark,
                        symbol,
                        error = %e,
                        "macro series unavailable, correlation defaults to 0.0"
                    );
                    cache.failures.push((benchmark, e.to_string()));
                }
            }
        }
        cache
    }

    pub fn insert(&mut self, series: MacroSeries) {
        self.series.insert(series.benchmark, series);
    }

    pub fn get(&self, benchmark: MacroBenchmark) -> Option<&MacroSeries> {
        self.series.get(&benchmark)
    }

    pub fn series(&self) -> &HashMap<MacroBenchmark, MacroSeries> {
        &self.series
    }

    pub fn failures(&self) -> &[(MacroBenchmark, String)] {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl FromIterator<MacroSeries> for MacroCache {
    fn from_iter<I: IntoIterator<Item = MacroSeries>>(iter: I) -> Self {
        let mut cache = Self::default();
        for series in iter {
            cache.insert(series);
        }
        cache
    }
}
