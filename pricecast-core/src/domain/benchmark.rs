//! Macro benchmarks and their return series.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::series::ReturnSeries;

/// The fixed set of macro benchmarks a stock is correlated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacroBenchmark {
    VolatilityIndex,
    RateProxy,
    BroadMarket,
    CurrencyProxy,
    CommodityProxy,
}

impl MacroBenchmark {
    pub const ALL: [MacroBenchmark; 5] = [
        MacroBenchmark::VolatilityIndex,
        MacroBenchmark::RateProxy,
        MacroBenchmark::BroadMarket,
        MacroBenchmark::CurrencyProxy,
        MacroBenchmark::CommodityProxy,
    ];

    /// Stable key used in config files, logs and exports.
    pub fn key(self) -> &'static str {
        match self {
            MacroBenchmark::VolatilityIndex => "volatility_index",
            MacroBenchmark::RateProxy => "rate_proxy",
            MacroBenchmark::BroadMarket => "broad_market",
            MacroBenchmark::CurrencyProxy => "currency_proxy",
            MacroBenchmark::CommodityProxy => "commodity_proxy",
        }
    }
}

impl fmt::Display for MacroBenchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returns of one macro benchmark. Read-only once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroSeries {
    pub benchmark: MacroBenchmark,
    pub returns: ReturnSeries,
}

impl MacroSeries {
    pub fn new(benchmark: MacroBenchmark, returns: ReturnSeries) -> Self {
        Self { benchmark, returns }
    }
}
