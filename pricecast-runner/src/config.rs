//! TOML forecast configuration.
//!
//! Every field has a default, so an empty file is a valid config. Example:
//!
//! ```toml
//! tickers = ["AAPL", "MSFT"]
//! parallel_tickers = false
//!
//! [simulation]
//! path_count = 50000
//! horizon_days = 504
//! seed = 42
//! seed_policy = "shared"
//!
//! [investment]
//! amount = 10000.0
//!
//! [data]
//! dir = "data"
//! start = "2019-01-01"
//! min_history = 50
//!
//! [macro]
//! volatility_index = "^VIX"
//! broad_market = "^GSPC"
//!
//! [weights]
//! rsi = 0.10
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pricecast_core::charts::DEFAULT_HISTOGRAM_BINS;
use pricecast_core::domain::MacroBenchmark;
use pricecast_core::params::AdjustmentWeights;
use pricecast_core::rng::SeedPolicy;
use pricecast_core::simulation::SimulationConfig;
use pricecast_core::TRADING_DAYS_PER_YEAR;

/// Errors from loading or validating a forecast config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Full configuration of one forecast run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub tickers: Vec<String>,
    /// Forecast tickers concurrently.
    pub parallel_tickers: bool,
    pub simulation: SimulationSection,
    pub investment: InvestmentSection,
    pub data: DataSection,
    #[serde(rename = "macro")]
    pub macros: MacroSymbols,
    pub weights: AdjustmentWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    pub path_count: usize,
    pub horizon_days: usize,
    pub seed: u64,
    pub seed_policy: SeedPolicy,
    /// Keep the full path ensemble in memory after reduction.
    pub retain_paths: bool,
    /// Fan chart resolution: one band every `fan_stride` steps.
    pub fan_stride: usize,
    pub histogram_bins: usize,
}

impl Default for SimulationSection {
    fn default() -> Self {
        let core = SimulationConfig::default();
        Self {
            path_count: core.path_count,
            horizon_days: core.horizon_days,
            seed: core.seed,
            seed_policy: SeedPolicy::default(),
            retain_paths: false,
            fan_stride: 1,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl SimulationSection {
    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            path_count: self.path_count,
            horizon_days: self.horizon_days,
            steps_per_year: TRADING_DAYS_PER_YEAR,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentSection {
    pub amount: f64,
}

impl Default for InvestmentSection {
    fn default() -> Self {
        Self { amount: 10_000.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSection {
    /// Directory holding `{SYMBOL}.csv` files.
    pub dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    /// Tickers with fewer bars are skipped.
    pub min_history: usize,
    /// Use generated random-walk data instead of files.
    pub synthetic: bool,
}

impl Default for DataSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
            start: None,
            end: None,
            min_history: 50,
            synthetic: false,
        }
    }
}

/// Data symbol behind each macro benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSymbols {
    pub volatility_index: String,
    pub rate_proxy: String,
    pub broad_market: String,
    pub currency_proxy: String,
    pub commodity_proxy: String,
}

impl Default for MacroSymbols {
    fn default() -> Self {
        Self {
            volatility_index: "^VIX".into(),
            rate_proxy: "^TNX".into(),
            broad_market: "^GSPC".into(),
            currency_proxy: "DX-Y.NYB".into(),
            commodity_proxy: "GC=F".into(),
        }
    }
}

impl MacroSymbols {
    pub fn symbol(&self, benchmark: MacroBenchmark) -> &str {
        match benchmark {
            MacroBenchmark::VolatilityIndex => &self.volatility_index,
            MacroBenchmark::RateProxy => &self.rate_proxy,
            MacroBenchmark::BroadMarket => &self.broad_market,
            MacroBenchmark::CurrencyProxy => &self.currency_proxy,
            MacroBenchmark::CommodityProxy => &self.commodity_proxy,
        }
    }

    /// (benchmark, symbol) for every benchmark with a non-empty symbol.
    pub fn entries(&self) -> Vec<(MacroBenchmark, &str)> {
        MacroBenchmark::ALL
            .into_iter()
            .map(|b| (b, self.symbol(b)))
            .filter(|(_, s)| !s.is_empty())
            .collect()
    }
}

impl ForecastConfig {
    /// Load from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::Invalid("no tickers configured".into()));
        }
        if self.simulation.path_count == 0 {
            return Err(ConfigError::Invalid("simulation.path_count must be > 0".into()));
        }
        if self.simulation.horizon_days == 0 {
            return Err(ConfigError::Invalid("simulation.horizon_days must be > 0".into()));
        }
        let amount = self.investment.amount;
        if !(amount.is_finite() && amount > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "investment.amount must be finite and > 0, got {amount}"
            )));
        }
        if self.data.min_history < 2 {
            return Err(ConfigError::Invalid("data.min_history must be >= 2".into()));
        }
        if let (Some(start), Some(end)) = (self.data.start, self.data.end) {
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "data.start {start} is after data.end {end}"
                )));
            }
        }
        Ok(())
    }
}
