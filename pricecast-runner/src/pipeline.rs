//! Forecast pipeline: price history in, per-ticker forecast out.
//!
//! Two entry points:
//! - `forecast_ticker()`: pure per-ticker chain over an already-loaded series.
//!   Indicators, correlation and jump estimation, parameter adjustment,
//!   simulation, reduction, chart data and signal labels.
//! - `run_forecast()`: loads macro data once, then fetches and forecasts every
//!   configured ticker. A failing ticker is skipped, not fatal.

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use pricecast_core::charts::{PercentileFan, ReturnHistogram};
use pricecast_core::correlation::{estimate_correlations, CorrelationSet};
use pricecast_core::domain::PriceSeries;
use pricecast_core::error::SimulationError;
use pricecast_core::jump::{estimate_jumps, JumpParameters};
use pricecast_core::momentum::MomentumSnapshot;
use pricecast_core::outcome::{reduce_ensemble, OutcomeStatistics};
use pricecast_core::params::{adjust_parameters, base_parameters, ModelParameters};
use pricecast_core::signals::SignalSummary;
use pricecast_core::simulation::{simulate_paths, PathEnsemble};

use crate::config::{ConfigError, ForecastConfig};
use crate::data_loader::{DataError, DataProvider};
use crate::macro_cache::MacroCache;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// Why a single ticker could not be forecast.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("insufficient history: {observations} bars, need at least {required}")]
    InsufficientHistory { observations: usize, required: usize },

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

/// Everything computed for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerForecast {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub current_price: f64,
    pub observations: usize,
    /// Forecast built on generated data.
    pub synthetic: bool,
    pub momentum: MomentumSnapshot,
    pub signals: SignalSummary,
    pub correlations: CorrelationSet,
    pub jumps: JumpParameters,
    pub parameters: ModelParameters,
    pub outcome: OutcomeStatistics,
    pub fan: PercentileFan,
    pub histogram: ReturnHistogram,
    /// Full ensemble, kept only when `simulation.retain_paths` is set.
    #[serde(skip)]
    pub paths: Option<PathEnsemble>,
}

/// A ticker left out of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub reason: String,
}

/// Result of one forecast run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReport {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config: ForecastConfig,
    /// Successful forecasts in configured ticker order.
    pub forecasts: Vec<TickerForecast>,
    pub skipped: Vec<SkippedTicker>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ForecastReport {
    pub fn forecast(&self, ticker: &str) -> Option<&TickerForecast> {
        self.forecasts.iter().find(|f| f.ticker == ticker)
    }

    pub fn has_synthetic(&self) -> bool {
        self.forecasts.iter().any(|f| f.synthetic)
    }
}

/// Forecast one ticker from its price history.
pub fn forecast_ticker(
    ticker: &str,
    series: &PriceSeries,
    macros: &MacroCache,
    config: &ForecastConfig,
) -> Result<TickerForecast, ForecastError> {
    let required = config.data.min_history.max(2);
    let (Some(current_price), Some(as_of)) = (
        series.latest_close(),
        series.bars().last().map(|b| b.date),
    ) else {
        return Err(ForecastError::InsufficientHistory {
            observations: 0,
            required,
        });
    };
    if series.len() < required {
        return Err(ForecastError::InsufficientHistory {
            observations: series.len(),
            required,
        });
    }

    let closes = series.closes();
    let returns = series.returns();

    let momentum = MomentumSnapshot::from_closes(&closes);
    let correlations = estimate_correlations(&returns, macros.series());
    let jumps = estimate_jumps(&returns);
    let (base_drift, base_volatility) = base_parameters(&returns);
    let parameters = adjust_parameters(
        base_drift,
        base_volatility,
        &momentum,
        &correlations,
        &config.weights,
    );
    debug!(
        ticker,
        base_drift,
        base_volatility,
        adjusted_drift = parameters.adjusted_drift,
        adjusted_volatility = parameters.adjusted_volatility,
        momentum_adjustment = parameters.momentum_adjustment,
        macro_adjustment = parameters.macro_adjustment,
        "model parameters"
    );

    let sim_config = config.simulation.to_simulation_config();
    let stream = config.simulation.seed_policy.stream_for(ticker);
    let ensemble = simulate_paths(current_price, &parameters, &jumps, &sim_config, stream)?;
    let outcome = reduce_ensemble(
        &ensemble,
        current_price,
        config.investment.amount,
        sim_config.horizon_years(),
    )?;
    let fan = PercentileFan::from_ensemble(&ensemble, config.simulation.fan_stride);
    let histogram = ReturnHistogram::from_ensemble(&ensemble, config.simulation.histogram_bins);

    info!(
        ticker,
        current_price,
        expected_price = outcome.price.mean,
        p5 = outcome.price.p5,
        p95 = outcome.price.p95,
        probability_profit = outcome.investment.probability_profit,
        "forecast complete"
    );

    Ok(TickerForecast {
        ticker: ticker.to_string(),
        as_of,
        current_price,
        observations: series.len(),
        synthetic: false,
        signals: SignalSummary::from_snapshot(&momentum),
        momentum,
        correlations,
        jumps,
        parameters,
        outcome,
        fan,
        histogram,
        paths: config.simulation.retain_paths.then_some(ensemble),
    })
}

/// Fetch and forecast every configured ticker.
///
/// Only an invalid config is an error. Data or simulation failures for a
/// ticker land in `ForecastReport::skipped`.
pub fn run_forecast(
    config: &ForecastConfig,
    provider: &dyn DataProvider,
) -> Result<ForecastReport, ConfigError> {
    config.validate()?;

    let (start, end) = (config.data.start, config.data.end);
    let macros = MacroCache::load(provider, &config.macros, start, end);
    info!(
        tickers = config.tickers.len(),
        macro_series = macros.len(),
        provider = provider.name(),
        "starting forecast run"
    );

    let run_one = |ticker: &String| -> Result<TickerForecast, ForecastError> {
        let series = provider.fetch(ticker, start, end)?;
        let mut forecast = forecast_ticker(ticker, &series, &macros, config)?;
        forecast.synthetic = provider.is_synthetic();
        Ok(forecast)
    };

    let results: Vec<Result<TickerForecast, ForecastError>> = if config.parallel_tickers {
        config.tickers.par_iter().map(run_one).collect()
    } else {
        config.tickers.iter().map(run_one).collect()
    };

    let mut forecasts = Vec::new();
    let mut skipped = Vec::new();
    for (ticker, result) in config.tickers.iter().zip(results) {
        match result {
            Ok(forecast) => forecasts.push(forecast),
            Err(e) => {
                warn!(ticker = %ticker, error = %e, "ticker skipped");
                skipped.push(SkippedTicker {
                    ticker: ticker.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(ForecastReport {
        schema_version: SCHEMA_VERSION,
        config: config.clone(),
        forecasts,
        skipped,
    })
}
