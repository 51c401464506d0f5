//! PriceCast Runner: configuration, data loading, forecast orchestration, export.
//!
//! This crate builds on `pricecast-core` to provide:
//! - TOML forecast configuration with defaults for every field
//! - CSV and synthetic price providers
//! - A macro benchmark cache shared read-only across tickers
//! - The per-ticker forecast pipeline and the multi-ticker run
//! - JSON, CSV, and Markdown report export

pub mod config;
pub mod data_loader;
pub mod export;
pub mod macro_cache;
pub mod pipeline;

pub use config::{ConfigError, DataSection, ForecastConfig, MacroSymbols, SimulationSection};
pub use data_loader::{CsvProvider, DataError, DataProvider, SyntheticProvider};
pub use export::{export_report, load_report};
pub use macro_cache::MacroCache;
pub use pipeline::{
    forecast_ticker, run_forecast, ForecastError, ForecastReport, SkippedTicker, TickerForecast,
};
