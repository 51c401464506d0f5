//! PriceCast CLI: forecast, signals, and init-config commands.
//!
//! Commands:
//! - `forecast`: simulate price paths for one or more tickers and export a report
//! - `signals`: print the momentum snapshot of one ticker and its interpretation
//! - `init-config`: write a default TOML config

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pricecast_core::domain::{MacroBenchmark, PriceSeries};
use pricecast_core::momentum::{MomentumConfig, MomentumSnapshot};
use pricecast_core::rng::SeedPolicy;
use pricecast_core::signals::SignalSummary;
use pricecast_runner::{
    export_report, run_forecast, CsvProvider, DataProvider, ForecastConfig, ForecastReport,
    SyntheticProvider, TickerForecast,
};

#[derive(Parser)]
#[command(
    name = "pricecast",
    about = "PriceCast CLI: Monte Carlo stock price projections"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate price paths and report the terminal distribution.
    Forecast {
        /// Tickers to forecast. Replaces the config's ticker list when given.
        tickers: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory holding {SYMBOL}.csv files.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Number of simulated paths.
        #[arg(long)]
        paths: Option<usize>,

        /// Horizon in trading days.
        #[arg(long)]
        horizon_days: Option<usize>,

        /// Master RNG seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Give each ticker its own random stream.
        #[arg(long, default_value_t = false)]
        per_ticker_seed: bool,

        /// Amount invested at the current price.
        #[arg(long)]
        investment: Option<f64>,

        /// History start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// History end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Use synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Forecast tickers concurrently.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        /// Output directory for report artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Print the summary only.
        #[arg(long, default_value_t = false)]
        no_export: bool,
    },
    /// Print the momentum snapshot and signal labels for one ticker.
    Signals {
        ticker: String,

        /// Directory holding {SYMBOL}.csv files.
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,

        /// History start date (YYYY-MM-DD).
        #[arg(long)]
        start: Option<String>,

        /// History end date (YYYY-MM-DD).
        #[arg(long)]
        end: Option<String>,

        /// Use synthetic data instead of CSV files.
        #[arg(long, default_value_t = false)]
        synthetic: bool,
    },
    /// Write a default TOML config.
    InitConfig {
        #[arg(default_value = "pricecast.toml")]
        path: PathBuf,

        /// Overwrite an existing file.
        #[arg(long, default_value_t = false)]
        force: bool,
    },
}

/// CLI values that override the loaded config.
struct ForecastOverrides {
    tickers: Vec<String>,
    data_dir: Option<PathBuf>,
    paths: Option<usize>,
    horizon_days: Option<usize>,
    seed: Option<u64>,
    per_ticker_seed: bool,
    investment: Option<f64>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    synthetic: bool,
    parallel: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Forecast {
            tickers,
            config,
            data_dir,
            paths,
            horizon_days,
            seed,
            per_ticker_seed,
            investment,
            start,
            end,
            synthetic,
            parallel,
            output_dir,
            no_export,
        } => {
            let overrides = ForecastOverrides {
                tickers,
                data_dir,
                paths,
                horizon_days,
                seed,
                per_ticker_seed,
                investment,
                start: parse_date(start.as_deref())?,
                end: parse_date(end.as_deref())?,
                synthetic,
                parallel,
            };
            run_forecast_cmd(config.as_deref(), overrides, &output_dir, no_export)
        }
        Commands::Signals {
            ticker,
            data_dir,
            start,
            end,
            synthetic,
        } => run_signals_cmd(
            &ticker,
            &data_dir,
            parse_date(start.as_deref())?,
            parse_date(end.as_deref())?,
            synthetic,
        ),
        Commands::InitConfig { path, force } => run_init_config(&path, force),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            ["pricecast", "pricecast_core", "pricecast_runner"]
                .map(|target| format!("{target}={default_level}"))
                .join(",")
                .into()
        }))
        .init();
}

fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("invalid date '{s}', expected YYYY-MM-DD"))
        })
        .transpose()
}

fn provider_for(synthetic: bool, data_dir: &Path) -> Box<dyn DataProvider> {
    if synthetic {
        warn!("using SYNTHETIC data, results are not real forecasts");
        Box::new(SyntheticProvider::default())
    } else {
        Box::new(CsvProvider::new(data_dir))
    }
}

fn apply_overrides(config: &mut ForecastConfig, o: ForecastOverrides) {
    if !o.tickers.is_empty() {
        config.tickers = o.tickers;
    }
    if let Some(dir) = o.data_dir {
        config.data.dir = dir;
    }
    if let Some(paths) = o.paths {
        config.simulation.path_count = paths;
    }
    if let Some(days) = o.horizon_days {
        config.simulation.horizon_days = days;
    }
    if let Some(seed) = o.seed {
        config.simulation.seed = seed;
    }
    if o.per_ticker_seed {
        config.simulation.seed_policy = SeedPolicy::PerTicker;
    }
    if let Some(amount) = o.investment {
        config.investment.amount = amount;
    }
    if o.start.is_some() {
        config.data.start = o.start;
    }
    if o.end.is_some() {
        config.data.end = o.end;
    }
    config.data.synthetic |= o.synthetic;
    config.parallel_tickers |= o.parallel;
}

fn run_forecast_cmd(
    config_path: Option<&Path>,
    overrides: ForecastOverrides,
    output_dir: &Path,
    no_export: bool,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ForecastConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ForecastConfig::default(),
    };
    apply_overrides(&mut config, overrides);

    let provider = provider_for(config.data.synthetic, &config.data.dir);
    let report =
        run_forecast(&config, provider.as_ref()).context("invalid forecast configuration")?;

    for forecast in &report.forecasts {
        print_summary(forecast, &config);
    }
    print_skipped(&report);

    if report.forecasts.is_empty() {
        bail!("no ticker could be forecast");
    }

    if !no_export {
        let written = export_report(&report, output_dir)?;
        info!(files = written.len(), "report exported");
        println!("Artifacts saved to: {}", output_dir.display());
    }

    Ok(())
}

fn run_signals_cmd(
    ticker: &str,
    data_dir: &Path,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    synthetic: bool,
) -> Result<()> {
    let provider = provider_for(synthetic, data_dir);
    let series: PriceSeries = provider
        .fetch(ticker, start, end)
        .with_context(|| format!("failed to load history for {ticker}"))?;

    let long_window = MomentumConfig::default().long_ma;
    if series.len() < long_window {
        warn!(
            bars = series.len(),
            required = long_window,
            "history shorter than the long moving average, some readings are neutral defaults"
        );
    }

    let snapshot = MomentumSnapshot::from_closes(&series.closes());
    let summary = SignalSummary::from_snapshot(&snapshot);

    println!();
    println!("=== Signals: {ticker} ===");
    println!("Bars:           {}", series.len());
    if let Some(close) = series.latest_close() {
        println!("Last Close:     {close:.2}");
    }
    println!();
    println!("{:<16} {:>10}  {}", "Indicator", "Value", "Signal");
    println!("{}", "-".repeat(46));
    let values = [
        snapshot.rsi,
        snapshot.macd,
        snapshot.bollinger_position,
        snapshot.ma_momentum,
        snapshot.price_vs_ma50,
        snapshot.price_vs_ma200,
    ];
    for ((name, label), value) in summary.entries().into_iter().zip(values) {
        println!("{name:<16} {value:>10.4}  {label}");
    }
    if let (Some(signal), Some(hist)) = (snapshot.macd_signal, snapshot.macd_histogram) {
        println!("{:<16} {signal:>10.4}", "macd_signal");
        println!("{:<16} {hist:>10.4}", "macd_histogram");
    }
    println!();

    Ok(())
}

fn run_init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let config = ForecastConfig {
        tickers: vec!["SPY".into()],
        ..ForecastConfig::default()
    };
    let text = config.to_toml()?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn print_summary(f: &TickerForecast, config: &ForecastConfig) {
    let o = &f.outcome;
    let p = &f.parameters;
    println!();
    println!("=== Forecast: {} ===", f.ticker);
    println!("As Of:          {} ({} bars)", f.as_of, f.observations);
    println!("Current Price:  {:.2}", f.current_price);
    println!(
        "Horizon:        {} days, {} paths",
        config.simulation.horizon_days, o.path_count
    );
    println!();
    println!("--- Model ---");
    println!(
        "Drift:          {:.2}% -> {:.2}% (momentum {:+.4}, macro {:+.4})",
        p.base_drift * 100.0,
        p.adjusted_drift * 100.0,
        p.momentum_adjustment,
        p.macro_adjustment
    );
    println!(
        "Volatility:     {:.2}% -> {:.2}%",
        p.base_volatility * 100.0,
        p.adjusted_volatility * 100.0
    );
    if f.jumps.is_active() {
        println!(
            "Jumps:          {:.2}/yr, mean {:+.2}%, vol {:.2}%",
            f.jumps.intensity,
            f.jumps.mean_size * 100.0,
            f.jumps.size_volatility * 100.0
        );
    } else {
        println!("Jumps:          none");
    }
    for benchmark in MacroBenchmark::ALL {
        println!(
            "  corr {:<17}{:+.3}",
            benchmark.key(),
            f.correlations.get(benchmark)
        );
    }
    println!();
    println!("--- Price ---");
    println!("Expected:       {:.2}", o.price.mean);
    println!("Median:         {:.2}", o.price.median);
    println!("5th-95th:       {:.2} - {:.2}", o.price.p5, o.price.p95);
    println!(
        "Total Return:   {:.2}% (annualized {:.2}%)",
        o.total_return_pct.mean, o.annualized_return_pct.mean
    );
    println!();
    println!("--- Investment {:.2} ---", o.investment.amount);
    println!("Shares:         {:.4}", o.investment.shares);
    println!("Final Value:    {:.2}", o.investment.final_value.mean);
    println!(
        "P(profit):      {:.1}%   P(loss): {:.1}%",
        o.investment.probability_profit * 100.0,
        o.investment.probability_loss * 100.0
    );
    println!("VaR 95:         {:.2}", o.risk.var_95);
    println!("CVaR 95:        {:.2}", o.risk.cvar_95);
    println!("Worst Path:     {:.2}", o.risk.max_drawdown);
    println!("Upside (P95):   {:.2}", o.risk.upside_potential);
    println!();
    println!("--- Signals ---");
    for (name, label) in f.signals.entries() {
        println!("{name:<16}{label}");
    }
    if f.synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

fn print_skipped(report: &ForecastReport) {
    for s in &report.skipped {
        println!("SKIPPED {}: {}", s.ticker, s.reason);
    }
}
