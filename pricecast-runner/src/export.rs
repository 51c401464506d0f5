//! Report export: JSON, CSV, and Markdown artifacts.
//!
//! `export_report()` writes into one directory:
//! - `forecast.json`: the full report, schema-versioned
//! - `summary.csv`: one row per ticker
//! - `{TICKER}_fan.csv`: percentile bands per step
//! - `{TICKER}_histogram.csv`: terminal return distribution
//! - `report.md`: human-readable summary
//!
//! Unknown schema versions are rejected on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::pipeline::{ForecastReport, TickerForecast, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ForecastReport` to pretty JSON.
pub fn export_json(report: &ForecastReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ForecastReport to JSON")
}

/// Deserialize a `ForecastReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ForecastReport> {
    let report: ForecastReport =
        serde_json::from_str(json).context("failed to deserialize ForecastReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One `summary.csv` row.
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    ticker: &'a str,
    as_of: String,
    current_price: f64,
    expected_price: f64,
    median_price: f64,
    p5_price: f64,
    p95_price: f64,
    expected_return_pct: f64,
    annualized_return_pct: f64,
    probability_profit: f64,
    var_95: f64,
    cvar_95: f64,
    max_drawdown: f64,
    upside_potential: f64,
    base_drift: f64,
    adjusted_drift: f64,
    base_volatility: f64,
    adjusted_volatility: f64,
    jump_intensity: f64,
    rsi: f64,
    rsi_signal: &'a str,
    trend_signal: &'a str,
    synthetic: bool,
}

impl<'a> SummaryRow<'a> {
    fn from_forecast(f: &'a TickerForecast) -> Self {
        let o = &f.outcome;
        Self {
            ticker: &f.ticker,
            as_of: f.as_of.to_string(),
            current_price: f.current_price,
            expected_price: o.price.mean,
            median_price: o.price.median,
            p5_price: o.price.p5,
            p95_price: o.price.p95,
            expected_return_pct: o.total_return_pct.mean,
            annualized_return_pct: o.annualized_return_pct.mean,
            probability_profit: o.investment.probability_profit,
            var_95: o.risk.var_95,
            cvar_95: o.risk.cvar_95,
            max_drawdown: o.risk.max_drawdown,
            upside_potential: o.risk.upside_potential,
            base_drift: f.parameters.base_drift,
            adjusted_drift: f.parameters.adjusted_drift,
            base_volatility: f.parameters.base_volatility,
            adjusted_volatility: f.parameters.adjusted_volatility,
            jump_intensity: f.jumps.intensity,
            rsi: f.momentum.rsi,
            rsi_signal: f.signals.rsi.label(),
            trend_signal: f.signals.ma_momentum.label(),
            synthetic: f.synthetic,
        }
    }
}

fn rows_to_csv<T: Serialize>(rows: impl IntoIterator<Item = T>) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row).context("failed to write CSV row")?;
    }
    let bytes = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// One row per forecast ticker.
pub fn export_summary_csv(report: &ForecastReport) -> Result<String> {
    rows_to_csv(report.forecasts.iter().map(SummaryRow::from_forecast))
}

/// Columns: step, p5, p25, p50, p75, p95
pub fn export_fan_csv(forecast: &TickerForecast) -> Result<String> {
    rows_to_csv(forecast.fan.points.iter())
}

/// Columns: lower, upper, count
pub fn export_histogram_csv(forecast: &TickerForecast) -> Result<String> {
    rows_to_csv(forecast.histogram.bins.iter())
}

/// File-name-safe form of a ticker (`^GSPC` → `_GSPC`).
pub fn file_stem(ticker: &str) -> String {
    ticker
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ─── Artifact directory ─────────────────────────────────────────────

/// Write every report artifact into `output_dir` (created if missing).
///
/// Returns the written paths.
pub fn export_report(report: &ForecastReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let mut written = Vec::new();
    let mut write = |name: String, content: String| -> Result<()> {
        let path = output_dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
        Ok(())
    };

    write("forecast.json".into(), export_json(report)?)?;
    write("summary.csv".into(), export_summary_csv(report)?)?;
    for forecast in &report.forecasts {
        let stem = file_stem(&forecast.ticker);
        write(format!("{stem}_fan.csv"), export_fan_csv(forecast)?)?;
        write(format!("{stem}_histogram.csv"), export_histogram_csv(forecast)?)?;
    }
    write("report.md".into(), generate_report(report))?;

    Ok(written)
}

/// Load a `ForecastReport` from an artifact directory's forecast.json.
pub fn load_report(dir: &Path) -> Result<ForecastReport> {
    let path = dir.join("forecast.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Markdown summary of a forecast run.
pub fn generate_report(report: &ForecastReport) -> String {
    let sim = &report.config.simulation;
    let mut md = String::with_capacity(2048);

    md.push_str("# Price Forecast Report\n\n");
    md.push_str(&format!(
        "{} paths over {} trading days, seed {}, investment {:.2}\n\n",
        sim.path_count, sim.horizon_days, sim.seed, report.config.investment.amount
    ));

    if report.has_synthetic() {
        md.push_str("> **WARNING:** contains results based on SYNTHETIC data\n\n");
    }

    md.push_str("| Ticker | Price | Expected | P5 | P95 | P(profit) | VaR 95 | CVaR 95 | RSI | Trend |\n");
    md.push_str("|---|---|---|---|---|---|---|---|---|---|\n");
    for f in &report.forecasts {
        let o = &f.outcome;
        md.push_str(&format!(
            "| {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.1}% | {:.2} | {:.2} | {:.1} ({}) | {} |\n",
            f.ticker,
            f.current_price,
            o.price.mean,
            o.price.p5,
            o.price.p95,
            o.investment.probability_profit * 100.0,
            o.risk.var_95,
            o.risk.cvar_95,
            f.momentum.rsi,
            f.signals.rsi,
            f.signals.ma_momentum,
        ));
    }

    if !report.skipped.is_empty() {
        md.push_str("\n## Skipped\n\n");
        for s in &report.skipped {
            md.push_str(&format!("- **{}**: {}\n", s.ticker, s.reason));
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ForecastConfig;
    use crate::pipeline::SkippedTicker;

    fn empty_report() -> ForecastReport {
        ForecastReport {
            schema_version: SCHEMA_VERSION,
            config: ForecastConfig::default(),
            forecasts: Vec::new(),
            skipped: vec![SkippedTicker {
                ticker: "BAD".into(),
                reason: "data error: no data file".into(),
            }],
        }
    }

    #[test]
    fn file_stem_replaces_symbols() {
        assert_eq!(file_stem("^GSPC"), "_GSPC");
        assert_eq!(file_stem("GC=F"), "GC_F");
        assert_eq!(file_stem("BRK-B"), "BRK-B");
        assert_eq!(file_stem("DX-Y.NYB"), "DX-Y.NYB");
    }

    #[test]
    fn future_schema_is_rejected() {
        let mut report = empty_report();
        report.schema_version = SCHEMA_VERSION + 1;
        let json = export_json(&report).unwrap();
        assert!(import_json(&json).is_err());
    }

    #[test]
    fn missing_schema_version_defaults() {
        let report = empty_report();
        let mut value: serde_json::Value =
            serde_json::from_str(&export_json(&report).unwrap()).unwrap();
        value.as_object_mut().unwrap().remove("schema_version");
        let restored = import_json(&value.to_string()).unwrap();
        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.skipped, report.skipped);
    }

    #[test]
    fn report_lists_skipped_tickers() {
        let md = generate_report(&empty_report());
        assert!(md.contains("# Price Forecast Report"));
        assert!(md.contains("- **BAD**: data error"));
        assert!(!md.contains("SYNTHETIC"));
    }

    #[test]
    fn empty_summary_has_no_rows() {
        let csv = export_summary_csv(&empty_report()).unwrap();
        assert!(csv.is_empty());
    }
}
