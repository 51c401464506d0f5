//! End-to-end scenarios through the core engine: history in, outcome out.

use std::collections::HashMap;

use chrono::NaiveDate;
use pricecast_core::correlation::{estimate_correlations, MIN_OBSERVATIONS};
use pricecast_core::domain::{MacroBenchmark, MacroSeries, PriceSeries, ReturnSeries};
use pricecast_core::jump::{estimate_jumps, JumpParameters};
use pricecast_core::momentum::MomentumSnapshot;
use pricecast_core::outcome::reduce_ensemble;
use pricecast_core::params::{
    adjust_parameters, base_parameters, AdjustmentWeights, ModelParameters,
};
use pricecast_core::signals::{SignalSummary, TrendSignal};
use pricecast_core::simulation::{simulate_paths, SimulationConfig};

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2019, 1, 1).unwrap()
}

#[test]
fn gbm_mean_matches_closed_form() {
    let config = SimulationConfig {
        path_count: 10_000,
        horizon_days: 504,
        ..SimulationConfig::default()
    };
    let ens = simulate_paths(
        100.0,
        &ModelParameters::unadjusted(0.08, 0.2),
        &JumpParameters::none(),
        &config,
        "",
    )
    .unwrap();

    let stats = reduce_ensemble(&ens, 100.0, 10_000.0, config.horizon_years()).unwrap();
    // E[S_T] = 100 * exp(0.08 * 2)
    let expected = 100.0 * (0.16_f64).exp();
    assert!(
        (stats.price.mean - expected).abs() / expected < 0.05,
        "mean {} vs {expected}",
        stats.price.mean
    );
    assert!(stats.price.p5 < stats.price.median && stats.price.median < stats.price.p95);
    assert!(stats.investment.probability_profit > 0.5);
    assert!(stats.risk.cvar_95 <= stats.risk.var_95);
}

#[test]
fn short_macro_history_falls_back_to_zero() {
    let stock: Vec<f64> = (0..200).map(|i| ((i as f64) * 0.7).sin() * 0.02).collect();
    let stock = ReturnSeries::from_values(start(), stock.clone());

    // 29 observations that match the stock exactly
    let short = ReturnSeries::from_values(start(), stock.values()[..MIN_OBSERVATIONS - 1].to_vec());
    let full = ReturnSeries::from_values(start(), stock.values().to_vec());

    let mut macros = HashMap::new();
    macros.insert(
        MacroBenchmark::RateProxy,
        MacroSeries::new(MacroBenchmark::RateProxy, short),
    );
    macros.insert(
        MacroBenchmark::BroadMarket,
        MacroSeries::new(MacroBenchmark::BroadMarket, full),
    );

    let set = estimate_correlations(&stock, &macros);
    assert_eq!(set.get(MacroBenchmark::RateProxy), 0.0);
    assert!((set.get(MacroBenchmark::BroadMarket) - 1.0).abs() < 1e-9);
    assert_eq!(set.get(MacroBenchmark::VolatilityIndex), 0.0);
}

#[test]
fn full_chain_from_price_history() {
    // two years of a steady uptrend with a mild wobble
    let closes: Vec<f64> = (0..504)
        .map(|i| 50.0 * (1.0 + 0.0008 * i as f64) * (1.0 + 0.01 * ((i as f64) * 0.3).sin()))
        .collect();
    let series = PriceSeries::from_closes("TEST", start(), &closes).unwrap();
    let returns = series.returns();

    let snapshot = MomentumSnapshot::from_closes(&series.closes());
    let correlations = estimate_correlations(&returns, &HashMap::new());
    let jumps = estimate_jumps(&returns);
    let (drift, vol) = base_parameters(&returns);
    let weights = AdjustmentWeights::default();
    let params = adjust_parameters(drift, vol, &snapshot, &correlations, &weights);

    assert!(snapshot.ma_momentum > 0.0);
    assert!(params.adjusted_volatility >= params.base_volatility);
    assert_eq!(params.macro_adjustment, 0.0);

    let config = SimulationConfig {
        path_count: 2_000,
        horizon_days: 252,
        ..SimulationConfig::default()
    };
    let current = series.latest_close().unwrap();
    let ens = simulate_paths(current, &params, &jumps, &config, "").unwrap();
    let stats = reduce_ensemble(&ens, current, 10_000.0, config.horizon_years()).unwrap();

    assert_eq!(stats.path_count, 2_000);
    assert!(stats.price.mean > 0.0);
    assert!((stats.investment.shares - 10_000.0 / current).abs() < 1e-9);

    let summary = SignalSummary::from_snapshot(&snapshot);
    assert!(matches!(
        summary.ma_momentum,
        TrendSignal::WeakUptrend | TrendSignal::Uptrend | TrendSignal::StrongUptrend
    ));
}
