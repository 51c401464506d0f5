//! Parameter adjustment: base drift/volatility plus momentum and macro tilts.
//!
//! momentum = (rsi - 50) / 50 * w_rsi + (bollinger - 0.5) * w_bb + ma_momentum * w_ma
//! macro    = sum of correlation * weight over non-zero correlations
//! drift    = base_drift + momentum + macro
//! vol      = base_vol * (1 + |momentum| * vol_scale)
//!
//! The commodity benchmark carries a zero weight: its correlation is reported
//! but does not move the drift.

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationSet;
use crate::domain::{MacroBenchmark, ReturnSeries};
use crate::momentum::MomentumSnapshot;
use crate::TRADING_DAYS_PER_YEAR;

/// Tunable adjustment weights. Defaults are the model's reference constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentWeights {
    pub rsi: f64,
    pub bollinger: f64,
    pub ma_momentum: f64,
    /// Multiplier on |momentum_adjustment| applied to volatility.
    pub volatility_scale: f64,
    pub volatility_index: f64,
    pub rate_proxy: f64,
    pub broad_market: f64,
    pub currency_proxy: f64,
    pub commodity_proxy: f64,
}

impl Default for AdjustmentWeights {
    fn default() -> Self {
        Self {
            rsi: 0.10,
            bollinger: 0.05,
            ma_momentum: 0.15,
            volatility_scale: 0.5,
            volatility_index: 0.05,
            rate_proxy: 0.03,
            broad_market: 0.08,
            currency_proxy: 0.02,
            commodity_proxy: 0.0,
        }
    }
}

impl AdjustmentWeights {
    pub fn macro_weight(&self, benchmark: MacroBenchmark) -> f64 {
        match benchmark {
            MacroBenchmark::VolatilityIndex => self.volatility_index,
            MacroBenchmark::RateProxy => self.rate_proxy,
            MacroBenchmark::BroadMarket => self.broad_market,
            MacroBenchmark::CurrencyProxy => self.currency_proxy,
            MacroBenchmark::CommodityProxy => self.commodity_proxy,
        }
    }
}

/// Annualized model parameters ready for simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    pub base_drift: f64,
    pub base_volatility: f64,
    pub adjusted_drift: f64,
    pub adjusted_volatility: f64,
    pub momentum_adjustment: f64,
    pub macro_adjustment: f64,
}

impl ModelParameters {
    /// Parameters with no adjustment applied.
    pub fn unadjusted(drift: f64, volatility: f64) -> Self {
        Self {
            base_drift: drift,
            base_volatility: volatility,
            adjusted_drift: drift,
            adjusted_volatility: volatility,
            momentum_adjustment: 0.0,
            macro_adjustment: 0.0,
        }
    }
}

/// Annualized (drift, volatility) from daily returns.
pub fn base_parameters(returns: &ReturnSeries) -> (f64, f64) {
    (
        returns.mean() * TRADING_DAYS_PER_YEAR,
        returns.sample_std() * TRADING_DAYS_PER_YEAR.sqrt(),
    )
}

pub fn momentum_adjustment(momentum: &MomentumSnapshot, weights: &AdjustmentWeights) -> f64 {
    let rsi = (momentum.rsi - 50.0) / 50.0 * weights.rsi;
    let bollinger = (momentum.bollinger_position - 0.5) * weights.bollinger;
    let ma = momentum.ma_momentum * weights.ma_momentum;
    rsi + bollinger + ma
}

pub fn macro_adjustment(correlations: &CorrelationSet, weights: &AdjustmentWeights) -> f64 {
    correlations
        .iter()
        .filter(|&(_, r)| r != 0.0)
        .map(|(benchmark, r)| r * weights.macro_weight(benchmark))
        .fold(0.0, |acc, term| acc + term)
}

/// Combine base parameters with momentum and macro adjustments.
pub fn adjust_parameters(
    base_drift: f64,
    base_volatility: f64,
    momentum: &MomentumSnapshot,
    correlations: &CorrelationSet,
    weights: &AdjustmentWeights,
) -> ModelParameters {
    let momentum_adj = momentum_adjustment(momentum, weights);
    let macro_adj = macro_adjustment(correlations, weights);

    ModelParameters {
        base_drift,
        base_volatility,
        adjusted_drift: base_drift + momentum_adj + macro_adj,
        adjusted_volatility: base_volatility
            * (1.0 + momentum_adj.abs() * weights.volatility_scale.abs()),
        momentum_adjustment: momentum_adj,
        macro_adjustment: macro_adj,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_approx, DEFAULT_EPSILON};

    fn snapshot(rsi: f64, bollinger_position: f64, ma_momentum: f64) -> MomentumSnapshot {
        MomentumSnapshot {
            rsi,
            bollinger_position,
            ma_momentum,
            ..MomentumSnapshot::default()
        }
    }

    #[test]
    fn neutral_inputs_leave_parameters_unchanged() {
        let params = adjust_parameters(
            0.08,
            0.2,
            &MomentumSnapshot::default(),
            &CorrelationSet::default(),
            &AdjustmentWeights::default(),
        );
        assert_eq!(params, ModelParameters::unadjusted(0.08, 0.2));
    }

    #[test]
    fn momentum_adjustment_known_value() {
        // (70-50)/50*0.10 + (0.9-0.5)*0.05 + 0.1*0.15 = 0.04 + 0.02 + 0.015
        let adj = momentum_adjustment(&snapshot(70.0, 0.9, 0.1), &AdjustmentWeights::default());
        assert_approx(adj, 0.075, DEFAULT_EPSILON);
    }

    #[test]
    fn macro_adjustment_excludes_commodity() {
        let mut corr = CorrelationSet::default();
        corr.set(MacroBenchmark::VolatilityIndex, -0.5);
        corr.set(MacroBenchmark::RateProxy, 0.2);
        corr.set(MacroBenchmark::BroadMarket, 0.8);
        corr.set(MacroBenchmark::CurrencyProxy, -0.1);
        corr.set(MacroBenchmark::CommodityProxy, 0.9);
        // -0.025 + 0.006 + 0.064 - 0.002
        let adj = macro_adjustment(&corr, &AdjustmentWeights::default());
        assert_approx(adj, 0.043, DEFAULT_EPSILON);
    }

    #[test]
    fn missing_macro_data_is_positive_zero() {
        let adj = macro_adjustment(&CorrelationSet::default(), &AdjustmentWeights::default());
        assert_eq!(adj, 0.0);
        assert!(adj.is_sign_positive());

        let params = adjust_parameters(
            0.08,
            0.2,
            &MomentumSnapshot::default(),
            &CorrelationSet::default(),
            &AdjustmentWeights::default(),
        );
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"macro_adjustment\":0.0"), "{json}");
    }

    #[test]
    fn macro_moves_drift_not_volatility() {
        let mut corr = CorrelationSet::default();
        corr.set(MacroBenchmark::BroadMarket, 1.0);
        let params = adjust_parameters(
            0.05,
            0.3,
            &MomentumSnapshot::default(),
            &corr,
            &AdjustmentWeights::default(),
        );
        assert_approx(params.adjusted_drift, 0.13, DEFAULT_EPSILON);
        assert_eq!(params.adjusted_volatility, 0.3);
    }

    #[test]
    fn bearish_momentum_still_widens_volatility() {
        let params = adjust_parameters(
            0.05,
            0.3,
            &snapshot(20.0, 0.0, -0.2),
            &CorrelationSet::default(),
            &AdjustmentWeights::default(),
        );
        assert!(params.momentum_adjustment < 0.0);
        assert!(params.adjusted_drift < params.base_drift);
        assert!(params.adjusted_volatility > params.base_volatility);
    }

    #[test]
    fn base_parameters_annualize() {
        let returns = ReturnSeries::from_values(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            vec![0.01, -0.01, 0.01, -0.01],
        );
        let (drift, vol) = base_parameters(&returns);
        assert_approx(drift, 0.0, 1e-12);
        // sample std = sqrt(4 * 0.0001 / 3)
        assert_approx(vol, (0.0004_f64 / 3.0).sqrt() * 252.0_f64.sqrt(), 1e-12);
    }
}
