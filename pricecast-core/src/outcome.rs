//! Outcome statistics: reduce the terminal distribution of a path ensemble.
//!
//! Every percentile uses linear interpolation between closest ranks. Risk
//! metrics are stated on the profit/loss of the invested amount:
//! - VaR 95: 5th percentile of P/L
//! - CVaR 95: mean of the P/L values at or below VaR
//! - max drawdown: worst single-path terminal P/L (not peak-to-trough)
//! - upside potential: 95th percentile of P/L

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;
use crate::simulation::PathEnsemble;
use crate::stats::{mean, median, percentile_sorted, population_std, sorted};

/// Mean, median, 5th/95th percentile and standard deviation of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: f64,
    pub median: f64,
    pub p5: f64,
    pub p95: f64,
    pub std: f64,
}

impl DistributionSummary {
    pub fn from_values(values: &[f64]) -> Self {
        let s = sorted(values);
        Self {
            mean: mean(values),
            median: median(values),
            p5: percentile_sorted(&s, 5.0),
            p95: percentile_sorted(&s, 95.0),
            std: population_std(values),
        }
    }
}

/// What a fixed investment at the current price turns into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InvestmentOutcome {
    pub amount: f64,
    pub shares: f64,
    pub final_value: DistributionSummary,
    pub profit_loss: DistributionSummary,
    pub probability_profit: f64,
    pub probability_loss: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub var_95: f64,
    pub cvar_95: f64,
    pub max_drawdown: f64,
    pub upside_potential: f64,
}

/// Terminal-distribution report for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeStatistics {
    pub current_price: f64,
    pub horizon_years: f64,
    pub path_count: usize,
    pub price: DistributionSummary,
    pub total_return_pct: DistributionSummary,
    pub annualized_return_pct: DistributionSummary,
    pub investment: InvestmentOutcome,
    pub risk: RiskMetrics,
}

/// Reduce an ensemble's final step.
pub fn reduce_ensemble(
    ensemble: &PathEnsemble,
    current_price: f64,
    investment_amount: f64,
    horizon_years: f64,
) -> Result<OutcomeStatistics, SimulationError> {
    reduce_terminal_prices(
        &ensemble.terminal_prices(),
        current_price,
        investment_amount,
        horizon_years,
    )
}

/// Reduce a vector of terminal prices.
pub fn reduce_terminal_prices(
    terminal: &[f64],
    current_price: f64,
    investment_amount: f64,
    horizon_years: f64,
) -> Result<OutcomeStatistics, SimulationError> {
    if terminal.is_empty() {
        return Err(SimulationError::InvalidPathCount);
    }
    if !(current_price.is_finite() && current_price > 0.0) {
        return Err(SimulationError::InvalidPrice(current_price));
    }
    if !(investment_amount.is_finite() && investment_amount > 0.0) {
        return Err(SimulationError::InvalidInvestment(investment_amount));
    }
    if !(horizon_years.is_finite() && horizon_years > 0.0) {
        return Err(SimulationError::InvalidHorizon);
    }

    let growth: Vec<f64> = terminal.iter().map(|p| p / current_price).collect();
    let total_return_pct: Vec<f64> = growth.iter().map(|g| (g - 1.0) * 100.0).collect();
    let annualized_pct: Vec<f64> = growth
        .iter()
        .map(|g| (g.powf(1.0 / horizon_years) - 1.0) * 100.0)
        .collect();

    let shares = investment_amount / current_price;
    let final_value: Vec<f64> = terminal.iter().map(|p| p * shares).collect();
    let profit_loss: Vec<f64> = final_value.iter().map(|v| v - investment_amount).collect();

    let n = terminal.len() as f64;
    let probability_profit = profit_loss.iter().filter(|&&pl| pl > 0.0).count() as f64 / n;
    let probability_loss = profit_loss.iter().filter(|&&pl| pl < 0.0).count() as f64 / n;

    Ok(OutcomeStatistics {
        current_price,
        horizon_years,
        path_count: terminal.len(),
        price: DistributionSummary::from_values(terminal),
        total_return_pct: DistributionSummary::from_values(&total_return_pct),
        annualized_return_pct: DistributionSummary::from_values(&annualized_pct),
        investment: InvestmentOutcome {
            amount: investment_amount,
            shares,
            final_value: DistributionSummary::from_values(&final_value),
            profit_loss: DistributionSummary::from_values(&profit_loss),
            probability_profit,
            probability_loss,
        },
        risk: risk_metrics(&profit_loss),
    })
}

/// Tail metrics over a profit/loss sample.
pub fn risk_metrics(profit_loss: &[f64]) -> RiskMetrics {
    let s = sorted(profit_loss);
    let var_95 = percentile_sorted(&s, 5.0);
    let tail: Vec<f64> = s.iter().copied().take_while(|&pl| pl <= var_95).collect();
    let cvar_95 = if tail.is_empty() { var_95 } else { mean(&tail) };

    RiskMetrics {
        var_95,
        cvar_95,
        max_drawdown: s.first().copied().unwrap_or(0.0),
        upside_potential: percentile_sorted(&s, 95.0),
    }
}
