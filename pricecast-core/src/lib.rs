//! PriceCast Core: indicators, estimators, and the Monte Carlo price engine.
//!
//! This crate is a pure computation library. It does no I/O:
//! - Domain types (bars, price and return series, macro benchmarks)
//! - Close-series indicators and the momentum snapshot
//! - Correlation and jump estimators
//! - Parameter adjustment and the jump-diffusion path simulator
//! - Terminal-distribution statistics, chart data, and signal labels

pub mod charts;
pub mod correlation;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod jump;
pub mod momentum;
pub mod outcome;
pub mod params;
pub mod rng;
pub mod signals;
pub mod simulation;
pub mod stats;

/// Trading days per calendar year used for annualization and the time step.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
