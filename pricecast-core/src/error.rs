//! Errors for invalid simulation inputs.
//!
//! These are the only fatal conditions in the engine. Every other anomaly
//! (short history, degenerate correlations, too few jumps) degrades to a
//! documented default instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("current price must be finite and > 0, got {0}")]
    InvalidPrice(f64),

    #[error("path count must be > 0")]
    InvalidPathCount,

    #[error("horizon must be at least one step")]
    InvalidHorizon,

    #[error("ensemble of {path_count} paths x {horizon_days} steps is too large to allocate")]
    EnsembleTooLarge {
        path_count: usize,
        horizon_days: usize,
    },

    #[error("steps per year must be finite and > 0, got {0}")]
    InvalidStepsPerYear(f64),

    #[error("drift must be finite, got {0}")]
    InvalidDrift(f64),

    #[error("volatility must be finite and >= 0, got {0}")]
    InvalidVolatility(f64),

    #[error("invalid jump parameter {field}: {value}")]
    InvalidJump { field: &'static str, value: f64 },

    #[error("investment amount must be finite and > 0, got {0}")]
    InvalidInvestment(f64),
}
