//! Error types for the Monte Carlo engine.
//!
//! Configuration errors are raised by builders; simulation errors wrap the
//! lower layers' construction failures. Numerical degeneracy inside a path
//! is never an error.

use pricer_core::market_data::MarketDataError;
use pricer_models::ModelError;
use thiserror::Error;

/// Configuration error for the Monte Carlo engine.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    #[error("Invalid path count {0}: must be in range [1, 10_000_000]")]
    InvalidPathCount(usize),

    /// Invalid parameter value with name and description.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the invalid value.
        value: String,
    },
}

/// Errors raised while setting up or aggregating a simulation.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Invalid Monte Carlo configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid model or deal terms.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Curve lookup failed while precomputing rates or discount factors.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    /// Underlyings and model disagree on the number of assets.
    #[error("Asset count mismatch: {underlyings} underlyings, {model} modelled assets")]
    AssetCountMismatch {
        /// Number of underlyings
        underlyings: usize,
        /// Model dimension
        model: usize,
    },

    /// Coupon schedule length differs from the observation count.
    #[error("Coupon schedule has {got} entries, expected {expected}")]
    CouponScheduleMismatch {
        /// Number of observations
        expected: usize,
        /// Supplied coupon count
        got: usize,
    },

    /// An operation needs at least one path.
    #[error("Ensemble is empty")]
    EmptyEnsemble,
}
