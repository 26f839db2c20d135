//! Solver error types.

use pricer_pricing::mc::SimulationError;
use thiserror::Error;

/// Errors raised while setting up a solve.
///
/// Non-convergence is not an error: it is reported through
/// [`FairCouponResult::converged`](crate::fair_coupon::FairCouponResult::converged).
///
/// # Examples
///
/// ```
/// use pricer_optimiser::SolverError;
///
/// let err = SolverError::InvalidBounds { lower: 0.5, upper: 0.1 };
/// assert!(err.to_string().contains("0.5"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Lower bound not strictly below the upper bound, or non-finite.
    #[error("Invalid bounds [{lower}, {upper}]")]
    InvalidBounds {
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// Bounds vectors of different lengths or empty.
    #[error("Bounds dimension mismatch: {lower} lower vs {upper} upper")]
    BoundsDimension {
        /// Length of the lower bounds
        lower: usize,
        /// Length of the upper bounds
        upper: usize,
    },

    /// A solver setting is out of range.
    #[error("Invalid setting '{name}': {reason}")]
    InvalidSetting {
        /// Setting name
        name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Target price must be positive and finite.
    #[error("Invalid target price {0}")]
    InvalidTarget(f64),

    /// Generating or pricing an ensemble failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}
