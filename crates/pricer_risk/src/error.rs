//! Risk error types.

use pricer_models::ModelError;
use pricer_optimiser::SolverError;
use pricer_pricing::mc::SimulationError;
use thiserror::Error;

/// Errors that can occur during margin and capital analysis.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// A cost or capital parameter is out of range.
    #[error("Invalid cost model parameter '{field}': {reason}")]
    InvalidCostModel {
        /// Parameter name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// Confidence level outside (0, 1).
    #[error("Invalid confidence level {0}: must be in (0, 1)")]
    InvalidConfidence(f64),

    /// No paths to measure.
    #[error("Payoff distribution is empty")]
    EmptyDistribution,

    /// Scenario shock rejected by the model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Simulation setup failed.
    #[error(transparent)]
    Simulation(#[from] SimulationError),

    /// Fair-coupon solver setup failed.
    #[error(transparent)]
    Solver(#[from] SolverError),
}
