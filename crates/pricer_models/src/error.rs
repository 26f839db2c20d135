//! Model and deal-term error types.
//!
//! Every variant is raised at construction time. Once a model or deal has
//! been built, simulation never re-validates it.

use crate::models::correlation::CorrelationError;
use pricer_core::market_data::MarketDataError;
use thiserror::Error;

/// Errors raised while building model parameters or deal terms.
///
/// # Examples
///
/// ```
/// use pricer_models::ModelError;
///
/// let err = ModelError::InvalidDealTerms {
///     field: "principal",
///     reason: "must be positive, got -1".to_string(),
/// };
/// assert!(format!("{}", err).contains("principal"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// GARCH coefficients rejected.
    #[error("Invalid GARCH parameters: {reason}")]
    InvalidGarch {
        /// Description of the rejected coefficient
        reason: String,
    },

    /// DCC persistence pair or target rejected.
    #[error("Invalid DCC parameters: {reason}")]
    InvalidDcc {
        /// Description of the rejected parameter
        reason: String,
    },

    /// Collections that must be index-aligned have different lengths.
    #[error("Dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Which collection is misaligned
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Underlying specification rejected.
    #[error("Invalid underlying '{symbol}': {reason}")]
    InvalidUnderlying {
        /// Underlying symbol
        symbol: String,
        /// Description of the problem
        reason: String,
    },

    /// Deal terms rejected.
    #[error("Invalid deal terms, field '{field}': {reason}")]
    InvalidDealTerms {
        /// Offending field
        field: &'static str,
        /// Description of the problem
        reason: String,
    },

    /// Correlation target rejected.
    #[error(transparent)]
    Correlation(#[from] CorrelationError),

    /// Curve or FX construction failed.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
}
