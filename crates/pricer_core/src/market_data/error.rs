//! Market data error types.
//!
//! This module provides structured error handling for yield curve and FX
//! operations. All variants are raised at construction or lookup time;
//! nothing in this crate fails silently.

use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative time to maturity, or a non-increasing pillar
/// - `OutOfBounds`: Query outside the curve domain with extrapolation disabled
/// - `InsufficientData`: Not enough pillar points for construction
/// - `InvalidParameter`: Malformed calibration input (e.g. non-positive decay)
/// - `InvalidSpot`: Non-positive or non-finite FX spot
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time or unsorted pillar).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Query point outside valid domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Malformed curve or estimator parameter.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// FX spot must be positive and finite.
    #[error("Invalid FX spot: {spot}")]
    InvalidSpot {
        /// The rejected spot value
        spot: f64,
    },
}
