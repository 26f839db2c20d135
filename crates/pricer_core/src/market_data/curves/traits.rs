//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Generic yield curve trait for zero rate and discount factor calculations.
///
/// All implementations are generic over `T: Float`.
///
/// # Contract
///
/// - `zero_rate(t)` returns the continuously compounded zero rate r(t).
///   For `t <= 0` it returns the short-end limit of the curve, so `r(0)`
///   is always well-defined.
/// - `discount_factor(t)` returns `exp(-r(t) * t)` for `t > 0` and exactly
///   `1` at `t = 0`.
/// - `forward_rate(t1, t2)` returns the forward rate between t1 and t2
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.05_f64);
///
/// let df = curve.discount_factor(1.0).unwrap();
/// assert!((df - 0.951229).abs() < 1e-5);
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
///
/// let fwd = curve.forward_rate(1.0, 2.0).unwrap();
/// assert!((fwd - 0.05).abs() < 1e-10);
/// ```
pub trait YieldCurve<T: Float> {
    /// Return the continuously compounded zero rate for maturity `t` (years).
    ///
    /// # Returns
    ///
    /// * `Ok(r(t))` - Zero rate at time t (short-end limit for `t <= 0`)
    /// * `Err(MarketDataError::OutOfBounds)` - Outside the domain of a curve
    ///   built without extrapolation
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the discount factor for maturity `t`.
    ///
    /// # Returns
    ///
    /// * `Ok(D(t))` - Discount factor at time t
    /// * `Err(MarketDataError::InvalidMaturity)` - If t < 0
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// D(0) = 1
    /// D(t) = exp(-r(t) * t)
    /// ```
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError> {
        if t < T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        if t == T::zero() {
            return Ok(T::one());
        }
        let r = self.zero_rate(t)?;
        Ok((-r * t).exp())
    }

    /// Return the forward rate between t1 and t2.
    ///
    /// # Returns
    ///
    /// * `Ok(f(t1, t2))` - Forward rate between t1 and t2
    /// * `Err(MarketDataError::InvalidMaturity)` - If t2 <= t1
    ///
    /// # Default Implementation
    ///
    /// ```text
    /// f(t1, t2) = -ln(D(t2) / D(t1)) / (t2 - t1)
    /// ```
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Linear term structure for exercising the default methods
    struct MockCurve {
        short: f64,
        slope: f64,
    }

    impl YieldCurve<f64> for MockCurve {
        fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError> {
            Ok(self.short + self.slope * t.max(0.0))
        }
    }

    #[test]
    fn test_default_discount_factor() {
        let curve = MockCurve {
            short: 0.05,
            slope: 0.0,
        };
        let df = curve.discount_factor(2.0).unwrap();
        assert!((df - (-0.10_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_default_discount_factor_at_zero_is_exactly_one() {
        let curve = MockCurve {
            short: 0.30,
            slope: 0.01,
        };
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_default_discount_factor_negative_maturity() {
        let curve = MockCurve {
            short: 0.05,
            slope: 0.0,
        };
        match curve.discount_factor(-1.0).unwrap_err() {
            MarketDataError::InvalidMaturity { t } => assert_eq!(t, -1.0),
            _ => panic!("Expected InvalidMaturity error"),
        }
    }

    #[test]
    fn test_default_forward_rate_upward_curve() {
        let curve = MockCurve {
            short: 0.05,
            slope: 0.01,
        };
        // r(1) = 0.06, r(2) = 0.07 -> f(1,2) = 2*0.07 - 0.06 = 0.08
        let f = curve.forward_rate(1.0, 2.0).unwrap();
        assert!((f - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_default_forward_rate_invalid() {
        let curve = MockCurve {
            short: 0.05,
            slope: 0.0,
        };
        assert!(curve.forward_rate(2.0, 1.0).is_err());
        assert!(curve.forward_rate(1.0, 1.0).is_err());
    }
}
