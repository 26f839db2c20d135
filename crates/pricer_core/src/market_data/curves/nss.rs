//! Nelson-Siegel-Svensson parametric yield curve.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Nelson-Siegel-Svensson zero curve.
///
/// Six parameters: level `beta0`, slope `beta1`, two curvature terms
/// `beta2`/`beta3`, and two decay constants `tau1`/`tau2` (years).
///
/// ```text
/// x1 = t / tau1,  x2 = t / tau2
/// r(t) = beta0
///      + beta1 * (1 - e^-x1) / x1
///      + beta2 * ((1 - e^-x1) / x1 - e^-x1)
///      + beta3 * ((1 - e^-x2) / x2 - e^-x2)
/// ```
///
/// As `t -> 0` the loading functions tend to `(1, 1, 0, 0)`, so the short end
/// is the instantaneous rate `beta0 + beta1`, which is returned for `t <= 0`.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, NelsonSiegelSvensson};
///
/// let brl = NelsonSiegelSvensson::new(0.13_f64, -0.02, 0.01, -0.005, 1.5, 5.0).unwrap();
///
/// assert!((brl.zero_rate(0.0).unwrap() - 0.11).abs() < 1e-12);
/// assert_eq!(brl.discount_factor(0.0).unwrap(), 1.0);
///
/// // Long end converges towards beta0
/// let r_long = brl.zero_rate(200.0).unwrap();
/// assert!((r_long - 0.13).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NelsonSiegelSvensson<T: Float> {
    beta0: T,
    beta1: T,
    beta2: T,
    beta3: T,
    tau1: T,
    tau2: T,
}

impl<T: Float> NelsonSiegelSvensson<T> {
    /// Construct a curve from calibrated parameters.
    ///
    /// # Errors
    ///
    /// `MarketDataError::InvalidParameter` if any parameter is non-finite or
    /// either decay constant is not strictly positive.
    pub fn new(
        beta0: T,
        beta1: T,
        beta2: T,
        beta3: T,
        tau1: T,
        tau2: T,
    ) -> Result<Self, MarketDataError> {
        let betas = [
            ("beta0", beta0),
            ("beta1", beta1),
            ("beta2", beta2),
            ("beta3", beta3),
        ];
        for (name, value) in betas {
            if !value.is_finite() {
                return Err(MarketDataError::InvalidParameter {
                    name,
                    reason: "must be finite".to_string(),
                });
            }
        }

        for (name, value) in [("tau1", tau1), ("tau2", tau2)] {
            if !(value.is_finite() && value > T::zero()) {
                return Err(MarketDataError::InvalidParameter {
                    name,
                    reason: format!(
                        "decay constant must be positive, got {}",
                        value.to_f64().unwrap_or(f64::NAN)
                    ),
                });
            }
        }

        Ok(Self {
            beta0,
            beta1,
            beta2,
            beta3,
            tau1,
            tau2,
        })
    }

    /// Parameters as `[beta0, beta1, beta2, beta3, tau1, tau2]`.
    pub fn params(&self) -> [T; 6] {
        [
            self.beta0, self.beta1, self.beta2, self.beta3, self.tau1, self.tau2,
        ]
    }

    /// Instantaneous short rate `beta0 + beta1`.
    #[inline]
    pub fn short_rate(&self) -> T {
        self.beta0 + self.beta1
    }

    /// Slope and curvature loadings for `x = t / tau`, `x > 0`.
    #[inline]
    fn loadings(x: T) -> (T, T) {
        let decay = (-x).exp();
        let slope = (T::one() - decay) / x;
        (slope, slope - decay)
    }
}

impl<T: Float> YieldCurve<T> for NelsonSiegelSvensson<T> {
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Ok(self.short_rate());
        }

        let (slope1, curve1) = Self::loadings(t / self.tau1);
        let (_, curve2) = Self::loadings(t / self.tau2);

        Ok(self.beta0 + self.beta1 * slope1 + self.beta2 * curve1 + self.beta3 * curve2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn brl() -> NelsonSiegelSvensson<f64> {
        NelsonSiegelSvensson::new(0.1350, -0.0250, 0.0200, -0.0100, 1.2, 4.0).unwrap()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_rejects_non_positive_decay() {
        let err = NelsonSiegelSvensson::new(0.1_f64, 0.0, 0.0, 0.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::InvalidParameter { name: "tau1", .. }
        ));

        let err = NelsonSiegelSvensson::new(0.1_f64, 0.0, 0.0, 0.0, 1.0, -2.0).unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::InvalidParameter { name: "tau2", .. }
        ));
    }

    #[test]
    fn test_rejects_non_finite_beta() {
        let err = NelsonSiegelSvensson::new(f64::NAN, 0.0, 0.0, 0.0, 1.0, 1.0).unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::InvalidParameter { name: "beta0", .. }
        ));
    }

    // ========================================
    // Rate Tests
    // ========================================

    #[test]
    fn test_short_end_limit() {
        let curve = brl();
        assert_relative_eq!(curve.zero_rate(0.0).unwrap(), 0.11, epsilon = 1e-12);
        assert_relative_eq!(curve.zero_rate(-1.0).unwrap(), 0.11, epsilon = 1e-12);
        // Continuity near zero
        assert_relative_eq!(curve.zero_rate(1e-8).unwrap(), 0.11, epsilon = 1e-8);
    }

    #[test]
    fn test_known_value() {
        let curve = NelsonSiegelSvensson::new(0.10_f64, -0.02, 0.03, 0.01, 1.0, 2.0).unwrap();
        let t = 1.0_f64;
        let x1 = t / 1.0;
        let x2 = t / 2.0;
        let l1 = (1.0 - (-x1).exp()) / x1;
        let l2 = l1 - (-x1).exp();
        let l3 = (1.0 - (-x2).exp()) / x2 - (-x2).exp();
        let expected = 0.10 - 0.02 * l1 + 0.03 * l2 + 0.01 * l3;
        assert_relative_eq!(curve.zero_rate(t).unwrap(), expected, epsilon = 1e-14);
    }

    #[test]
    fn test_level_only_curve_is_flat() {
        let curve = NelsonSiegelSvensson::new(0.07_f64, 0.0, 0.0, 0.0, 1.0, 3.0).unwrap();
        for t in [0.1, 0.5, 1.0, 10.0] {
            assert_relative_eq!(curve.zero_rate(t).unwrap(), 0.07, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_discount_factor() {
        let curve = brl();
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
        let r = curve.zero_rate(2.0).unwrap();
        assert_relative_eq!(
            curve.discount_factor(2.0).unwrap(),
            (-r * 2.0).exp(),
            epsilon = 1e-14
        );
    }
}
