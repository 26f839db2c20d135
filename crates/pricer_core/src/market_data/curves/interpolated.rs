//! Interpolated yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Interpolation method for yield curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveInterpolation {
    /// Linear interpolation on zero rates.
    #[default]
    Linear,

    /// Log-linear interpolation on discount factors.
    ///
    /// Equivalent to a piecewise constant forward rate between pillars.
    LogLinear,
}

/// Interpolated yield curve from a maturity/rate table.
///
/// Stores sorted (tenor, zero rate) pillars. Between pillars the configured
/// [`CurveInterpolation`] applies; outside the table the edge rate is held
/// flat when extrapolation is allowed. The short end (`t <= 0`) always
/// returns the first pillar rate.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, InterpolatedCurve, CurveInterpolation};
///
/// let tenors: [f64; 5] = [0.25, 0.5, 1.0, 2.0, 5.0];
/// let rates = [0.052, 0.051, 0.049, 0.045, 0.042];
///
/// let curve = InterpolatedCurve::new(&tenors, &rates, CurveInterpolation::Linear, true).unwrap();
///
/// let r = curve.zero_rate(0.75).unwrap();
/// assert!((r - 0.050).abs() < 1e-12);
///
/// // Flat edge extrapolation
/// assert_eq!(curve.zero_rate(10.0).unwrap(), 0.042);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolatedCurve<T: Float> {
    /// Sorted tenor points (years)
    tenors: Vec<T>,
    /// Corresponding zero rates
    rates: Vec<T>,
    /// Interpolation method
    method: CurveInterpolation,
    /// Whether to allow flat extrapolation
    allow_extrapolation: bool,
}

impl<T: Float> InterpolatedCurve<T> {
    /// Construct an interpolated curve from pillar points.
    ///
    /// # Arguments
    ///
    /// * `tenors` - Strictly increasing, positive tenors in years (at least 2)
    /// * `rates` - Corresponding continuously compounded zero rates
    /// * `method` - Interpolation method to use
    /// * `allow_extrapolation` - Whether to hold edge rates flat beyond the table
    ///
    /// # Errors
    ///
    /// * `MarketDataError::InsufficientData` - Fewer than 2 pillars or length mismatch
    /// * `MarketDataError::InvalidMaturity` - Non-positive or unsorted tenor
    /// * `MarketDataError::InvalidParameter` - Non-finite rate
    pub fn new(
        tenors: &[T],
        rates: &[T],
        method: CurveInterpolation,
        allow_extrapolation: bool,
    ) -> Result<Self, MarketDataError> {
        if tenors.len() < 2 {
            return Err(MarketDataError::InsufficientData {
                got: tenors.len(),
                need: 2,
            });
        }

        if tenors.len() != rates.len() {
            return Err(MarketDataError::InsufficientData {
                got: rates.len(),
                need: tenors.len(),
            });
        }

        for (i, &tenor) in tenors.iter().enumerate() {
            if tenor <= T::zero() || (i > 0 && tenor <= tenors[i - 1]) {
                return Err(MarketDataError::InvalidMaturity {
                    t: tenor.to_f64().unwrap_or(0.0),
                });
            }
        }

        if let Some(bad) = rates.iter().find(|r| !r.is_finite()) {
            return Err(MarketDataError::InvalidParameter {
                name: "rates",
                reason: format!("non-finite rate {}", bad.to_f64().unwrap_or(f64::NAN)),
            });
        }

        Ok(Self {
            tenors: tenors.to_vec(),
            rates: rates.to_vec(),
            method,
            allow_extrapolation,
        })
    }

    /// Return the tenor domain `(t_min, t_max)`.
    #[inline]
    pub fn domain(&self) -> (T, T) {
        (self.tenors[0], self.tenors[self.tenors.len() - 1])
    }

    /// Return the interpolation method.
    #[inline]
    pub fn method(&self) -> CurveInterpolation {
        self.method
    }

    /// Return whether extrapolation is allowed.
    #[inline]
    pub fn allow_extrapolation(&self) -> bool {
        self.allow_extrapolation
    }

    /// Pillar tenors.
    pub fn tenors(&self) -> &[T] {
        &self.tenors
    }

    /// Pillar zero rates.
    pub fn rates(&self) -> &[T] {
        &self.rates
    }

    /// Index `i` such that `tenors[i] <= t < tenors[i + 1]`, for `t` inside the domain.
    fn bracket(&self, t: T) -> usize {
        let upper = self.tenors.partition_point(|&x| x <= t);
        upper.clamp(1, self.tenors.len() - 1) - 1
    }

    /// Rate at `t` for a `t` inside the domain.
    fn interior_rate(&self, t: T) -> T {
        let i = self.bracket(t);
        let (t0, t1) = (self.tenors[i], self.tenors[i + 1]);
        let (r0, r1) = (self.rates[i], self.rates[i + 1]);
        let w = (t - t0) / (t1 - t0);

        match self.method {
            CurveInterpolation::Linear => r0 + w * (r1 - r0),
            CurveInterpolation::LogLinear => {
                // ln D is linear in t; convert back to a zero rate
                let log_df = -r0 * t0 + w * (-r1 * t1 + r0 * t0);
                -log_df / t
            }
        }
    }
}

impl<T: Float> YieldCurve<T> for InterpolatedCurve<T> {
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        let (t_min, t_max) = self.domain();
        let last = self.rates.len() - 1;

        if t <= T::zero() {
            return Ok(self.rates[0]);
        }

        if t < t_min || t > t_max {
            if !self.allow_extrapolation {
                return Err(MarketDataError::OutOfBounds {
                    x: t.to_f64().unwrap_or(0.0),
                    min: t_min.to_f64().unwrap_or(0.0),
                    max: t_max.to_f64().unwrap_or(0.0),
                });
            }
            return Ok(if t < t_min {
                self.rates[0]
            } else {
                self.rates[last]
            });
        }

        Ok(self.interior_rate(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd_table() -> InterpolatedCurve<f64> {
        InterpolatedCurve::new(
            &[0.5, 1.0, 2.0],
            &[0.02, 0.04, 0.04],
            CurveInterpolation::Linear,
            true,
        )
        .unwrap()
    }

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_new_insufficient_data() {
        let result = InterpolatedCurve::new(&[1.0_f64], &[0.02], CurveInterpolation::Linear, false);
        match result.unwrap_err() {
            MarketDataError::InsufficientData { got, need } => {
                assert_eq!(got, 1);
                assert_eq!(need, 2);
            }
            _ => panic!("Expected InsufficientData error"),
        }
    }

    #[test]
    fn test_new_mismatched_lengths() {
        let result = InterpolatedCurve::new(
            &[0.5_f64, 1.0, 2.0],
            &[0.02, 0.025],
            CurveInterpolation::Linear,
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_unsorted_tenors() {
        let result = InterpolatedCurve::new(
            &[1.0_f64, 0.5, 2.0],
            &[0.02, 0.025, 0.03],
            CurveInterpolation::Linear,
            false,
        );
        assert!(matches!(
            result,
            Err(MarketDataError::InvalidMaturity { .. })
        ));
    }

    #[test]
    fn test_new_non_finite_rate() {
        let result = InterpolatedCurve::new(
            &[0.5_f64, 1.0],
            &[0.02, f64::NAN],
            CurveInterpolation::Linear,
            false,
        );
        assert!(matches!(
            result,
            Err(MarketDataError::InvalidParameter { .. })
        ));
    }

    // ========================================
    // Linear Interpolation Tests
    // ========================================

    #[test]
    fn test_linear_at_pillars_and_midpoint() {
        let curve = usd_table();
        assert!((curve.zero_rate(0.5).unwrap() - 0.02).abs() < 1e-12);
        assert!((curve.zero_rate(2.0).unwrap() - 0.04).abs() < 1e-12);
        assert!((curve.zero_rate(0.75).unwrap() - 0.03).abs() < 1e-12);
    }

    #[test]
    fn test_edge_extrapolation() {
        let curve = usd_table();
        assert_eq!(curve.zero_rate(0.1).unwrap(), 0.02);
        assert_eq!(curve.zero_rate(0.0).unwrap(), 0.02);
        assert_eq!(curve.zero_rate(30.0).unwrap(), 0.04);
        assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    }

    #[test]
    fn test_out_of_bounds_without_extrapolation() {
        let curve = InterpolatedCurve::new(
            &[0.5_f64, 1.0],
            &[0.02, 0.03],
            CurveInterpolation::Linear,
            false,
        )
        .unwrap();
        assert!(matches!(
            curve.zero_rate(3.0),
            Err(MarketDataError::OutOfBounds { .. })
        ));
    }

    // ========================================
    // Log-Linear Interpolation Tests
    // ========================================

    #[test]
    fn test_log_linear_matches_pillars() {
        let curve = InterpolatedCurve::new(
            &[0.5_f64, 1.0, 2.0],
            &[0.02, 0.03, 0.04],
            CurveInterpolation::LogLinear,
            true,
        )
        .unwrap();
        assert!((curve.zero_rate(1.0).unwrap() - 0.03).abs() < 1e-12);
        assert!((curve.zero_rate(2.0).unwrap() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_log_linear_constant_forward() {
        let curve = InterpolatedCurve::new(
            &[1.0_f64, 2.0],
            &[0.03, 0.04],
            CurveInterpolation::LogLinear,
            true,
        )
        .unwrap();
        // Forward between pillars is 2*0.04 - 0.03 = 0.05 everywhere
        let f1 = curve.forward_rate(1.0, 1.5).unwrap();
        let f2 = curve.forward_rate(1.5, 2.0).unwrap();
        assert!((f1 - 0.05).abs() < 1e-10);
        assert!((f2 - 0.05).abs() < 1e-10);
    }
}
