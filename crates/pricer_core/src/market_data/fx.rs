//! Covered interest parity between the domestic (BRL) and foreign (USD) curves.
//!
//! Quotes are domestic units per foreign unit (BRL per USD).

use super::curves::YieldCurve;
use super::error::MarketDataError;
use num_traits::Float;

/// FX forward by covered interest parity.
///
/// ```text
/// F(τ) = S · exp((r_d − r_f) · τ)
/// ```
///
/// # Arguments
///
/// * `spot` - Spot rate, domestic per foreign
/// * `r_domestic` - Domestic continuously compounded zero rate for τ
/// * `r_foreign` - Foreign continuously compounded zero rate for τ
/// * `tau` - Time to delivery in years
///
/// # Example
///
/// ```
/// use pricer_core::market_data::fx::forward_rate;
///
/// let f = forward_rate(5.0_f64, 0.10, 0.05, 0.5);
/// assert!((f - 5.0 * (0.025_f64).exp()).abs() < 1e-12);
/// ```
#[inline]
pub fn forward_rate<T: Float>(spot: T, r_domestic: T, r_foreign: T, tau: T) -> T {
    spot * ((r_domestic - r_foreign) * tau).exp()
}

/// FX forward reading both zero rates off curves at tenor `tau`.
///
/// # Errors
///
/// Propagates curve lookup failures.
pub fn forward_from_curves<T, D, F>(
    spot: T,
    domestic: &D,
    foreign: &F,
    tau: T,
) -> Result<T, MarketDataError>
where
    T: Float,
    D: YieldCurve<T> + ?Sized,
    F: YieldCurve<T> + ?Sized,
{
    let r_d = domestic.zero_rate(tau)?;
    let r_f = foreign.zero_rate(tau)?;
    Ok(forward_rate(spot, r_d, r_f, tau))
}

/// Heuristic BRL/USD spot estimate used when no market quote is supplied.
///
/// The estimate moves a fixed reference level by a damped function of the
/// one-year rate differential:
///
/// ```text
/// S ≈ reference_level · exp(damping · (r_d(tenor) − r_f(tenor)))
/// ```
///
/// This is a fallback to keep a pricing run going without a quote. It carries
/// no market information beyond the two curves and should not be mistaken
/// for a fair value of the currency pair. Supply a real spot whenever one is
/// available.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::FlatCurve;
/// use pricer_core::market_data::fx::SpotEstimator;
///
/// let estimator = SpotEstimator::default();
/// let spot = estimator
///     .estimate(&FlatCurve::new(0.10_f64), &FlatCurve::new(0.05_f64))
///     .unwrap();
///
/// assert!((spot - 5.0 * (0.3_f64 * 0.05).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpotEstimator {
    /// Anchor level for the pair (domestic per foreign)
    pub reference_level: f64,
    /// Fraction of the rate differential passed through to the level
    pub damping: f64,
    /// Tenor (years) at which the differential is read
    pub tenor_years: f64,
}

impl Default for SpotEstimator {
    fn default() -> Self {
        Self {
            reference_level: 5.0,
            damping: 0.3,
            tenor_years: 1.0,
        }
    }
}

impl SpotEstimator {
    /// Estimate the spot rate from the two curves.
    ///
    /// # Errors
    ///
    /// * `MarketDataError::InvalidSpot` - Non-positive or non-finite reference level
    /// * Curve lookup failures at `tenor_years`
    pub fn estimate<D, F>(&self, domestic: &D, foreign: &F) -> Result<f64, MarketDataError>
    where
        D: YieldCurve<f64> + ?Sized,
        F: YieldCurve<f64> + ?Sized,
    {
        if !(self.reference_level.is_finite() && self.reference_level > 0.0) {
            return Err(MarketDataError::InvalidSpot {
                spot: self.reference_level,
            });
        }
        let r_d = domestic.zero_rate(self.tenor_years)?;
        let r_f = foreign.zero_rate(self.tenor_years)?;
        Ok(self.reference_level * (self.damping * (r_d - r_f)).exp())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::curves::{CurveEnum, FlatCurve, NelsonSiegelSvensson};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    // ========================================
    // Forward Tests
    // ========================================

    #[test]
    fn test_forward_at_zero_tenor_is_spot() {
        assert_eq!(forward_rate(5.2_f64, 0.12, 0.04, 0.0), 5.2);
    }

    #[test]
    fn test_forward_from_curves_matches_rates() {
        let brl = NelsonSiegelSvensson::new(0.13_f64, -0.02, 0.01, 0.0, 1.5, 4.0).unwrap();
        let usd = CurveEnum::flat(0.045_f64);
        let tau = 0.75;
        let expected = forward_rate(
            5.0,
            brl.zero_rate(tau).unwrap(),
            usd.zero_rate(tau).unwrap(),
            tau,
        );
        assert_eq!(forward_from_curves(5.0, &brl, &usd, tau).unwrap(), expected);
    }

    // ========================================
    // Spot Estimator Tests
    // ========================================

    #[test]
    fn test_estimator_zero_differential_returns_reference() {
        let curve = FlatCurve::new(0.07_f64);
        let spot = SpotEstimator::default().estimate(&curve, &curve).unwrap();
        assert_relative_eq!(spot, 5.0, epsilon = 1e-15);
    }

    #[test]
    fn test_estimator_rejects_bad_reference() {
        let estimator = SpotEstimator {
            reference_level: 0.0,
            ..SpotEstimator::default()
        };
        let curve = FlatCurve::new(0.07_f64);
        assert!(matches!(
            estimator.estimate(&curve, &curve),
            Err(MarketDataError::InvalidSpot { .. })
        ));
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        #[test]
        fn prop_forward_identity(
            spot in 0.5_f64..20.0,
            r_d in -0.05_f64..0.3,
            r_f in -0.05_f64..0.3,
            tau in 0.0_f64..10.0,
        ) {
            let f = forward_rate(spot, r_d, r_f, tau);
            let expected = spot * ((r_d - r_f) * tau).exp();
            prop_assert!((f - expected).abs() <= 1e-10 * expected.max(1.0));
        }

        #[test]
        fn prop_forward_increasing_in_domestic_rate(
            spot in 0.5_f64..20.0,
            r_d in -0.05_f64..0.3,
            bump in 1e-4_f64..0.1,
            r_f in -0.05_f64..0.3,
            tau in 0.01_f64..10.0,
        ) {
            let lo = forward_rate(spot, r_d, r_f, tau);
            let hi = forward_rate(spot, r_d + bump, r_f, tau);
            prop_assert!(hi > lo);
        }
    }
}
