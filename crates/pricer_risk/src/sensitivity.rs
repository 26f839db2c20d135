//! Coupon and volatility sensitivity sweeps.
//!
//! Coupon sweeps reprice a pre-simulated ensemble, which is exact because
//! exercise timing does not depend on the coupon. Volatility sweeps need a
//! fresh simulation per point.

use pricer_models::instruments::SimulationConfig;
use pricer_models::models::DccGarchModel;
use pricer_models::underlying::UnderlyingSpec;
use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
use pricer_pricing::presim::{calculate_price_from_presimulated, PreSimulatedEnsemble};
use rayon::prelude::*;

use crate::error::RiskError;

/// One point of a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityPoint {
    /// Swept input (coupon per period or volatility factor)
    pub input: f64,
    /// Mean present value
    pub price: f64,
    /// `principal − price`
    pub margin: f64,
}

/// Price and margin for each flat coupon in `coupons`.
///
/// # Errors
///
/// Propagates [`calculate_price_from_presimulated`] failures.
///
/// # Example
///
/// ```
/// use pricer_pricing::presim::{PreSimulatedEnsemble, PreSimulatedPath};
/// use pricer_risk::sensitivity::coupon_sensitivity;
///
/// // One path calling at period 1 with no discounting
/// let path = PreSimulatedPath {
///     exercise_period: 1,
///     exercise_day: 126,
///     pv_discount_factor: 1.0,
///     coupon_periods: vec![1],
/// };
/// let ensemble = PreSimulatedEnsemble::new(vec![path], 2, 1000.0, 0);
///
/// let points = coupon_sensitivity(&ensemble, &[0.0, 0.1], 1000.0).unwrap();
/// assert!((points[1].price - 1100.0).abs() < 1e-9);
/// assert!((points[1].margin + 100.0).abs() < 1e-9);
/// ```
pub fn coupon_sensitivity(
    ensemble: &PreSimulatedEnsemble,
    coupons: &[f64],
    principal: f64,
) -> Result<Vec<SensitivityPoint>, RiskError> {
    let n = ensemble.num_observations();
    coupons
        .iter()
        .map(|&coupon| {
            let price = calculate_price_from_presimulated(ensemble, &vec![coupon; n], principal)?;
            Ok(SensitivityPoint {
                input: coupon,
                price,
                margin: principal - price,
            })
        })
        .collect()
}

/// Price and margin with volatility scaled by each factor.
///
/// # Errors
///
/// `RiskError::InvalidCostModel` for a non-positive factor, or simulator
/// setup failures.
pub fn volatility_sensitivity(
    underlyings: &[UnderlyingSpec],
    model: &DccGarchModel,
    deal: &SimulationConfig,
    mc: &MonteCarloConfig,
    factors: &[f64],
) -> Result<Vec<SensitivityPoint>, RiskError> {
    let principal = deal.principal();
    factors
        .par_iter()
        .map(|&factor| {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(RiskError::InvalidCostModel {
                    field: "volatility_factor",
                    reason: format!("{factor} must be positive"),
                });
            }
            let scaled = model.scale_volatility(factor);
            let price = PathSimulator::new(underlyings, &scaled, deal, mc)?
                .simulate()
                .price();
            Ok(SensitivityPoint {
                input: factor,
                price,
                margin: principal - price,
            })
        })
        .collect()
}
