//! Pre-simulated path ensembles.
//!
//! Whether a path autocalls depends only on its prices, never on the coupon
//! rate. A [`PreSimulatedPath`] therefore stores exercise timing and the
//! discount factor of the cash-flow date, and any coupon schedule can be
//! priced against the ensemble without resimulating.

use crate::mc::{PathOutcome, SimulationError};

/// Timing record of one simulated path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreSimulatedPath {
    /// 1-based exercise period, 0 when held to maturity
    pub exercise_period: usize,
    /// Trading day of exercise, 0 when held to maturity
    pub exercise_day: usize,
    /// Multiplier from nominal to present value at the cash-flow date
    pub pv_discount_factor: f64,
    /// Periods at which a coupon accrues: `1..=k` if exercised at `k`,
    /// every period otherwise
    pub coupon_periods: Vec<usize>,
}

impl PreSimulatedPath {
    /// Build the timing record of a full-simulation outcome.
    pub fn from_outcome(outcome: &PathOutcome, num_observations: usize) -> Self {
        let last = if outcome.exercise_period > 0 {
            outcome.exercise_period
        } else {
            num_observations
        };
        Self {
            exercise_period: outcome.exercise_period,
            exercise_day: outcome.exercise_day,
            pv_discount_factor: outcome.pv_factor,
            coupon_periods: (1..=last).collect(),
        }
    }

    /// Whether the path redeems early.
    #[inline]
    pub fn is_exercised(&self) -> bool {
        self.exercise_period > 0
    }

    /// Present value of this path under `coupons`.
    ///
    /// Coupons accrued on a path that never exercises are forfeited.
    #[inline]
    pub fn present_value(&self, coupons: &[f64], principal: f64) -> f64 {
        if !self.is_exercised() {
            return principal * self.pv_discount_factor;
        }
        let accrued: f64 = self.coupon_periods.iter().map(|&k| coupons[k - 1]).sum();
        principal * (1.0 + accrued) * self.pv_discount_factor
    }
}

/// Timing ensemble generated by one simulator run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreSimulatedEnsemble {
    paths: Vec<PreSimulatedPath>,
    num_observations: usize,
    principal: f64,
    seed: u64,
}

impl PreSimulatedEnsemble {
    /// Assemble an ensemble.
    pub fn new(
        paths: Vec<PreSimulatedPath>,
        num_observations: usize,
        principal: f64,
        seed: u64,
    ) -> Self {
        Self {
            paths,
            num_observations,
            principal,
            seed,
        }
    }

    /// Paths in simulation order.
    pub fn paths(&self) -> &[PreSimulatedPath] {
        &self.paths
    }

    /// Number of paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the ensemble holds no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Observation count of the deal the ensemble was drawn for.
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// Principal of the deal the ensemble was drawn for.
    pub fn principal(&self) -> f64 {
        self.principal
    }

    /// Base seed of the run.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Coefficients `(A, B)` with `price(c) = A + B·c` for a flat coupon `c`.
    ///
    /// `A = P·mean(df)`, `B = P·mean(df·k)` where `k` is the number of paid
    /// coupons (zero on matured paths).
    pub fn linear_coefficients(&self) -> (f64, f64) {
        if self.paths.is_empty() {
            return (0.0, 0.0);
        }
        let n = self.paths.len() as f64;
        let (sum_df, sum_weighted) = self.paths.iter().fold((0.0, 0.0), |(a, b), path| {
            let paid = if path.is_exercised() {
                path.coupon_periods.len() as f64
            } else {
                0.0
            };
            (a + path.pv_discount_factor, b + path.pv_discount_factor * paid)
        });
        (self.principal * sum_df / n, self.principal * sum_weighted / n)
    }

    /// Fraction of paths exercising at each period (index 0 = period 1).
    pub fn exercise_probabilities(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.num_observations];
        for path in &self.paths {
            if path.is_exercised() {
                counts[path.exercise_period - 1] += 1;
            }
        }
        let n = self.paths.len().max(1) as f64;
        counts.into_iter().map(|c| c as f64 / n).collect()
    }
}

/// Price a coupon schedule against a pre-simulated ensemble.
///
/// # Arguments
///
/// * `ensemble` - Timing ensemble
/// * `coupons` - Coupon rate per observation period
/// * `principal` - Notional
///
/// # Errors
///
/// - `SimulationError::EmptyEnsemble` for an empty ensemble
/// - `SimulationError::CouponScheduleMismatch` if `coupons` does not have
///   one entry per observation
///
/// # Example
///
/// ```
/// use pricer_pricing::presim::{
///     calculate_price_from_presimulated, PreSimulatedEnsemble, PreSimulatedPath,
/// };
///
/// let paths = vec![
///     PreSimulatedPath {
///         exercise_period: 1,
///         exercise_day: 126,
///         pv_discount_factor: 0.9,
///         coupon_periods: vec![1],
///     },
///     PreSimulatedPath {
///         exercise_period: 0,
///         exercise_day: 0,
///         pv_discount_factor: 0.8,
///         coupon_periods: vec![1, 2],
///     },
/// ];
/// let ensemble = PreSimulatedEnsemble::new(paths, 2, 100.0, 42);
///
/// let price = calculate_price_from_presimulated(&ensemble, &[0.1, 0.1], 100.0).unwrap();
/// // (110 · 0.9 + 100 · 0.8) / 2
/// assert!((price - 89.5).abs() < 1e-12);
/// ```
pub fn calculate_price_from_presimulated(
    ensemble: &PreSimulatedEnsemble,
    coupons: &[f64],
    principal: f64,
) -> Result<f64, SimulationError> {
    if ensemble.is_empty() {
        return Err(SimulationError::EmptyEnsemble);
    }
    if coupons.len() != ensemble.num_observations {
        return Err(SimulationError::CouponScheduleMismatch {
            expected: ensemble.num_observations,
            got: coupons.len(),
        });
    }
    let total: f64 = ensemble
        .paths
        .iter()
        .map(|path| path.present_value(coupons, principal))
        .sum();
    Ok(total / ensemble.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn path(period: usize, df: f64, n_obs: usize) -> PreSimulatedPath {
        let last = if period == 0 { n_obs } else { period };
        PreSimulatedPath {
            exercise_period: period,
            exercise_day: period * 126,
            pv_discount_factor: df,
            coupon_periods: (1..=last).collect(),
        }
    }

    fn ensemble() -> PreSimulatedEnsemble {
        PreSimulatedEnsemble::new(
            vec![path(1, 0.95, 3), path(3, 0.85, 3), path(0, 0.85, 3), path(2, 0.9, 3)],
            3,
            1000.0,
            7,
        )
    }

    #[test]
    fn test_coupon_periods_invariant() {
        let outcome = PathOutcome {
            path_index: 0,
            exercise_period: 0,
            exercise_day: 0,
            nominal_payoff: 100.0,
            present_value: 90.0,
            pv_factor: 0.9,
            degenerate_steps: 0,
            trace: None,
        };
        let matured = PreSimulatedPath::from_outcome(&outcome, 4);
        assert_eq!(matured.coupon_periods, vec![1, 2, 3, 4]);

        let exercised = PreSimulatedPath::from_outcome(
            &PathOutcome {
                exercise_period: 2,
                exercise_day: 252,
                ..outcome
            },
            4,
        );
        assert_eq!(exercised.coupon_periods, vec![1, 2]);
        assert_relative_eq!(exercised.pv_discount_factor, 0.9);
    }

    #[test]
    fn test_linear_coefficients_match_pricing() {
        let ensemble = ensemble();
        let (a, b) = ensemble.linear_coefficients();
        for coupon in [0.0, 0.03, 0.1, 0.25] {
            let price = calculate_price_from_presimulated(&ensemble, &[coupon; 3], 1000.0).unwrap();
            assert_relative_eq!(price, a + b * coupon, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_matured_path_forfeits_coupons() {
        let matured = path(0, 0.8, 2);
        assert_relative_eq!(matured.present_value(&[0.5, 0.5], 100.0), 80.0);
    }

    #[test]
    fn test_non_flat_schedule() {
        let ensemble = PreSimulatedEnsemble::new(vec![path(2, 1.0, 3)], 3, 100.0, 0);
        let price = calculate_price_from_presimulated(&ensemble, &[0.01, 0.02, 0.5], 100.0).unwrap();
        assert_relative_eq!(price, 103.0, epsilon = 1e-12);
    }

    #[test]
    fn test_errors() {
        let empty = PreSimulatedEnsemble::new(Vec::new(), 2, 100.0, 0);
        assert_eq!(
            calculate_price_from_presimulated(&empty, &[0.0, 0.0], 100.0),
            Err(SimulationError::EmptyEnsemble)
        );
        assert_eq!(
            calculate_price_from_presimulated(&ensemble(), &[0.0], 1000.0),
            Err(SimulationError::CouponScheduleMismatch {
                expected: 3,
                got: 1
            })
        );
    }

    #[test]
    fn test_exercise_probabilities() {
        let probs = ensemble().exercise_probabilities();
        assert_eq!(probs, vec![0.25, 0.25, 0.25]);
    }

    proptest! {
        #[test]
        fn prop_flat_coupon_price_is_linear(
            timing in prop::collection::vec((0_usize..=3, 0.5_f64..1.0), 1..40),
            coupon in 0.0_f64..0.5,
        ) {
            let paths = timing.iter().map(|&(k, df)| path(k, df, 3)).collect();
            let ensemble = PreSimulatedEnsemble::new(paths, 3, 1000.0, 0);
            let (a, b) = ensemble.linear_coefficients();
            let price = calculate_price_from_presimulated(&ensemble, &[coupon; 3], 1000.0).unwrap();
            prop_assert!((price - (a + b * coupon)).abs() < 1e-9);
        }
    }
}
