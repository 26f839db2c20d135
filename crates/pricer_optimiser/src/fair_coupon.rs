//! Fair-coupon search on pre-simulated ensembles.
//!
//! Exercise timing does not depend on the coupon rate, so the simulator runs
//! once per ensemble and every candidate coupon is priced by aggregation
//! over the stored timing. Two ensembles are drawn: a small exploration
//! ensemble priced for every candidate, and a large validation ensemble
//! priced only for candidates whose exploration error is already small.
//!
//! ```text
//! candidate c ─► Fast price ─► |p − target|/target < threshold ?
//!                                   │ no: return fast error
//!                                   └ yes: Precise price, record, return precise error
//! ```

use pricer_pricing::mc::{PathSimulator, SimulationError};
use pricer_pricing::presim::{calculate_price_from_presimulated, PreSimulatedEnsemble};
use tracing::{debug, info, warn};

use crate::differential_evolution::{
    differential_evolution, Bounds, DifferentialEvolutionOptions, Objective,
};
use crate::error::SolverError;

/// Offset between the exploration and validation seeds.
pub const VALIDATION_SEED_OFFSET: u64 = 1_000_003;

/// Which ensemble a candidate is priced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluationMode {
    /// Small exploration ensemble
    Fast,
    /// Large validation ensemble
    Precise,
}

/// Prices a flat per-period coupon.
pub trait CandidateEvaluator {
    /// Price of the note paying `coupon` at every observation.
    fn price(&self, coupon: f64, mode: EvaluationMode) -> f64;
}

impl<E: CandidateEvaluator + ?Sized> CandidateEvaluator for &E {
    fn price(&self, coupon: f64, mode: EvaluationMode) -> f64 {
        (**self).price(coupon, mode)
    }
}

/// Evaluator backed by an exploration and a validation ensemble.
#[derive(Debug)]
pub struct EnsembleEvaluator<'a> {
    exploration: &'a PreSimulatedEnsemble,
    validation: &'a PreSimulatedEnsemble,
    principal: f64,
}

impl<'a> EnsembleEvaluator<'a> {
    /// Pair two ensembles drawn for the same deal.
    ///
    /// # Errors
    ///
    /// - `SimulationError::EmptyEnsemble` (wrapped) if either ensemble is empty
    /// - `SimulationError::CouponScheduleMismatch` (wrapped) if the two
    ///   ensembles disagree on the observation count
    pub fn new(
        exploration: &'a PreSimulatedEnsemble,
        validation: &'a PreSimulatedEnsemble,
    ) -> Result<Self, SolverError> {
        if exploration.is_empty() || validation.is_empty() {
            return Err(SimulationError::EmptyEnsemble.into());
        }
        if exploration.num_observations() != validation.num_observations() {
            return Err(SimulationError::CouponScheduleMismatch {
                expected: exploration.num_observations(),
                got: validation.num_observations(),
            }
            .into());
        }
        Ok(Self {
            exploration,
            validation,
            principal: exploration.principal(),
        })
    }
}

impl CandidateEvaluator for EnsembleEvaluator<'_> {
    fn price(&self, coupon: f64, mode: EvaluationMode) -> f64 {
        let ensemble = match mode {
            EvaluationMode::Fast => self.exploration,
            EvaluationMode::Precise => self.validation,
        };
        let coupons = vec![coupon; ensemble.num_observations()];
        calculate_price_from_presimulated(ensemble, &coupons, self.principal).unwrap_or(f64::NAN)
    }
}

/// A candidate priced on the validation ensemble.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedCandidate {
    /// Coupon rate
    pub coupon: f64,
    /// Validation price
    pub price: f64,
    /// Relative error against the target
    pub relative_error: f64,
}

/// Two-tier objective: relative pricing error, validated when promising.
pub struct TwoTierEvaluator<E> {
    evaluator: E,
    target: f64,
    threshold: f64,
    fast_evaluations: usize,
    precise_evaluations: usize,
    best_validated: Option<ValidatedCandidate>,
}

impl<E: CandidateEvaluator> TwoTierEvaluator<E> {
    /// Wrap `evaluator` for a search towards `target`.
    ///
    /// `threshold` is the relative exploration error below which a
    /// candidate is re-priced on the validation ensemble.
    pub fn new(evaluator: E, target: f64, threshold: f64) -> Self {
        Self {
            evaluator,
            target,
            threshold,
            fast_evaluations: 0,
            precise_evaluations: 0,
            best_validated: None,
        }
    }

    fn relative_error(&self, price: f64) -> f64 {
        let error = (price - self.target).abs() / self.target;
        if error.is_finite() {
            error
        } else {
            f64::INFINITY
        }
    }

    /// Price `coupon` on the validation ensemble and record it.
    pub fn validate(&mut self, coupon: f64) -> ValidatedCandidate {
        let price = self.evaluator.price(coupon, EvaluationMode::Precise);
        self.precise_evaluations += 1;
        let candidate = ValidatedCandidate {
            coupon,
            price,
            relative_error: self.relative_error(price),
        };
        let improved = self
            .best_validated
            .map_or(true, |best| candidate.relative_error < best.relative_error);
        if improved {
            debug!(
                coupon,
                price,
                relative_error = candidate.relative_error,
                "New best validated candidate"
            );
            self.best_validated = Some(candidate);
        }
        candidate
    }

    /// Relative error of `coupon`, validated when the fast error is small.
    pub fn objective(&mut self, coupon: f64) -> f64 {
        let fast = self.evaluator.price(coupon, EvaluationMode::Fast);
        self.fast_evaluations += 1;
        let error = self.relative_error(fast);
        if error < self.threshold {
            self.validate(coupon).relative_error
        } else {
            error
        }
    }

    /// Exploration evaluations so far.
    pub fn fast_evaluations(&self) -> usize {
        self.fast_evaluations
    }

    /// Validation evaluations so far.
    pub fn precise_evaluations(&self) -> usize {
        self.precise_evaluations
    }

    /// Best validated candidate so far.
    pub fn best_validated(&self) -> Option<ValidatedCandidate> {
        self.best_validated
    }
}

impl<E: CandidateEvaluator> Objective for TwoTierEvaluator<E> {
    fn evaluate(&mut self, x: &[f64]) -> f64 {
        self.objective(x[0])
    }

    fn evaluations(&self) -> usize {
        self.fast_evaluations + self.precise_evaluations
    }
}

/// Fair-coupon solver settings.
///
/// Coupons are per observation period.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FairCouponSettings {
    /// Lowest coupon searched
    pub lower_bound: f64,
    /// Highest coupon searched
    pub upper_bound: f64,
    /// Convergence tolerance, relative to the target
    pub tolerance: f64,
    /// Exploration error below which candidates are validated
    pub validation_threshold: f64,
    /// Evaluation budget across both tiers
    pub max_evaluations: usize,
    /// Differential evolution population size
    pub population_size: usize,
    /// Differential weight
    pub mutation_factor: f64,
    /// Crossover probability
    pub crossover_probability: f64,
    /// Paths in the exploration ensemble
    pub exploration_paths: usize,
    /// Paths in the validation ensemble
    pub validation_paths: usize,
    /// Exploration seed; the validation ensemble uses
    /// `seed + VALIDATION_SEED_OFFSET`
    pub seed: u64,
}

impl Default for FairCouponSettings {
    fn default() -> Self {
        Self {
            lower_bound: 0.0,
            upper_bound: 0.5,
            tolerance: 1e-3,
            validation_threshold: 0.01,
            max_evaluations: 2_000,
            population_size: 15,
            mutation_factor: 0.7,
            crossover_probability: 0.9,
            exploration_paths: 2_000,
            validation_paths: 10_000,
            seed: 42,
        }
    }
}

impl FairCouponSettings {
    /// Seed of the validation ensemble.
    pub fn validation_seed(&self) -> u64 {
        self.seed.wrapping_add(VALIDATION_SEED_OFFSET)
    }

    /// Check every setting.
    ///
    /// # Errors
    ///
    /// `SolverError::InvalidBounds` or `SolverError::InvalidSetting`.
    pub fn validate(&self) -> Result<(), SolverError> {
        Bounds::interval(self.lower_bound, self.upper_bound)?;
        let positive = |name: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SolverError::InvalidSetting {
                    name,
                    reason: format!("{value} must be positive"),
                })
            }
        };
        positive("tolerance", self.tolerance)?;
        positive("validation_threshold", self.validation_threshold)?;
        for (name, value) in [
            ("max_evaluations", self.max_evaluations),
            ("exploration_paths", self.exploration_paths),
            ("validation_paths", self.validation_paths),
        ] {
            if value == 0 {
                return Err(SolverError::InvalidSetting {
                    name,
                    reason: "must be positive".to_string(),
                });
            }
        }
        Ok(())
    }

    fn de_options(&self) -> DifferentialEvolutionOptions {
        DifferentialEvolutionOptions {
            population_size: self.population_size,
            mutation_factor: self.mutation_factor,
            crossover_probability: self.crossover_probability,
            max_evaluations: self.max_evaluations,
            seed: self.seed,
            ..Default::default()
        }
    }
}

/// Where the reported coupon came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CandidateSource {
    /// The optimiser's best point
    Optimiser,
    /// The best candidate validated during the search
    Validated,
}

/// Outcome of a fair-coupon search.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FairCouponResult {
    /// Coupon per observation period
    pub fair_coupon: f64,
    /// Validation price at `fair_coupon`
    pub price: f64,
    /// Target price
    pub target: f64,
    /// `|price − target| / target`
    pub relative_error: f64,
    /// Total evaluations, both tiers plus the final validation
    pub evaluations: usize,
    /// Exploration evaluations
    pub fast_evaluations: usize,
    /// Validation evaluations
    pub precise_evaluations: usize,
    /// Whether the price is within tolerance of the target
    pub converged: bool,
    /// Which candidate was chosen
    pub source: CandidateSource,
}

/// Searches the flat coupon that prices the note at a target.
///
/// # Example
///
/// ```
/// use pricer_optimiser::fair_coupon::{
///     CandidateEvaluator, EvaluationMode, FairCouponSettings, FairCouponSolver,
/// };
///
/// // Price linear in the coupon: 900 + 1500·c
/// struct Linear;
/// impl CandidateEvaluator for Linear {
///     fn price(&self, coupon: f64, _mode: EvaluationMode) -> f64 {
///         900.0 + 1500.0 * coupon
///     }
/// }
///
/// let solver = FairCouponSolver::new(FairCouponSettings::default()).unwrap();
/// let result = solver.solve_with(Linear, 1000.0).unwrap();
///
/// assert!(result.converged);
/// assert!((result.fair_coupon - 1.0 / 15.0).abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct FairCouponSolver {
    settings: FairCouponSettings,
}

impl FairCouponSolver {
    /// Create a solver.
    ///
    /// # Errors
    ///
    /// Propagates [`FairCouponSettings::validate`].
    pub fn new(settings: FairCouponSettings) -> Result<Self, SolverError> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Solver settings.
    pub fn settings(&self) -> &FairCouponSettings {
        &self.settings
    }

    /// Draw both ensembles from `simulator` and search against them.
    ///
    /// # Errors
    ///
    /// `SolverError::Simulation` if an ensemble cannot be generated, or
    /// `SolverError::InvalidTarget` for a non-positive target.
    pub fn solve(
        &self,
        simulator: &PathSimulator<'_>,
        target: f64,
    ) -> Result<FairCouponResult, SolverError> {
        let settings = &self.settings;
        let (exploration, validation) = simulator.presimulate_pair(
            (settings.exploration_paths, settings.seed),
            (settings.validation_paths, settings.validation_seed()),
        )?;
        self.solve_presimulated(&exploration, &validation, target)
    }

    /// Search against already generated ensembles.
    ///
    /// # Errors
    ///
    /// As [`EnsembleEvaluator::new`], plus `SolverError::InvalidTarget`.
    pub fn solve_presimulated(
        &self,
        exploration: &PreSimulatedEnsemble,
        validation: &PreSimulatedEnsemble,
        target: f64,
    ) -> Result<FairCouponResult, SolverError> {
        let evaluator = EnsembleEvaluator::new(exploration, validation)?;
        self.solve_with(evaluator, target)
    }

    /// Search with any evaluator.
    ///
    /// Never fails on non-convergence: the best candidate is returned with
    /// `converged = false`.
    ///
    /// # Errors
    ///
    /// `SolverError::InvalidTarget` for a non-positive or non-finite target.
    pub fn solve_with<E: CandidateEvaluator>(
        &self,
        evaluator: E,
        target: f64,
    ) -> Result<FairCouponResult, SolverError> {
        if !(target.is_finite() && target > 0.0) {
            return Err(SolverError::InvalidTarget(target));
        }
        let settings = &self.settings;
        let bounds = Bounds::interval(settings.lower_bound, settings.upper_bound)?;
        info!(
            target,
            lower = settings.lower_bound,
            upper = settings.upper_bound,
            max_evaluations = settings.max_evaluations,
            "Starting fair coupon search"
        );

        let mut two_tier = TwoTierEvaluator::new(evaluator, target, settings.validation_threshold);
        let search = differential_evolution(&bounds, &settings.de_options(), &mut two_tier)?;

        let (coupon, source) = match two_tier.best_validated() {
            Some(validated) if validated.relative_error <= search.value => {
                (validated.coupon, CandidateSource::Validated)
            }
            _ => (search.x[0], CandidateSource::Optimiser),
        };
        let final_candidate = two_tier.validate(coupon);
        let converged = final_candidate.relative_error <= settings.tolerance;

        let result = FairCouponResult {
            fair_coupon: coupon,
            price: final_candidate.price,
            target,
            relative_error: final_candidate.relative_error,
            evaluations: two_tier.evaluations(),
            fast_evaluations: two_tier.fast_evaluations(),
            precise_evaluations: two_tier.precise_evaluations(),
            converged,
            source,
        };

        if converged {
            info!(
                fair_coupon = result.fair_coupon,
                price = result.price,
                evaluations = result.evaluations,
                "Fair coupon found"
            );
        } else {
            warn!(
                fair_coupon = result.fair_coupon,
                relative_error = result.relative_error,
                evaluations = result.evaluations,
                "Fair coupon search did not converge"
            );
        }
        Ok(result)
    }
}
