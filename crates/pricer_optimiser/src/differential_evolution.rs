//! Bounded differential evolution (Storn and Price, 1997).
//!
//! DE/rand/1/bin with a hard evaluation budget. The objective is a trait so
//! that stateful objectives (such as the two-tier fair-coupon evaluator) can
//! report how many evaluations they actually spent.

use rand::prelude::*;
use tracing::debug;

use crate::error::SolverError;

/// Box constraints `lower[d] ≤ x[d] ≤ upper[d]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Create bounds from matching lower and upper vectors.
    ///
    /// # Errors
    ///
    /// - `SolverError::BoundsDimension` if the vectors are empty or differ in length
    /// - `SolverError::InvalidBounds` if any pair is non-finite or not increasing
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, SolverError> {
        if lower.is_empty() || lower.len() != upper.len() {
            return Err(SolverError::BoundsDimension {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        for (&lo, &hi) in lower.iter().zip(&upper) {
            if !(lo.is_finite() && hi.is_finite() && lo < hi) {
                return Err(SolverError::InvalidBounds {
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// One-dimensional interval.
    pub fn interval(lower: f64, upper: f64) -> Result<Self, SolverError> {
        Self::new(vec![lower], vec![upper])
    }

    /// Number of parameters.
    pub fn dimension(&self) -> usize {
        self.lower.len()
    }

    /// Lower bounds.
    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    /// Upper bounds.
    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Project `x` onto the box in place.
    pub fn clamp_in_place(&self, x: &mut [f64]) {
        for (d, value) in x.iter_mut().enumerate() {
            *value = value.clamp(self.lower[d], self.upper[d]);
        }
    }
}

/// Differential evolution settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialEvolutionOptions {
    /// Population size (raised to at least 4)
    pub population_size: usize,
    /// Differential weight `F`
    pub mutation_factor: f64,
    /// Crossover probability `CR`
    pub crossover_probability: f64,
    /// Hard cap on objective evaluations, as reported by the objective
    pub max_evaluations: usize,
    /// Generations without improvement before stopping
    pub max_stagnation: usize,
    /// Stop once the best value is at or below this
    pub target_value: f64,
    /// Seed for population sampling
    pub seed: u64,
}

impl Default for DifferentialEvolutionOptions {
    fn default() -> Self {
        Self {
            population_size: 15,
            mutation_factor: 0.7,
            crossover_probability: 0.9,
            max_evaluations: 2_000,
            max_stagnation: 30,
            target_value: 0.0,
            seed: 7,
        }
    }
}

impl DifferentialEvolutionOptions {
    fn validate(&self) -> Result<(), SolverError> {
        if !(self.mutation_factor > 0.0 && self.mutation_factor <= 2.0) {
            return Err(SolverError::InvalidSetting {
                name: "mutation_factor",
                reason: format!("{} is outside (0, 2]", self.mutation_factor),
            });
        }
        if !(0.0..=1.0).contains(&self.crossover_probability) {
            return Err(SolverError::InvalidSetting {
                name: "crossover_probability",
                reason: format!("{} is outside [0, 1]", self.crossover_probability),
            });
        }
        if self.max_evaluations == 0 {
            return Err(SolverError::InvalidSetting {
                name: "max_evaluations",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Evaluation budget exhausted
    Budget,
    /// Best value unchanged for `max_stagnation` generations
    Stagnation,
    /// Best value reached `target_value`
    Target,
}

/// Outcome of a differential evolution run.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferentialEvolutionResult {
    /// Best parameters found
    pub x: Vec<f64>,
    /// Objective value at `x`
    pub value: f64,
    /// Evaluations spent, as reported by the objective
    pub evaluations: usize,
    /// Completed generations
    pub generations: usize,
    /// Stop condition
    pub stop_reason: StopReason,
}

/// Objective function with its own evaluation count.
pub trait Objective {
    /// Value at `x`; non-finite values never replace a population member.
    fn evaluate(&mut self, x: &[f64]) -> f64;

    /// Evaluations spent so far, counted against the budget.
    fn evaluations(&self) -> usize;
}

/// Adapter counting one evaluation per call of a closure.
pub struct FnObjective<F> {
    f: F,
    count: usize,
}

impl<F: FnMut(&[f64]) -> f64> FnObjective<F> {
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f, count: 0 }
    }
}

impl<F: FnMut(&[f64]) -> f64> Objective for FnObjective<F> {
    fn evaluate(&mut self, x: &[f64]) -> f64 {
        self.count += 1;
        (self.f)(x)
    }

    fn evaluations(&self) -> usize {
        self.count
    }
}

/// Minimise `objective` over `bounds`.
///
/// # Errors
///
/// `SolverError::InvalidSetting` for out-of-range options.
///
/// # Example
///
/// ```
/// use pricer_optimiser::differential_evolution::{
///     differential_evolution, Bounds, DifferentialEvolutionOptions, FnObjective,
/// };
///
/// let bounds = Bounds::new(vec![-5.0, -5.0], vec![5.0, 5.0]).unwrap();
/// let mut objective = FnObjective::new(|x: &[f64]| (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2));
/// let result = differential_evolution(
///     &bounds,
///     &DifferentialEvolutionOptions::default(),
///     &mut objective,
/// )
/// .unwrap();
///
/// assert!((result.x[0] - 1.0).abs() < 1e-3);
/// assert!((result.x[1] + 2.0).abs() < 1e-3);
/// assert!(result.evaluations <= 2_000);
/// ```
pub fn differential_evolution<O: Objective>(
    bounds: &Bounds,
    options: &DifferentialEvolutionOptions,
    objective: &mut O,
) -> Result<DifferentialEvolutionResult, SolverError> {
    options.validate()?;
    let dim = bounds.dimension();
    let pop_size = options.population_size.max(dim + 2).max(4);
    let start = objective.evaluations();

    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut population: Vec<Vec<f64>> = Vec::with_capacity(pop_size);
    let mut values: Vec<f64> = Vec::with_capacity(pop_size);

    for _ in 0..pop_size {
        if spent(objective, start) >= options.max_evaluations {
            break;
        }
        let x: Vec<f64> = (0..dim)
            .map(|d| bounds.lower[d] + rng.gen::<f64>() * (bounds.upper[d] - bounds.lower[d]))
            .collect();
        let value = objective.evaluate(&x);
        population.push(x);
        values.push(if value.is_finite() { value } else { f64::INFINITY });
    }

    let mut best = best_index(&values);
    let mut generations = 0usize;
    let mut stagnation = 0usize;
    let mut stop_reason = StopReason::Budget;
    let mut trial = vec![0.0; dim];

    'search: loop {
        if values[best] <= options.target_value {
            stop_reason = StopReason::Target;
            break;
        }
        if population.len() < pop_size {
            break;
        }
        let previous_best = values[best];

        for i in 0..pop_size {
            if spent(objective, start) >= options.max_evaluations {
                break 'search;
            }
            let (a, b, c) = distinct_triple(&mut rng, pop_size, i);
            let j_rand = rng.gen_range(0..dim);
            for d in 0..dim {
                trial[d] = if d == j_rand || rng.gen::<f64>() <= options.crossover_probability {
                    population[a][d] + options.mutation_factor * (population[b][d] - population[c][d])
                } else {
                    population[i][d]
                };
            }
            bounds.clamp_in_place(&mut trial);

            let value = objective.evaluate(&trial);
            if value.is_finite() && value < values[i] {
                population[i].copy_from_slice(&trial);
                values[i] = value;
                if value < values[best] {
                    best = i;
                }
            }
        }
        generations += 1;

        if (previous_best - values[best]).abs() <= 1e-15 {
            stagnation += 1;
            if stagnation >= options.max_stagnation {
                stop_reason = StopReason::Stagnation;
                break;
            }
        } else {
            stagnation = 0;
        }
    }

    debug!(
        generations,
        evaluations = spent(objective, start),
        best = values[best],
        ?stop_reason,
        "Differential evolution finished"
    );

    Ok(DifferentialEvolutionResult {
        x: population[best].clone(),
        value: values[best],
        evaluations: spent(objective, start),
        generations,
        stop_reason,
    })
}

fn spent<O: Objective>(objective: &O, start: usize) -> usize {
    objective.evaluations().saturating_sub(start)
}

fn best_index(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
        .unwrap_or(0)
}

/// Three distinct indices, all different from `exclude`.
fn distinct_triple(rng: &mut StdRng, n: usize, exclude: usize) -> (usize, usize, usize) {
    let mut pick = |taken: &[usize]| loop {
        let k = rng.gen_range(0..n);
        if k != exclude && !taken.contains(&k) {
            return k;
        }
    };
    let a = pick(&[]);
    let b = pick(&[a]);
    let c = pick(&[a, b]);
    (a, b, c)
}
