//! Simulation outputs.
//!
//! [`SimulationResult`] separates what every run produces (the
//! [`PayoffDistribution`]) from the optional per-path traces, so callers
//! check for traces through the type rather than by probing a map.

use pricer_core::math::stats;
use pricer_core::TRADING_DAYS_PER_YEAR;

/// Outcome of one simulated path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathOutcome {
    /// Path index within the run
    pub path_index: usize,
    /// 1-based exercise period, 0 when held to maturity
    pub exercise_period: usize,
    /// Trading day of exercise, 0 when held to maturity
    pub exercise_day: usize,
    /// Nominal payoff in domestic currency
    pub nominal_payoff: f64,
    /// Present value in domestic currency
    pub present_value: f64,
    /// Multiplier taking this path's nominal to its present value
    pub pv_factor: f64,
    /// Steps where the correlation matrix failed Cholesky
    pub degenerate_steps: u32,
    /// Detailed trace, for the leading traced paths
    pub trace: Option<PathTrace>,
}

impl PathOutcome {
    /// Whether the note redeemed early on this path.
    #[inline]
    pub fn is_exercised(&self) -> bool {
        self.exercise_period > 0
    }
}

/// Human-readable record of one path.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTrace {
    /// Observation days reached
    pub observation_days: Vec<usize>,
    /// Prices at each reached observation, one row per observation
    pub prices: Vec<Vec<f64>>,
    /// Cumulative coupon after each reached observation
    pub coupon_trace: Vec<f64>,
    /// Event timeline
    pub timeline: Vec<String>,
}

/// Payoff distribution over all paths of a run.
///
/// # Example
///
/// ```
/// use pricer_pricing::mc::PayoffDistribution;
///
/// let dist = PayoffDistribution::new(
///     vec![105.0, 110.0, 100.0, 100.0],
///     vec![104.0, 107.0, 95.0, 95.0],
///     vec![1, 2, 0, 0],
///     2,
///     126,
///     0,
/// );
///
/// assert!((dist.mean_present_value() - 100.25).abs() < 1e-12);
/// assert_eq!(dist.exercise_probabilities(), vec![0.25, 0.25]);
/// assert_eq!(dist.survival_probabilities(), vec![0.75, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PayoffDistribution {
    nominal_payoffs: Vec<f64>,
    present_values: Vec<f64>,
    exercise_periods: Vec<usize>,
    num_observations: usize,
    spacing_days: usize,
    degenerate_steps: u64,
}

impl PayoffDistribution {
    /// Assemble a distribution from index-aligned per-path arrays.
    pub fn new(
        nominal_payoffs: Vec<f64>,
        present_values: Vec<f64>,
        exercise_periods: Vec<usize>,
        num_observations: usize,
        spacing_days: usize,
        degenerate_steps: u64,
    ) -> Self {
        debug_assert_eq!(nominal_payoffs.len(), present_values.len());
        debug_assert_eq!(nominal_payoffs.len(), exercise_periods.len());
        Self {
            nominal_payoffs,
            present_values,
            exercise_periods,
            num_observations,
            spacing_days,
            degenerate_steps,
        }
    }

    /// Number of paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.present_values.len()
    }

    /// Nominal payoffs per path.
    pub fn nominal_payoffs(&self) -> &[f64] {
        &self.nominal_payoffs
    }

    /// Present values per path.
    pub fn present_values(&self) -> &[f64] {
        &self.present_values
    }

    /// Exercise periods per path (0 = held to maturity).
    pub fn exercise_periods(&self) -> &[usize] {
        &self.exercise_periods
    }

    /// Number of observation periods in the deal.
    pub fn num_observations(&self) -> usize {
        self.num_observations
    }

    /// Total Cholesky fallbacks across all paths.
    pub fn degenerate_steps(&self) -> u64 {
        self.degenerate_steps
    }

    /// Mean present value (the price).
    pub fn mean_present_value(&self) -> f64 {
        stats::mean(&self.present_values).unwrap_or(0.0)
    }

    /// Standard error of the mean present value.
    pub fn present_value_std_error(&self) -> f64 {
        stats::standard_error(&self.present_values).unwrap_or(0.0)
    }

    /// Mean nominal payoff.
    pub fn mean_nominal_payoff(&self) -> f64 {
        stats::mean(&self.nominal_payoffs).unwrap_or(0.0)
    }

    /// Fraction of paths exercising at each period (index 0 = period 1).
    pub fn exercise_probabilities(&self) -> Vec<f64> {
        let mut counts = vec![0usize; self.num_observations];
        for &period in &self.exercise_periods {
            if (1..=self.num_observations).contains(&period) {
                counts[period - 1] += 1;
            }
        }
        let n = self.n_paths().max(1) as f64;
        counts.into_iter().map(|c| c as f64 / n).collect()
    }

    /// Fraction of paths still alive after each period, counting paths that
    /// never exercise as alive throughout.
    pub fn survival_probabilities(&self) -> Vec<f64> {
        let mut alive = 1.0;
        self.exercise_probabilities()
            .into_iter()
            .map(|p| {
                alive -= p;
                alive.max(0.0)
            })
            .collect()
    }

    /// Fraction of paths held to maturity.
    pub fn maturity_probability(&self) -> f64 {
        let held = self.exercise_periods.iter().filter(|&&p| p == 0).count();
        held as f64 / self.n_paths().max(1) as f64
    }

    /// Expected life in years; matured paths live to the horizon.
    pub fn expected_life_years(&self) -> f64 {
        if self.n_paths() == 0 {
            return 0.0;
        }
        let total_days: usize = self
            .exercise_periods
            .iter()
            .map(|&p| {
                let period = if p == 0 { self.num_observations } else { p };
                period * self.spacing_days
            })
            .sum();
        total_days as f64 / self.n_paths() as f64 / TRADING_DAYS_PER_YEAR
    }
}

/// Traced paths of a run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetailedTraces {
    /// `(path index, trace)` pairs in path order
    pub paths: Vec<(usize, PathTrace)>,
}

/// Result of a full simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Distribution over all paths
    pub distribution: PayoffDistribution,
    /// Per-path outcomes (traces moved into `detailed`)
    pub outcomes: Vec<PathOutcome>,
    /// Detailed traces, present when the run asked for any
    pub detailed: Option<DetailedTraces>,
}

impl SimulationResult {
    /// Assemble from per-path outcomes in path order.
    pub fn from_outcomes(
        mut outcomes: Vec<PathOutcome>,
        num_observations: usize,
        spacing_days: usize,
    ) -> Self {
        let mut traces = Vec::new();
        for outcome in outcomes.iter_mut() {
            if let Some(trace) = outcome.trace.take() {
                traces.push((outcome.path_index, trace));
            }
        }

        let distribution = PayoffDistribution::new(
            outcomes.iter().map(|o| o.nominal_payoff).collect(),
            outcomes.iter().map(|o| o.present_value).collect(),
            outcomes.iter().map(|o| o.exercise_period).collect(),
            num_observations,
            spacing_days,
            outcomes.iter().map(|o| u64::from(o.degenerate_steps)).sum(),
        );

        Self {
            distribution,
            outcomes,
            detailed: (!traces.is_empty()).then_some(DetailedTraces { paths: traces }),
        }
    }

    /// Price: the mean present value.
    pub fn price(&self) -> f64 {
        self.distribution.mean_present_value()
    }
}
