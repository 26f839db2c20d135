//! DCC-GARCH path simulator.
//!
//! Each path evolves every underlying day by day under the foreign
//! risk-neutral drift:
//!
//! ```text
//! h_t   = ω + α·ε²_{t−1} + β·h_{t−1}
//! Q_t   = (1−a−b)·Q̄ + a·z_{t−1}z_{t−1}ᵀ + b·Q_{t−1}
//! ε_t   = √h_t · (L_t z_t)_j,   L_t = chol(R_t)
//! S_t   = S_{t−1}·exp(r_f(t)/252 − q/252 − h_t/2 + ε_t)
//! ```
//!
//! and the autocall lifecycle is applied at each observation day until the
//! note exercises or matures. Paths are independent: path `i` owns its
//! generator (seeded `seed + i`) and its `(S, h, ε, Q)` state, so they run
//! in parallel without shared mutable state.

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::TRADING_DAYS_PER_YEAR;
use pricer_models::instruments::SimulationConfig;
use pricer_models::models::correlation::{CholeskyFactor, CorrelationMatrix};
use pricer_models::models::dcc::DccState;
use pricer_models::models::dcc_garch::DccGarchModel;
use pricer_models::underlying::UnderlyingSpec;
use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::config::MonteCarloConfig;
use super::error::SimulationError;
use super::result::{PathOutcome, PathTrace, SimulationResult};
use crate::autocall::{AutocallLifecycle, AutocallState, CashFlowDiscounter};
use crate::presim::{PreSimulatedEnsemble, PreSimulatedPath};
use crate::rng::{InnovationSampler, PricerRng};

/// Monte Carlo simulator for one deal under one model.
///
/// Construction validates the inputs and precomputes everything that is
/// shared across paths: daily foreign drifts, dividend drifts, discount
/// legs and the innovation sampler.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::CurveEnum;
/// use pricer_models::instruments::SimulationConfig;
/// use pricer_models::models::{DccGarchModel, GarchParams};
/// use pricer_models::underlying::UnderlyingSpec;
/// use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
///
/// let underlyings = vec![
///     UnderlyingSpec::new("AAA", 100.0, false, 0.0).unwrap(),
///     UnderlyingSpec::new("BBB", 50.0, true, 0.02).unwrap(),
/// ];
/// let garch = GarchParams::new(1e-6, 0.05, 0.9, 0.0, 2e-4).unwrap();
/// let model = DccGarchModel::uncorrelated(vec![garch; 2]).unwrap();
/// let deal = SimulationConfig::builder()
///     .coupons(vec![0.04; 2])
///     .spacing_days(126)
///     .horizon_days(252)
///     .principal(1000.0)
///     .domestic_curve(CurveEnum::flat(0.10))
///     .foreign_curve(CurveEnum::flat(0.05))
///     .fx_spot(5.0)
///     .build()
///     .unwrap();
/// let mc = MonteCarloConfig::builder().n_paths(200).seed(7).build().unwrap();
///
/// let simulator = PathSimulator::new(&underlyings, &model, &deal, &mc).unwrap();
/// let result = simulator.simulate();
///
/// assert_eq!(result.distribution.n_paths(), 200);
/// assert!(result.price() > 0.0);
/// ```
pub struct PathSimulator<'a> {
    underlyings: &'a [UnderlyingSpec],
    model: &'a DccGarchModel,
    config: &'a SimulationConfig,
    mc: MonteCarloConfig,
    discounter: CashFlowDiscounter,
    sampler: InnovationSampler,
    /// `r_f(t/252)/252` for `t = 1..=horizon`
    foreign_drift: Vec<f64>,
    /// `q_j/252` per underlying
    dividend_drift: Vec<f64>,
}

impl<'a> PathSimulator<'a> {
    /// Validate the inputs and precompute the shared path data.
    ///
    /// # Arguments
    ///
    /// * `underlyings` - Underlyings, index-aligned with the model
    /// * `model` - Fitted DCC-GARCH model
    /// * `config` - Deal terms
    /// * `mc` - Monte Carlo settings
    ///
    /// # Errors
    ///
    /// - `SimulationError::Config` for invalid Monte Carlo settings
    /// - `SimulationError::Model` for an invalid underlying
    /// - `SimulationError::AssetCountMismatch` if the model dimension differs
    ///   from the number of underlyings
    /// - `SimulationError::CouponScheduleMismatch` if the deal's coupon count
    ///   differs from its observation count
    /// - `SimulationError::MarketData` if a curve lookup fails
    pub fn new(
        underlyings: &'a [UnderlyingSpec],
        model: &'a DccGarchModel,
        config: &'a SimulationConfig,
        mc: &MonteCarloConfig,
    ) -> Result<Self, SimulationError> {
        mc.validate()?;
        for underlying in underlyings {
            underlying.validate()?;
        }
        if underlyings.len() != model.dim() {
            return Err(SimulationError::AssetCountMismatch {
                underlyings: underlyings.len(),
                model: model.dim(),
            });
        }
        if config.coupons().len() != config.num_observations() {
            return Err(SimulationError::CouponScheduleMismatch {
                expected: config.num_observations(),
                got: config.coupons().len(),
            });
        }

        let foreign = config.foreign_curve();
        let foreign_drift = (1..=config.horizon_days())
            .map(|t| {
                foreign
                    .zero_rate(t as f64 / TRADING_DAYS_PER_YEAR)
                    .map(|r| r / TRADING_DAYS_PER_YEAR)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let dividend_drift = underlyings
            .iter()
            .map(|u| u.effective_dividend_yield() / TRADING_DAYS_PER_YEAR)
            .collect();

        Ok(Self {
            underlyings,
            model,
            config,
            mc: mc.clone(),
            discounter: CashFlowDiscounter::new(config, mc.discount_mode())?,
            sampler: InnovationSampler::new(model.innovations()),
            foreign_drift,
            dividend_drift,
        })
    }

    /// Deal terms being simulated.
    pub fn config(&self) -> &SimulationConfig {
        self.config
    }

    /// Discount legs in use.
    pub fn discounter(&self) -> &CashFlowDiscounter {
        &self.discounter
    }

    /// Run the configured number of paths.
    pub fn simulate(&self) -> SimulationResult {
        let n_paths = self.mc.n_paths();
        info!(
            n_paths,
            seed = self.mc.seed(),
            assets = self.underlyings.len(),
            horizon_days = self.config.horizon_days(),
            innovations = ?self.model.innovations(),
            "Starting autocall simulation"
        );

        let outcomes = self.run_paths(n_paths, self.mc.seed(), self.mc.detailed_paths());
        let result = SimulationResult::from_outcomes(
            outcomes,
            self.config.num_observations(),
            self.config.spacing_days(),
        );

        let distribution = &result.distribution;
        info!(
            price = distribution.mean_present_value(),
            std_error = distribution.present_value_std_error(),
            maturity_probability = distribution.maturity_probability(),
            degenerate_steps = distribution.degenerate_steps(),
            "Simulation complete"
        );
        result
    }

    /// Run `n_paths` paths from `seed` and keep only their timing.
    ///
    /// # Errors
    ///
    /// `SimulationError::Config` if `n_paths` is out of range.
    pub fn presimulate(
        &self,
        n_paths: usize,
        seed: u64,
    ) -> Result<PreSimulatedEnsemble, SimulationError> {
        let mc = self.mc.with_paths(n_paths, seed)?;
        let num_observations = self.config.num_observations();
        let paths: Vec<PreSimulatedPath> = self
            .run_paths(mc.n_paths(), mc.seed(), 0)
            .iter()
            .map(|outcome| PreSimulatedPath::from_outcome(outcome, num_observations))
            .collect();
        debug!(n_paths, seed, "Pre-simulated ensemble ready");
        Ok(PreSimulatedEnsemble::new(
            paths,
            num_observations,
            self.config.principal(),
            seed,
        ))
    }

    /// Generate two independent ensembles concurrently.
    ///
    /// # Errors
    ///
    /// `SimulationError::Config` if either path count is out of range.
    pub fn presimulate_pair(
        &self,
        (first_paths, first_seed): (usize, u64),
        (second_paths, second_seed): (usize, u64),
    ) -> Result<(PreSimulatedEnsemble, PreSimulatedEnsemble), SimulationError> {
        let (first, second) = rayon::join(
            || self.presimulate(first_paths, first_seed),
            || self.presimulate(second_paths, second_seed),
        );
        Ok((first?, second?))
    }

    fn run_paths(&self, n_paths: usize, seed: u64, detailed: usize) -> Vec<PathOutcome> {
        let run = |index: usize| self.simulate_path(seed, index, index < detailed);
        if self.mc.should_parallelise(n_paths) {
            (0..n_paths).into_par_iter().map(run).collect()
        } else {
            (0..n_paths).map(run).collect()
        }
    }

    /// Simulate one path to exercise or maturity.
    pub fn simulate_path(&self, seed: u64, index: usize, traced: bool) -> PathOutcome {
        let n = self.underlyings.len();
        let garch = self.model.garch();
        let dcc = self.model.dcc();
        let horizon = self.config.horizon_days();
        let coupons = self.config.coupons();

        let mut rng = PricerRng::for_path(seed, index);
        let mut prices: Vec<f64> = self.underlyings.iter().map(|u| u.initial_price).collect();
        let mut variance: Vec<f64> = garch.iter().map(|g| g.initial_variance).collect();
        let mut shock = vec![0.0; n];
        let mut standardised = vec![0.0; n];
        let mut draws = vec![0.0; n];
        let mut state = DccState::new(dcc);
        let mut correlation = CorrelationMatrix::<f64>::identity(n);
        let mut factor = CholeskyFactor::<f64>::identity(n);
        let mut lifecycle = AutocallLifecycle::new();
        let mut path_trace = traced.then(PathTrace::default);
        let mut degenerate_steps = 0u32;

        for day in 1..=horizon {
            if day > 1 {
                state.update(dcc, &standardised);
                for j in 0..n {
                    variance[j] = garch[j].next_variance(shock[j] * shock[j], variance[j]);
                }
            }

            let factorised = state
                .correlation_into(&mut correlation)
                .and_then(|()| correlation.cholesky_into(&mut factor));
            match factorised {
                Ok(()) => {
                    rng.fill_innovations(&self.sampler, &mut draws);
                    factor.transform_into(&draws, &mut standardised);
                }
                Err(err) => {
                    degenerate_steps += 1;
                    trace!(path = index, day, %err, "Correlation not factorisable, using independent normals");
                    rng.fill_normal(&mut standardised);
                }
            }

            let r_f = self.foreign_drift[day - 1];
            for j in 0..n {
                let vol = variance[j].max(0.0).sqrt();
                shock[j] = vol * standardised[j];
                let drift = r_f - self.dividend_drift[j] - 0.5 * variance[j];
                prices[j] *= (drift + shock[j]).exp();
            }

            let Some(period) = self.config.observation_period(day) else {
                continue;
            };
            let triggered = prices
                .iter()
                .zip(self.underlyings)
                .all(|(price, underlying)| *price >= underlying.initial_price);
            let outcome = lifecycle.observe(period, day, triggered, coupons[period - 1], day == horizon);
            if let Some(path_trace) = path_trace.as_mut() {
                self.record(path_trace, period, day, &prices, &lifecycle, outcome);
            }
            if outcome.is_terminal() {
                break;
            }
        }

        if degenerate_steps > 0 {
            debug!(path = index, degenerate_steps, "Path used uncorrelated fallback draws");
        }

        let exercise_period = lifecycle.state().exercise_period();
        let cash_flow_period = if exercise_period > 0 {
            exercise_period
        } else {
            self.config.num_observations()
        };
        let nominal_payoff = lifecycle.nominal_payoff(self.config.principal());
        let pv_factor = self.discounter.pv_factor(cash_flow_period);

        PathOutcome {
            path_index: index,
            exercise_period,
            exercise_day: lifecycle.state().exercise_day(),
            nominal_payoff,
            present_value: nominal_payoff * pv_factor,
            pv_factor,
            degenerate_steps,
            trace: path_trace,
        }
    }

    fn record(
        &self,
        path_trace: &mut PathTrace,
        period: usize,
        day: usize,
        prices: &[f64],
        lifecycle: &AutocallLifecycle,
        state: AutocallState,
    ) {
        path_trace.observation_days.push(day);
        path_trace.prices.push(prices.to_vec());
        path_trace.coupon_trace.push(lifecycle.cumulative_coupon());

        let principal = self.config.principal();
        let event = match state {
            AutocallState::Exercised { .. } => format!(
                "all underlyings at or above initial, autocalled, payoff {:.2}",
                lifecycle.nominal_payoff(principal)
            ),
            AutocallState::Matured => format!(
                "matured without autocall, accrued coupons forfeited, payoff {principal:.2}"
            ),
            AutocallState::Alive => {
                let (worst, level) = self.worst_performer(prices);
                format!(
                    "no autocall, worst {worst} at {:.2}% of initial, accrued coupon {:.2}%",
                    level * 100.0,
                    lifecycle.cumulative_coupon() * 100.0
                )
            }
        };
        path_trace
            .timeline
            .push(format!("day {day} (observation {period}): {event}"));
    }

    fn worst_performer(&self, prices: &[f64]) -> (&str, f64) {
        prices
            .iter()
            .zip(self.underlyings)
            .map(|(price, underlying)| (underlying.symbol.as_str(), price / underlying.initial_price))
            .fold(("", f64::INFINITY), |worst, candidate| {
                if candidate.1 < worst.1 {
                    candidate
                } else {
                    worst
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::CurveEnum;
    use pricer_models::models::{DccParams, GarchParams};

    // ========================================
    // Fixtures
    // ========================================

    fn underlyings(n: usize) -> Vec<UnderlyingSpec> {
        (0..n)
            .map(|i| UnderlyingSpec::new(format!("S{i}"), 100.0 + 10.0 * i as f64, false, 0.0).unwrap())
            .collect()
    }

    fn deal(coupon: f64, spacing: usize, horizon: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .coupons(vec![coupon; horizon / spacing])
            .spacing_days(spacing)
            .horizon_days(horizon)
            .principal(1000.0)
            .domestic_curve(CurveEnum::flat(0.10))
            .foreign_curve(CurveEnum::flat(0.05))
            .fx_spot(5.0)
            .build()
            .unwrap()
    }

    fn correlated_model(n: usize) -> DccGarchModel {
        let garch = GarchParams::new(2e-6, 0.08, 0.9, 0.0, 3e-4).unwrap();
        let mut rows = vec![vec![0.5; n]; n];
        for (i, row) in rows.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        let long_run = CorrelationMatrix::from_rows(&rows).unwrap();
        let dcc = DccParams::new(0.03, 0.95, long_run).unwrap();
        DccGarchModel::new(vec![garch; n], dcc, None).unwrap()
    }

    fn mc(n_paths: usize, seed: u64) -> MonteCarloConfig {
        MonteCarloConfig::builder()
            .n_paths(n_paths)
            .seed(seed)
            .build()
            .unwrap()
    }

    // ========================================
    // Construction
    // ========================================

    #[test]
    fn test_asset_count_mismatch() {
        let assets = underlyings(3);
        let model = correlated_model(4);
        let terms = deal(0.05, 63, 252);
        let err = PathSimulator::new(&assets, &model, &terms, &mc(10, 1)).err();
        assert_eq!(
            err,
            Some(SimulationError::AssetCountMismatch {
                underlyings: 3,
                model: 4
            })
        );
    }

    // ========================================
    // Path behaviour
    // ========================================

    #[test]
    fn test_path_replay_is_exact() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 63, 504);
        let sim = PathSimulator::new(&assets, &model, &terms, &mc(50, 11)).unwrap();

        let result = sim.simulate();
        let replay = sim.simulate_path(11, 17, false);
        assert_eq!(result.outcomes[17], replay);
    }

    #[test]
    fn test_stops_at_first_trigger() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 63, 504);
        let sim = PathSimulator::new(&assets, &model, &terms, &mc(64, 3)).unwrap();

        for index in 0..64 {
            let outcome = sim.simulate_path(3, index, true);
            let path_trace = outcome.trace.unwrap();
            let expected = if outcome.exercise_period > 0 {
                outcome.exercise_period
            } else {
                terms.num_observations()
            };
            assert_eq!(path_trace.observation_days.len(), expected);
            assert_eq!(path_trace.timeline.len(), expected);
            assert_eq!(outcome.exercise_day, outcome.exercise_period * 63);
        }
    }

    #[test]
    fn test_nominal_payoffs_follow_exercise_period() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 126, 504);
        let sim = PathSimulator::new(&assets, &model, &terms, &mc(200, 5)).unwrap();

        for outcome in sim.simulate().outcomes {
            let expected = if outcome.exercise_period > 0 {
                1000.0 * (1.0 + 0.05 * outcome.exercise_period as f64)
            } else {
                1000.0
            };
            assert_relative_eq!(outcome.nominal_payoff, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 126, 504);
        let sequential = MonteCarloConfig::builder()
            .n_paths(300)
            .seed(9)
            .parallel_threshold(usize::MAX)
            .build()
            .unwrap();
        let parallel = MonteCarloConfig::builder()
            .n_paths(300)
            .seed(9)
            .parallel_threshold(1)
            .build()
            .unwrap();

        let a = PathSimulator::new(&assets, &model, &terms, &sequential).unwrap().simulate();
        let b = PathSimulator::new(&assets, &model, &terms, &parallel).unwrap().simulate();
        assert_eq!(a.distribution, b.distribution);
    }

    #[test]
    fn test_detailed_traces_bounded() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 126, 504);
        let config = MonteCarloConfig::builder()
            .n_paths(40)
            .seed(1)
            .detailed_paths(3)
            .build()
            .unwrap();
        let result = PathSimulator::new(&assets, &model, &terms, &config).unwrap().simulate();

        let detailed = result.detailed.unwrap();
        assert_eq!(detailed.paths.len(), 3);
        assert_eq!(
            detailed.paths.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        for (_, path_trace) in &detailed.paths {
            assert!(path_trace.prices.iter().all(|row| row.len() == 4));
        }
    }

    #[test]
    fn test_well_conditioned_model_has_no_degenerate_steps() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 126, 504);
        let result = PathSimulator::new(&assets, &model, &terms, &mc(100, 2)).unwrap().simulate();
        assert_eq!(result.distribution.degenerate_steps(), 0);
    }

    #[test]
    fn test_presimulated_timing_matches_full_run() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 126, 504);
        let sim = PathSimulator::new(&assets, &model, &terms, &mc(120, 21)).unwrap();

        let full = sim.simulate();
        let ensemble = sim.presimulate(120, 21).unwrap();
        for (outcome, path) in full.outcomes.iter().zip(ensemble.paths()) {
            assert_eq!(outcome.exercise_period, path.exercise_period);
            assert_eq!(outcome.exercise_day, path.exercise_day);
            assert_eq!(outcome.pv_factor, path.pv_discount_factor);
        }
    }

    #[test]
    fn test_presimulate_rejects_zero_paths() {
        let assets = underlyings(4);
        let model = correlated_model(4);
        let terms = deal(0.05, 126, 504);
        let sim = PathSimulator::new(&assets, &model, &terms, &mc(10, 1)).unwrap();
        assert!(matches!(
            sim.presimulate(0, 1),
            Err(SimulationError::Config(_))
        ));
    }
}
