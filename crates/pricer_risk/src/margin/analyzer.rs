//! Bank margin analysis of an autocall issue.
//!
//! The bank sells the note at par and carries the mean present value as a
//! hedged liability. The analyser combines three views of the same deal:
//!
//! 1. the fair coupon that prices the note at par (pre-simulated search)
//! 2. the full payoff distribution at the offered coupon
//! 3. the capital and cost model applied to that distribution
//!
//! ```text
//! margin     = P − mean(PV)
//! net margin = margin − opex − buffer − K · CoC
//! RAROC      = net margin / K
//! ```

use pricer_models::instruments::SimulationConfig;
use pricer_models::models::DccGarchModel;
use pricer_models::underlying::UnderlyingSpec;
use pricer_optimiser::fair_coupon::{FairCouponResult, FairCouponSettings, FairCouponSolver};
use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
use tracing::{info, warn};

use super::capital::{path_margins, CapitalMetrics};
use super::config::{BenchmarkConfig, Competitiveness, CostModel};
use crate::error::RiskError;
use crate::scenarios::{margin_volatility, run_scenarios, MarginScenario, ScenarioOutcome};

/// Sign of the net margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarginStatus {
    /// Net margin at or above zero
    Positive,
    /// Net margin below zero
    Negative,
}

impl MarginStatus {
    fn of(net_margin: f64) -> Self {
        if net_margin >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
        }
    }
}

/// Cost components charged against the gross margin, in domestic currency.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostBreakdown {
    /// `P · operational_rate · horizon years`
    pub operational: f64,
    /// `P · risk_buffer_rate`
    pub risk_buffer: f64,
    /// `K · cost_of_capital`
    pub capital: f64,
}

impl CostBreakdown {
    /// Sum of all components.
    pub fn total(&self) -> f64 {
        self.operational + self.risk_buffer + self.capital
    }
}

/// Full margin decomposition of one deal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BankMarginAnalysis {
    /// Mean offered coupon per observation period
    pub offered_coupon: f64,
    /// Offered coupon annualised with `252 / spacing` periods per year
    pub offered_coupon_annual: f64,
    /// Fair coupon per observation period
    pub fair_coupon: f64,
    /// Fair coupon search outcome
    pub solver: FairCouponResult,
    /// Note principal
    pub principal: f64,
    /// Mean present value at the offered coupon
    pub market_price: f64,
    /// Standard error of `market_price`
    pub market_price_std_error: f64,
    /// `fair_coupon − offered_coupon` per period
    pub spread: f64,
    /// Gross margin `P − market_price`
    pub margin_absolute: f64,
    /// Gross margin as a fraction of principal
    pub margin_pct: f64,
    /// `margin_pct` per year of expected life
    pub margin_annualised: Option<f64>,
    /// Cost components
    pub costs: CostBreakdown,
    /// Gross margin net of all costs
    pub net_margin: f64,
    /// Capital metrics of the per-path margins
    pub capital: CapitalMetrics,
    /// `net_margin / regulatory_capital`
    pub raroc: f64,
    /// Flat coupon at which the net margin is zero
    pub breakeven_coupon: Option<f64>,
    /// Annual benchmark coupon
    pub benchmark_rate: f64,
    /// Offered coupon against the benchmark
    pub competitiveness: Competitiveness,
    /// Sign of the net margin
    pub status: MarginStatus,
    /// Expected life of the note in years
    pub expected_life_years: f64,
    /// Per-period early-exercise probabilities
    pub exercise_probabilities: Vec<f64>,
    /// Probability of running to maturity
    pub maturity_probability: f64,
    /// Scenario results, in sweep order
    pub scenarios: Vec<ScenarioOutcome>,
    /// Half the stress/optimistic margin spread
    pub margin_volatility: Option<f64>,
}

/// Runs the margin pipeline for one deal.
///
/// # Example
///
/// ```no_run
/// use pricer_risk::margin::BankMarginAnalyzer;
/// # use pricer_core::market_data::curves::CurveEnum;
/// # use pricer_models::instruments::SimulationConfig;
/// # use pricer_models::models::{DccGarchModel, GarchParams};
/// # use pricer_models::underlying::UnderlyingSpec;
/// # use pricer_pricing::mc::MonteCarloConfig;
/// # let underlyings = vec![UnderlyingSpec::new("A", 100.0, false, 0.0).unwrap()];
/// # let garch = GarchParams::new(2e-6, 0.05, 0.9, 0.0, 2e-4).unwrap();
/// # let model = DccGarchModel::uncorrelated(vec![garch]).unwrap();
/// # let deal = SimulationConfig::builder()
/// #     .coupons(vec![0.05; 2]).spacing_days(126).horizon_days(252)
/// #     .principal(10_000.0)
/// #     .domestic_curve(CurveEnum::flat(0.11)).foreign_curve(CurveEnum::flat(0.045))
/// #     .fx_spot(5.45).build().unwrap();
/// # let mc = MonteCarloConfig::builder().n_paths(10_000).build().unwrap();
///
/// let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
///     .analyse()
///     .unwrap();
/// println!("net margin {:.2}, RAROC {:.1}%", analysis.net_margin, analysis.raroc * 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct BankMarginAnalyzer<'a> {
    underlyings: &'a [UnderlyingSpec],
    model: &'a DccGarchModel,
    deal: &'a SimulationConfig,
    mc: &'a MonteCarloConfig,
    cost: CostModel,
    benchmark: BenchmarkConfig,
    solver: FairCouponSettings,
    scenarios: Vec<MarginScenario>,
}

impl<'a> BankMarginAnalyzer<'a> {
    /// Analyser with default cost, benchmark and solver settings and the
    /// preset scenarios.
    pub fn new(
        underlyings: &'a [UnderlyingSpec],
        model: &'a DccGarchModel,
        deal: &'a SimulationConfig,
        mc: &'a MonteCarloConfig,
    ) -> Self {
        Self {
            underlyings,
            model,
            deal,
            mc,
            cost: CostModel::default(),
            benchmark: BenchmarkConfig::default(),
            solver: FairCouponSettings::default(),
            scenarios: MarginScenario::presets(),
        }
    }

    /// Replace the cost model.
    pub fn with_cost_model(mut self, cost: CostModel) -> Self {
        self.cost = cost;
        self
    }

    /// Replace the benchmark.
    pub fn with_benchmark(mut self, benchmark: BenchmarkConfig) -> Self {
        self.benchmark = benchmark;
        self
    }

    /// Replace the fair-coupon solver settings.
    pub fn with_solver_settings(mut self, settings: FairCouponSettings) -> Self {
        self.solver = settings;
        self
    }

    /// Replace the scenario list; an empty list skips the sweep.
    pub fn with_scenarios(mut self, scenarios: Vec<MarginScenario>) -> Self {
        self.scenarios = scenarios;
        self
    }

    /// Cost model in use.
    pub fn cost_model(&self) -> &CostModel {
        &self.cost
    }

    /// Run the pipeline.
    ///
    /// # Errors
    ///
    /// - Propagates [`CostModel::validate`] and solver setting validation
    /// - `RiskError::Simulation` if the simulator rejects the inputs
    /// - `RiskError::EmptyDistribution` if no paths were simulated
    pub fn analyse(&self) -> Result<BankMarginAnalysis, RiskError> {
        self.cost.validate()?;
        let solver = FairCouponSolver::new(self.solver.clone())?;
        let simulator = PathSimulator::new(self.underlyings, self.model, self.deal, self.mc)?;
        let principal = self.deal.principal();

        info!(
            principal,
            n_paths = self.mc.n_paths(),
            scenarios = self.scenarios.len(),
            "Starting bank margin analysis"
        );

        let (exploration, validation) = simulator.presimulate_pair(
            (self.solver.exploration_paths, self.solver.seed),
            (self.solver.validation_paths, self.solver.validation_seed()),
        )?;
        let fair = solver.solve_presimulated(&exploration, &validation, principal)?;
        if !fair.converged {
            warn!(
                relative_error = fair.relative_error,
                "Margin analysis continues with an unconverged fair coupon"
            );
        }

        let result = simulator.simulate();
        let distribution = &result.distribution;
        if distribution.n_paths() == 0 {
            return Err(RiskError::EmptyDistribution);
        }
        let market_price = distribution.mean_present_value();
        let margin_absolute = principal - market_price;

        let margins = path_margins(distribution.present_values(), principal);
        let capital = CapitalMetrics::from_margins(&margins, principal, &self.cost)?;
        let costs = CostBreakdown {
            operational: principal * self.cost.operational_cost_rate * self.deal.horizon_years(),
            risk_buffer: principal * self.cost.risk_buffer_rate,
            capital: capital.capital_cost(&self.cost),
        };
        let net_margin = margin_absolute - costs.total();
        let raroc = net_margin / capital.regulatory_capital;

        // Net margin is zero where A + B·c = P − costs
        let (a, b) = validation.linear_coefficients();
        let breakeven_coupon = (b > 0.0).then(|| (principal - costs.total() - a) / b);

        let coupons = self.deal.coupons();
        let offered_coupon = coupons.iter().sum::<f64>() / coupons.len() as f64;
        let offered_coupon_annual = offered_coupon * self.deal.periods_per_year();

        let expected_life_years = distribution.expected_life_years();
        let margin_pct = margin_absolute / principal;
        let margin_annualised = (expected_life_years > 0.0).then(|| margin_pct / expected_life_years);

        let scenarios = if self.scenarios.is_empty() {
            Vec::new()
        } else {
            run_scenarios(self.underlyings, self.model, self.deal, self.mc, &self.scenarios)?
        };

        let analysis = BankMarginAnalysis {
            offered_coupon,
            offered_coupon_annual,
            fair_coupon: fair.fair_coupon,
            spread: fair.fair_coupon - offered_coupon,
            solver: fair,
            principal,
            market_price,
            market_price_std_error: distribution.present_value_std_error(),
            margin_absolute,
            margin_pct,
            margin_annualised,
            costs,
            net_margin,
            capital,
            raroc,
            breakeven_coupon,
            benchmark_rate: self.benchmark.benchmark_rate(),
            competitiveness: self.benchmark.classify(offered_coupon_annual),
            status: MarginStatus::of(net_margin),
            expected_life_years,
            exercise_probabilities: distribution.exercise_probabilities(),
            maturity_probability: distribution.maturity_probability(),
            margin_volatility: margin_volatility(&scenarios),
            scenarios,
        };

        info!(
            fair_coupon = analysis.fair_coupon,
            market_price,
            net_margin,
            raroc,
            status = analysis.status.label(),
            "Bank margin analysis complete"
        );
        Ok(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::CurveEnum;
    use pricer_models::models::GarchParams;

    // ========================================
    // Fixture
    // ========================================

    fn fixture() -> (Vec<UnderlyingSpec>, DccGarchModel, SimulationConfig, MonteCarloConfig) {
        let underlyings = vec![
            UnderlyingSpec::new("A", 100.0, false, 0.0).unwrap(),
            UnderlyingSpec::new("B", 50.0, true, 0.01).unwrap(),
        ];
        let garch = GarchParams::new(2e-6, 0.05, 0.9, 0.0, 2e-4).unwrap();
        let model = DccGarchModel::uncorrelated(vec![garch; 2]).unwrap();
        let deal = SimulationConfig::builder()
            .coupons(vec![0.04; 4])
            .spacing_days(63)
            .horizon_days(252)
            .principal(10_000.0)
            .domestic_curve(CurveEnum::flat(0.11))
            .foreign_curve(CurveEnum::flat(0.045))
            .fx_spot(5.45)
            .build()
            .unwrap();
        let mc = MonteCarloConfig::builder().n_paths(400).seed(11).build().unwrap();
        (underlyings, model, deal, mc)
    }

    fn small_solver() -> FairCouponSettings {
        FairCouponSettings {
            exploration_paths: 300,
            validation_paths: 600,
            max_evaluations: 300,
            ..Default::default()
        }
    }

    // ========================================
    // Pipeline identities
    // ========================================

    #[test]
    fn test_margin_decomposition() {
        let (underlyings, model, deal, mc) = fixture();
        let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
            .with_solver_settings(small_solver())
            .with_scenarios(Vec::new())
            .analyse()
            .unwrap();

        assert_relative_eq!(analysis.offered_coupon, 0.04);
        assert_relative_eq!(analysis.offered_coupon_annual, 0.16, epsilon = 1e-12);
        assert_relative_eq!(
            analysis.margin_absolute,
            10_000.0 - analysis.market_price,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            analysis.net_margin,
            analysis.margin_absolute - analysis.costs.total(),
            epsilon = 1e-9
        );
        assert_relative_eq!(
            analysis.raroc,
            analysis.net_margin / analysis.capital.regulatory_capital,
            epsilon = 1e-12
        );
        assert_relative_eq!(analysis.costs.operational, 50.0, epsilon = 1e-9);
        assert_relative_eq!(analysis.costs.risk_buffer, 100.0, epsilon = 1e-9);
        assert!(analysis.capital.regulatory_capital >= 300.0 - 1e-9);
        assert_relative_eq!(
            analysis.spread,
            analysis.fair_coupon - analysis.offered_coupon,
            epsilon = 1e-15
        );
        assert!(analysis.scenarios.is_empty());
        assert!(analysis.margin_volatility.is_none());
    }

    #[test]
    fn test_labels_follow_values() {
        let (underlyings, model, deal, mc) = fixture();
        let benchmark = BenchmarkConfig::default();
        let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
            .with_solver_settings(small_solver())
            .with_scenarios(Vec::new())
            .analyse()
            .unwrap();

        assert_eq!(
            analysis.competitiveness,
            benchmark.classify(analysis.offered_coupon_annual)
        );
        assert_eq!(analysis.status == MarginStatus::Positive, analysis.net_margin >= 0.0);
        assert!(analysis.expected_life_years > 0.0 && analysis.expected_life_years <= 1.0 + 1e-12);
        assert!(analysis.margin_annualised.is_some());
    }

    #[test]
    fn test_breakeven_reprices_to_net_zero() {
        let (underlyings, model, deal, mc) = fixture();
        let settings = small_solver();
        let analysis = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
            .with_solver_settings(settings.clone())
            .with_scenarios(Vec::new())
            .analyse()
            .unwrap();
        let breakeven = analysis.breakeven_coupon.unwrap();

        let simulator = PathSimulator::new(&underlyings, &model, &deal, &mc).unwrap();
        let validation = simulator
            .presimulate(settings.validation_paths, settings.validation_seed())
            .unwrap();
        let price = pricer_pricing::presim::calculate_price_from_presimulated(
            &validation,
            &[breakeven; 4],
            10_000.0,
        )
        .unwrap();
        assert_relative_eq!(price, 10_000.0 - analysis.costs.total(), epsilon = 1e-6);
    }

    #[test]
    fn test_invalid_cost_model_rejected() {
        let (underlyings, model, deal, mc) = fixture();
        let result = BankMarginAnalyzer::new(&underlyings, &model, &deal, &mc)
            .with_cost_model(CostModel {
                confidence_level: 0.0,
                ..Default::default()
            })
            .analyse();
        assert_eq!(result.unwrap_err(), RiskError::InvalidConfidence(0.0));
    }

    #[test]
    fn test_status_label() {
        assert_eq!(MarginStatus::of(0.0), MarginStatus::Positive);
        assert_eq!(MarginStatus::of(-1e-9).label(), "Negative");
    }
}
