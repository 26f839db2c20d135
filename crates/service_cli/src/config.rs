//! Deal file: one TOML document describing a note, its market and the run.
//!
//! ```toml
//! pricing_date = "2025-01-15"
//! principal = 10000.0
//! spacing_days = 126
//! horizon_days = 504
//! coupon = 0.05
//!
//! [[underlyings]]
//! symbol = "AMZN"
//! initial_price = 180.0
//! has_dividend = false
//! dividend_yield = 0.0
//!
//! [[garch]]
//! omega = 3e-6
//! alpha = 0.07
//! beta = 0.91
//! initial_variance = 4e-4
//! nu = 5.5
//!
//! [dcc]
//! a = 0.02
//! b = 0.96
//! correlation = [[1.0]]
//!
//! [domestic_curve]
//! type = "flat"
//! rate = 0.11
//!
//! [foreign_curve]
//! type = "flat"
//! rate = 0.045
//! ```
//!
//! Every other section is optional and falls back to its `Default`.

use std::path::Path;

use chrono::NaiveDate;
use pricer_core::market_data::curves::{
    CurveEnum, CurveInterpolation, InterpolatedCurve, NelsonSiegelSvensson,
};
use pricer_core::market_data::SpotEstimator;
use pricer_models::instruments::SimulationConfig;
use pricer_models::models::{CorrelationMatrix, DccGarchModel, DccParams, GarchParams};
use pricer_models::underlying::UnderlyingSpec;
use pricer_models::ModelError;
use pricer_optimiser::fair_coupon::FairCouponSettings;
use pricer_pricing::autocall::DiscountMode;
use pricer_pricing::mc::{MonteCarloConfig, DEFAULT_SEED};
use pricer_risk::margin::{BenchmarkConfig, CostModel};
use serde::{Deserialize, Serialize};

use crate::{CliError, Result};

/// Fitted GARCH(1,1) parameters of one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GarchFit {
    /// Variance intercept ω
    pub omega: f64,
    /// ARCH coefficient α
    pub alpha: f64,
    /// GARCH coefficient β
    pub beta: f64,
    /// Mean daily return
    #[serde(default)]
    pub mu: f64,
    /// Initial conditional variance
    pub initial_variance: f64,
    /// Student-t degrees of freedom, when the fit produced one
    #[serde(default)]
    pub nu: Option<f64>,
}

impl GarchFit {
    fn to_params(&self) -> std::result::Result<GarchParams, ModelError> {
        let params = GarchParams::new(
            self.omega,
            self.alpha,
            self.beta,
            self.mu,
            self.initial_variance,
        )?;
        match self.nu {
            Some(nu) => params.with_student_t(nu),
            None => Ok(params),
        }
    }
}

/// Fitted DCC(1,1) parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DccFit {
    /// Shock loading
    pub a: f64,
    /// Persistence
    pub b: f64,
    /// Long-run correlation, row by row
    pub correlation: Vec<Vec<f64>>,
    /// Use Gaussian instead of Student-t innovations
    #[serde(default)]
    pub gaussian: bool,
}

/// Yield curve description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CurveSpec {
    /// Single continuously compounded rate
    Flat {
        /// Zero rate
        rate: f64,
    },
    /// Nelson-Siegel-Svensson parameters
    Nss {
        /// Long-run level
        beta0: f64,
        /// Slope
        beta1: f64,
        /// First curvature
        beta2: f64,
        /// Second curvature
        beta3: f64,
        /// First decay
        tau1: f64,
        /// Second decay
        tau2: f64,
    },
    /// Tenor / zero-rate table
    Table {
        /// Tenors in years
        tenors: Vec<f64>,
        /// Zero rates
        rates: Vec<f64>,
        /// Interpolation between pillars
        #[serde(default)]
        interpolation: CurveInterpolation,
        /// Hold edge rates flat outside the table
        #[serde(default = "default_true")]
        extrapolate: bool,
    },
}

fn default_true() -> bool {
    true
}

impl CurveSpec {
    /// Build the curve.
    ///
    /// # Errors
    ///
    /// Propagates curve construction errors.
    pub fn build(&self) -> Result<CurveEnum<f64>> {
        Ok(match self {
            Self::Flat { rate } => CurveEnum::flat(*rate),
            Self::Nss {
                beta0,
                beta1,
                beta2,
                beta3,
                tau1,
                tau2,
            } => NelsonSiegelSvensson::new(*beta0, *beta1, *beta2, *beta3, *tau1, *tau2)?.into(),
            Self::Table {
                tenors,
                rates,
                interpolation,
                extrapolate,
            } => InterpolatedCurve::new(tenors, rates, *interpolation, *extrapolate)?.into(),
        })
    }
}

/// Monte Carlo run settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloSection {
    /// Number of paths
    pub n_paths: usize,
    /// Base seed
    pub seed: u64,
    /// Leading paths that carry a detailed trace
    pub detailed_paths: usize,
    /// Present-value convention
    pub discount_mode: DiscountMode,
}

impl Default for MonteCarloSection {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            seed: DEFAULT_SEED,
            detailed_paths: 0,
            discount_mode: DiscountMode::DualCurrency,
        }
    }
}

/// Logging defaults, overridden by `RUST_LOG` and `--verbose`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Default filter directive
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Parsed deal file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealFile {
    /// Valuation date
    #[serde(default)]
    pub pricing_date: Option<NaiveDate>,
    /// Note principal in domestic currency
    pub principal: f64,
    /// Trading days between observations
    pub spacing_days: usize,
    /// Trading days to maturity
    pub horizon_days: usize,
    /// Flat coupon per period, used when `coupons` is absent
    #[serde(default)]
    pub coupon: Option<f64>,
    /// Coupon per observation period
    #[serde(default)]
    pub coupons: Option<Vec<f64>>,
    /// Fallback flat discount rate
    #[serde(default)]
    pub flat_rate: f64,
    /// FX spot; estimated from the curves when absent
    #[serde(default)]
    pub fx_spot: Option<f64>,
    /// Spot estimator used when `fx_spot` is absent
    #[serde(default)]
    pub spot_estimator: Option<SpotEstimator>,
    /// Basket, in model order
    pub underlyings: Vec<UnderlyingSpec>,
    /// One GARCH fit per underlying
    pub garch: Vec<GarchFit>,
    /// Correlation dynamics
    pub dcc: DccFit,
    /// Domestic (present value) curve
    pub domestic_curve: CurveSpec,
    /// Foreign (simulation) curve
    pub foreign_curve: CurveSpec,
    /// Monte Carlo settings
    #[serde(default)]
    pub monte_carlo: MonteCarloSection,
    /// Fair-coupon solver settings
    #[serde(default)]
    pub solver: FairCouponSettings,
    /// Bank cost model
    #[serde(default)]
    pub cost_model: CostModel,
    /// Competitiveness benchmark
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    /// Logging defaults
    #[serde(default)]
    pub logging: LoggingSection,
}

impl DealFile {
    /// Read and parse a deal file.
    ///
    /// # Errors
    ///
    /// `CliError::FileNotFound`, `CliError::Io` or `CliError::Parse`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse deal file text.
    ///
    /// # Errors
    ///
    /// `CliError::Parse` for malformed TOML or missing fields.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Validated underlyings.
    ///
    /// # Errors
    ///
    /// `CliError::Model` for an invalid price or dividend.
    pub fn underlyings(&self) -> Result<Vec<UnderlyingSpec>> {
        for spec in &self.underlyings {
            spec.validate()?;
        }
        Ok(self.underlyings.clone())
    }

    /// DCC-GARCH model of the basket.
    ///
    /// # Errors
    ///
    /// `CliError::Model` for invalid parameters or mismatched dimensions.
    pub fn model(&self) -> Result<DccGarchModel> {
        let garch = self
            .garch
            .iter()
            .map(GarchFit::to_params)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let long_run = CorrelationMatrix::from_rows(&self.dcc.correlation).map_err(ModelError::from)?;
        let dcc = DccParams::new(self.dcc.a, self.dcc.b, long_run)?;
        let model = if self.dcc.gaussian {
            DccGarchModel::gaussian(garch, dcc)?
        } else {
            DccGarchModel::new(garch, dcc, None)?
        };
        Ok(model)
    }

    /// Coupon schedule, with an optional flat override.
    ///
    /// # Errors
    ///
    /// `CliError::InvalidDeal` when neither `coupon` nor `coupons` is given.
    pub fn coupon_schedule(&self, flat_override: Option<f64>) -> Result<Vec<f64>> {
        let periods = if self.spacing_days == 0 {
            0
        } else {
            self.horizon_days / self.spacing_days
        };
        match (flat_override.or(self.coupon), &self.coupons) {
            (Some(flat), _) if flat_override.is_some() || self.coupons.is_none() => {
                Ok(vec![flat; periods])
            }
            (_, Some(coupons)) => Ok(coupons.clone()),
            _ => Err(CliError::InvalidDeal(
                "either `coupon` or `coupons` must be given".to_string(),
            )),
        }
    }

    /// Deal terms.
    ///
    /// # Errors
    ///
    /// `CliError::Model` for inconsistent terms, or curve errors.
    pub fn simulation_config(&self, flat_coupon: Option<f64>) -> Result<SimulationConfig> {
        let mut builder = SimulationConfig::builder()
            .coupons(self.coupon_schedule(flat_coupon)?)
            .spacing_days(self.spacing_days)
            .horizon_days(self.horizon_days)
            .principal(self.principal)
            .flat_rate(self.flat_rate)
            .domestic_curve(self.domestic_curve.build()?)
            .foreign_curve(self.foreign_curve.build()?)
            .maybe_fx_spot(self.fx_spot);
        if let Some(estimator) = self.spot_estimator {
            builder = builder.spot_estimator(estimator);
        }
        if let Some(date) = self.pricing_date {
            builder = builder.pricing_date(date);
        }
        Ok(builder.build()?)
    }

    /// Monte Carlo configuration with optional command-line overrides.
    ///
    /// # Errors
    ///
    /// `CliError::Config` for an invalid path count.
    pub fn monte_carlo(&self, paths: Option<usize>, seed: Option<u64>) -> Result<MonteCarloConfig> {
        let section = &self.monte_carlo;
        Ok(MonteCarloConfig::builder()
            .n_paths(paths.unwrap_or(section.n_paths))
            .seed(seed.unwrap_or(section.seed))
            .detailed_paths(section.detailed_paths)
            .discount_mode(section.discount_mode)
            .build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::YieldCurve;

    const MINIMAL: &str = r#"
        principal = 1000.0
        spacing_days = 126
        horizon_days = 252
        coupon = 0.05
        fx_spot = 5.0

        [[underlyings]]
        symbol = "A"
        initial_price = 100.0
        has_dividend = false
        dividend_yield = 0.0

        [[garch]]
        omega = 2e-6
        alpha = 0.05
        beta = 0.9
        initial_variance = 2e-4

        [dcc]
        a = 0.0
        b = 0.0
        correlation = [[1.0]]

        [domestic_curve]
        type = "flat"
        rate = 0.11

        [foreign_curve]
        type = "table"
        tenors = [0.5, 1.0]
        rates = [0.05, 0.045]
    "#;

    #[test]
    fn test_minimal_deal_uses_defaults() {
        let deal = DealFile::parse(MINIMAL).unwrap();
        assert_eq!(deal.monte_carlo, MonteCarloSection::default());
        assert_eq!(deal.solver, FairCouponSettings::default());
        assert_eq!(deal.cost_model, CostModel::default());
        assert_eq!(deal.logging.level, "info");
        assert_eq!(deal.coupon_schedule(None).unwrap(), vec![0.05, 0.05]);

        let config = deal.simulation_config(None).unwrap();
        assert_relative_eq!(config.fx_spot(), 5.0);
        assert_relative_eq!(config.foreign_curve().zero_rate(0.75).unwrap(), 0.0475, epsilon = 1e-12);
        assert_eq!(deal.model().unwrap().dim(), 1);
    }

    #[test]
    fn test_flat_override_replaces_schedule() {
        let mut deal = DealFile::parse(MINIMAL).unwrap();
        deal.coupons = Some(vec![0.01, 0.02]);
        assert_eq!(deal.coupon_schedule(None).unwrap(), vec![0.01, 0.02]);
        assert_eq!(deal.coupon_schedule(Some(0.03)).unwrap(), vec![0.03, 0.03]);

        deal.coupons = None;
        deal.coupon = None;
        assert!(matches!(deal.coupon_schedule(None), Err(CliError::InvalidDeal(_))));
    }

    #[test]
    fn test_command_line_overrides() {
        let deal = DealFile::parse(MINIMAL).unwrap();
        let mc = deal.monte_carlo(Some(500), Some(9)).unwrap();
        assert_eq!(mc.n_paths(), 500);
        assert_eq!(mc.seed(), 9);
        assert!(deal.monte_carlo(Some(0), None).is_err());
    }

    #[test]
    fn test_missing_section_is_a_parse_error() {
        let text = MINIMAL.replace("[dcc]", "[dcc_fit]");
        assert!(matches!(DealFile::parse(&text), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_bundled_deal_parses() {
        let deal = DealFile::parse(include_str!("../deals/brl_tech_basket.toml")).unwrap();
        assert_eq!(deal.underlyings().unwrap().len(), 4);
        assert_eq!(deal.model().unwrap().dim(), 4);
        assert!(deal.simulation_config(None).is_ok());
        assert!(deal.monte_carlo(None, None).is_ok());
    }
}
