//! Margin scenarios.
//!
//! Each scenario re-prices the note under a shocked model or deal and
//! reports the bank margin. Volatility shocks scale every asset's GARCH
//! intercept and initial variance (so conditional volatility scales by the
//! factor); rate shocks shift the domestic curve in parallel.

use pricer_models::instruments::SimulationConfig;
use pricer_models::models::DccGarchModel;
use pricer_models::underlying::UnderlyingSpec;
use pricer_pricing::mc::{MonteCarloConfig, PathSimulator};
use rayon::prelude::*;
use tracing::debug;

use crate::error::RiskError;

/// A named shock applied before re-pricing.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarginScenario {
    /// Unshocked inputs
    Base,
    /// Volatility multiplied by `factor`
    Stress {
        /// Volatility multiplier (> 1)
        factor: f64,
    },
    /// Volatility divided by `factor`
    Optimistic {
        /// Volatility divisor (> 1)
        factor: f64,
    },
    /// Parallel shift of the domestic curve
    DomesticRateShift {
        /// Shift in rate units (0.01 = 100bp)
        shift: f64,
    },
}

impl MarginScenario {
    /// Default sweep: base, ±50% volatility, ±100bp domestic rates.
    pub fn presets() -> Vec<Self> {
        vec![
            Self::Base,
            Self::Stress { factor: 1.5 },
            Self::Optimistic { factor: 1.5 },
            Self::DomesticRateShift { shift: 0.01 },
            Self::DomesticRateShift { shift: -0.01 },
        ]
    }

    /// Short name used as the scenario key.
    pub fn name(&self) -> String {
        match self {
            Self::Base => "Base".to_string(),
            Self::Stress { .. } => "Stress".to_string(),
            Self::Optimistic { .. } => "Optimistic".to_string(),
            Self::DomesticRateShift { shift } => {
                format!("Domestic {:+.0}bp", shift * 10_000.0)
            }
        }
    }

    /// Human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::Base => "Calibrated model and market curves".to_string(),
            Self::Stress { factor } => format!("Volatility ×{factor}"),
            Self::Optimistic { factor } => format!("Volatility ÷{factor}"),
            Self::DomesticRateShift { shift } => {
                format!("Domestic curve shifted {:+.2}%", shift * 100.0)
            }
        }
    }

    /// Shocked copies of the model and deal.
    ///
    /// # Errors
    ///
    /// `RiskError::InvalidCostModel` for a non-positive or non-finite factor.
    pub fn apply(
        &self,
        model: &DccGarchModel,
        deal: &SimulationConfig,
    ) -> Result<(DccGarchModel, SimulationConfig), RiskError> {
        let check = |factor: f64| {
            if factor.is_finite() && factor > 0.0 {
                Ok(factor)
            } else {
                Err(RiskError::InvalidCostModel {
                    field: "scenario_factor",
                    reason: format!("{factor} must be positive"),
                })
            }
        };
        Ok(match *self {
            Self::Base => (model.clone(), deal.clone()),
            Self::Stress { factor } => (model.scale_volatility(check(factor)?), deal.clone()),
            Self::Optimistic { factor } => {
                (model.scale_volatility(1.0 / check(factor)?), deal.clone())
            }
            Self::DomesticRateShift { shift } => {
                let domestic = deal.domestic_curve().clone().parallel_shift(shift);
                let foreign = deal.foreign_curve().clone();
                (model.clone(), deal.with_curves(domestic, foreign))
            }
        })
    }
}

/// Price and margin under one scenario.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenarioOutcome {
    /// Scenario applied
    pub scenario: MarginScenario,
    /// Scenario key
    pub name: String,
    /// Mean present value
    pub price: f64,
    /// `principal − price`
    pub margin: f64,
    /// Margin as a fraction of principal
    pub margin_pct: f64,
}

/// Re-price the deal under every scenario.
///
/// Scenarios run concurrently; each uses the same Monte Carlo settings, so
/// differences come from the shock rather than from sampling.
///
/// # Errors
///
/// Propagates shock and simulator setup failures.
pub fn run_scenarios(
    underlyings: &[UnderlyingSpec],
    model: &DccGarchModel,
    deal: &SimulationConfig,
    mc: &MonteCarloConfig,
    scenarios: &[MarginScenario],
) -> Result<Vec<ScenarioOutcome>, RiskError> {
    let principal = deal.principal();
    scenarios
        .par_iter()
        .map(|scenario| {
            let (shocked_model, shocked_deal) = scenario.apply(model, deal)?;
            let price = PathSimulator::new(underlyings, &shocked_model, &shocked_deal, mc)?
                .simulate()
                .price();
            let margin = principal - price;
            debug!(scenario = %scenario.name(), price, margin, "Scenario priced");
            Ok(ScenarioOutcome {
                scenario: *scenario,
                name: scenario.name(),
                price,
                margin,
                margin_pct: margin / principal,
            })
        })
        .collect()
}

/// Half the spread between the stress and optimistic margins.
pub fn margin_volatility(outcomes: &[ScenarioOutcome]) -> Option<f64> {
    let find = |pred: fn(&MarginScenario) -> bool| {
        outcomes.iter().find(|o| pred(&o.scenario)).map(|o| o.margin)
    };
    let stress = find(|s| matches!(s, MarginScenario::Stress { .. }))?;
    let optimistic = find(|s| matches!(s, MarginScenario::Optimistic { .. }))?;
    Some((stress - optimistic).abs() / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
    use pricer_models::models::GarchParams;

    fn deal() -> SimulationConfig {
        SimulationConfig::builder()
            .coupons(vec![0.05; 2])
            .spacing_days(126)
            .horizon_days(252)
            .principal(1000.0)
            .domestic_curve(CurveEnum::flat(0.10))
            .foreign_curve(CurveEnum::flat(0.05))
            .fx_spot(5.0)
            .build()
            .unwrap()
    }

    fn model() -> DccGarchModel {
        let garch = GarchParams::new(2e-6, 0.05, 0.9, 0.0, 2e-4).unwrap();
        DccGarchModel::uncorrelated(vec![garch; 2]).unwrap()
    }

    #[test]
    fn test_names() {
        let names: Vec<String> = MarginScenario::presets().iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["Base", "Stress", "Optimistic", "Domestic +100bp", "Domestic -100bp"]
        );
    }

    #[test]
    fn test_stress_scales_variance() {
        let (stressed, _) = MarginScenario::Stress { factor: 2.0 }
            .apply(&model(), &deal())
            .unwrap();
        assert_relative_eq!(stressed.garch()[0].initial_variance, 8e-4, epsilon = 1e-15);
        assert_relative_eq!(stressed.garch()[0].omega, 8e-6, epsilon = 1e-18);
    }

    #[test]
    fn test_rate_shift_moves_domestic_only() {
        let (_, shifted) = MarginScenario::DomesticRateShift { shift: 0.01 }
            .apply(&model(), &deal())
            .unwrap();
        assert_relative_eq!(shifted.domestic_curve().zero_rate(1.0).unwrap(), 0.11, epsilon = 1e-12);
        assert_relative_eq!(shifted.foreign_curve().zero_rate(1.0).unwrap(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_factor() {
        assert!(MarginScenario::Optimistic { factor: 0.0 }
            .apply(&model(), &deal())
            .is_err());
    }

    #[test]
    fn test_higher_domestic_rates_raise_margin() {
        let underlyings = vec![
            UnderlyingSpec::new("A", 100.0, false, 0.0).unwrap(),
            UnderlyingSpec::new("B", 100.0, false, 0.0).unwrap(),
        ];
        let mc = MonteCarloConfig::builder().n_paths(200).seed(3).build().unwrap();
        let outcomes = run_scenarios(
            &underlyings,
            &model(),
            &deal(),
            &mc,
            &[
                MarginScenario::Base,
                MarginScenario::DomesticRateShift { shift: 0.02 },
            ],
        )
        .unwrap();

        assert_eq!(outcomes[0].name, "Base");
        assert!(outcomes[1].margin > outcomes[0].margin);
        assert!(margin_volatility(&outcomes).is_none());
    }

    #[test]
    fn test_margin_volatility() {
        let outcome = |scenario: MarginScenario, margin: f64| ScenarioOutcome {
            scenario,
            name: scenario.name(),
            price: 1000.0 - margin,
            margin,
            margin_pct: margin / 1000.0,
        };
        let outcomes = vec![
            outcome(MarginScenario::Base, 20.0),
            outcome(MarginScenario::Stress { factor: 1.5 }, -10.0),
            outcome(MarginScenario::Optimistic { factor: 1.5 }, 40.0),
        ];
        assert_relative_eq!(margin_volatility(&outcomes).unwrap(), 25.0);
    }
}
