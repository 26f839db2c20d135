//! Cost, capital and benchmark parameters.

use crate::error::RiskError;

/// Cost and capital model of the issuing bank.
///
/// All rates are annual fractions of principal except `capital_floor`,
/// which is a one-off fraction of principal.
///
/// # Examples
///
/// ```
/// use pricer_risk::margin::CostModel;
///
/// let cost = CostModel::default();
/// assert_eq!(cost.confidence_level, 0.99);
/// assert_eq!(cost.capital_floor, 0.03);
/// assert!(cost.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostModel {
    /// VaR and expected-shortfall confidence level
    pub confidence_level: f64,
    /// Multiplier applied to unexpected loss
    pub regulatory_multiplier: f64,
    /// Minimum capital as a fraction of principal
    pub capital_floor: f64,
    /// Annual cost of holding capital
    pub cost_of_capital: f64,
    /// Operational cost per year, fraction of principal
    pub operational_cost_rate: f64,
    /// Risk buffer, fraction of principal
    pub risk_buffer_rate: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            confidence_level: 0.99,
            regulatory_multiplier: 1.0,
            capital_floor: 0.03,
            cost_of_capital: 0.12,
            operational_cost_rate: 0.005,
            risk_buffer_rate: 0.01,
        }
    }
}

impl CostModel {
    /// Check every parameter.
    ///
    /// # Errors
    ///
    /// - `RiskError::InvalidConfidence` unless `0 < confidence_level < 1`
    /// - `RiskError::InvalidCostModel` for a negative or non-finite rate
    pub fn validate(&self) -> Result<(), RiskError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(RiskError::InvalidConfidence(self.confidence_level));
        }
        for (field, value) in [
            ("regulatory_multiplier", self.regulatory_multiplier),
            ("capital_floor", self.capital_floor),
            ("cost_of_capital", self.cost_of_capital),
            ("operational_cost_rate", self.operational_cost_rate),
            ("risk_buffer_rate", self.risk_buffer_rate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(RiskError::InvalidCostModel {
                    field,
                    reason: format!("{value} must be finite and non-negative"),
                });
            }
        }
        if self.capital_floor == 0.0 {
            return Err(RiskError::InvalidCostModel {
                field: "capital_floor",
                reason: "must be positive so RAROC is defined".to_string(),
            });
        }
        Ok(())
    }
}

/// Market reference for coupon competitiveness.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BenchmarkConfig {
    /// Reference short rate (annual)
    pub reference_rate: f64,
    /// Spread investors expect over the reference
    pub spread: f64,
    /// Margin above the benchmark for an attractive coupon
    pub attractive_band: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            reference_rate: 0.1075,
            spread: 0.02,
            attractive_band: 0.01,
        }
    }
}

impl BenchmarkConfig {
    /// Annual benchmark coupon, reference plus spread.
    pub fn benchmark_rate(&self) -> f64 {
        self.reference_rate + self.spread
    }

    /// Label an annualised coupon against the benchmark.
    pub fn classify(&self, annual_coupon: f64) -> Competitiveness {
        let benchmark = self.benchmark_rate();
        if annual_coupon >= benchmark + self.attractive_band {
            Competitiveness::Attractive
        } else if annual_coupon >= benchmark {
            Competitiveness::Competitive
        } else {
            Competitiveness::BelowMarket
        }
    }
}

/// Qualitative coupon label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Competitiveness {
    /// At least `attractive_band` above the benchmark
    Attractive,
    /// At or above the benchmark
    Competitive,
    /// Below the benchmark
    BelowMarket,
}

impl Competitiveness {
    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Attractive => "Attractive",
            Self::Competitive => "Competitive",
            Self::BelowMarket => "Below market",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_benchmark() {
        let benchmark = BenchmarkConfig::default();
        assert!((benchmark.benchmark_rate() - 0.1275).abs() < 1e-12);
    }

    #[test]
    fn test_classification_thresholds() {
        let benchmark = BenchmarkConfig::default();
        assert_eq!(benchmark.classify(0.15), Competitiveness::Attractive);
        assert_eq!(benchmark.classify(0.13), Competitiveness::Competitive);
        assert_eq!(benchmark.classify(0.10), Competitiveness::BelowMarket);
        assert_eq!(
            benchmark.classify(benchmark.benchmark_rate()),
            Competitiveness::Competitive
        );
    }

    #[test]
    fn test_cost_model_validation() {
        let bad = CostModel {
            confidence_level: 1.0,
            ..Default::default()
        };
        assert_eq!(bad.validate(), Err(RiskError::InvalidConfidence(1.0)));

        let bad = CostModel {
            cost_of_capital: -0.01,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(RiskError::InvalidCostModel {
                field: "cost_of_capital",
                ..
            })
        ));

        let bad = CostModel {
            capital_floor: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
