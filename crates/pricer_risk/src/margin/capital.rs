//! Unexpected-loss capital model.
//!
//! The bank receives the principal and carries the note's present value as
//! a liability, so each path contributes a margin `P − PV_i`. Losses are the
//! paths where the liability exceeds the principal:
//!
//! ```text
//! EL  = mean(max(−m_i, 0))
//! VaR = max(−Q_{1−c}(m), 0)
//! ES  = max(−mean(m_i | m_i ≤ Q_{1−c}(m)), 0)
//! UL  = max(VaR − EL, 0)
//! K   = max(UL · multiplier, floor · P)
//! ```

use pricer_core::math::stats;

use super::config::CostModel;
use crate::error::RiskError;

/// Per-path bank margins `principal − PV_i`.
pub fn path_margins(present_values: &[f64], principal: f64) -> Vec<f64> {
    present_values.iter().map(|pv| principal - pv).collect()
}

/// Capital-at-risk figures of one payoff distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapitalMetrics {
    /// Confidence level used
    pub confidence_level: f64,
    /// Mean loss over all paths
    pub expected_loss: f64,
    /// Loss quantile at the confidence level
    pub value_at_risk: f64,
    /// Mean loss beyond the VaR quantile
    pub expected_shortfall: f64,
    /// VaR in excess of the expected loss
    pub unexpected_loss: f64,
    /// Capital held against the note
    pub regulatory_capital: f64,
    /// Whether the principal floor set the capital
    pub floor_binding: bool,
}

impl CapitalMetrics {
    /// Measure a sample of per-path margins.
    ///
    /// # Errors
    ///
    /// - `RiskError::EmptyDistribution` for an empty sample
    /// - Propagates [`CostModel::validate`]
    ///
    /// # Example
    ///
    /// ```
    /// use pricer_risk::margin::{CapitalMetrics, CostModel};
    ///
    /// // Every path earns the bank 20 on a principal of 1000
    /// let margins = vec![20.0; 100];
    /// let metrics = CapitalMetrics::from_margins(&margins, 1000.0, &CostModel::default()).unwrap();
    ///
    /// assert_eq!(metrics.value_at_risk, 0.0);
    /// assert_eq!(metrics.expected_loss, 0.0);
    /// // 3% floor
    /// assert!((metrics.regulatory_capital - 30.0).abs() < 1e-12);
    /// assert!(metrics.floor_binding);
    /// ```
    pub fn from_margins(
        margins: &[f64],
        principal: f64,
        cost: &CostModel,
    ) -> Result<Self, RiskError> {
        cost.validate()?;
        let c = cost.confidence_level;
        let tail = 1.0 - c;

        let losses: Vec<f64> = margins.iter().map(|m| (-m).max(0.0)).collect();
        let expected_loss = stats::mean(&losses).ok_or(RiskError::EmptyDistribution)?;
        let quantile = stats::quantile(margins, tail).ok_or(RiskError::EmptyDistribution)?;
        let tail_mean = stats::tail_mean(margins, tail).ok_or(RiskError::EmptyDistribution)?;

        let value_at_risk = (-quantile).max(0.0);
        let expected_shortfall = (-tail_mean).max(0.0);
        let unexpected_loss = (value_at_risk - expected_loss).max(0.0);
        let risk_capital = unexpected_loss * cost.regulatory_multiplier;
        let floor = principal * cost.capital_floor;

        Ok(Self {
            confidence_level: c,
            expected_loss,
            value_at_risk,
            expected_shortfall,
            unexpected_loss,
            regulatory_capital: risk_capital.max(floor),
            floor_binding: floor >= risk_capital,
        })
    }

    /// Capital charge for one year.
    pub fn capital_cost(&self, cost: &CostModel) -> f64 {
        self.regulatory_capital * cost.cost_of_capital
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_path_margins() {
        assert_eq!(path_margins(&[990.0, 1010.0], 1000.0), vec![10.0, -10.0]);
    }

    #[test]
    fn test_tail_losses_drive_capital() {
        let mut margins = vec![10.0; 95];
        margins.extend([-50.0; 5]);
        let metrics = CapitalMetrics::from_margins(&margins, 1000.0, &CostModel::default()).unwrap();

        assert_relative_eq!(metrics.value_at_risk, 50.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.expected_shortfall, 50.0, epsilon = 1e-12);
        assert_relative_eq!(metrics.expected_loss, 2.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.unexpected_loss, 47.5, epsilon = 1e-12);
        assert_relative_eq!(metrics.regulatory_capital, 47.5, epsilon = 1e-12);
        assert!(!metrics.floor_binding);
        assert_relative_eq!(
            metrics.capital_cost(&CostModel::default()),
            47.5 * 0.12,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_multiplier_scales_unexpected_loss() {
        let mut margins = vec![10.0; 95];
        margins.extend([-50.0; 5]);
        let cost = CostModel {
            regulatory_multiplier: 3.0,
            ..Default::default()
        };
        let metrics = CapitalMetrics::from_margins(&margins, 1000.0, &cost).unwrap();
        assert_relative_eq!(metrics.regulatory_capital, 142.5, epsilon = 1e-12);
    }

    #[test]
    fn test_shortfall_at_least_var() {
        let margins: Vec<f64> = (0..200).map(|i| (i as f64 - 40.0) * 0.7).collect();
        let cost = CostModel {
            confidence_level: 0.95,
            ..Default::default()
        };
        let metrics = CapitalMetrics::from_margins(&margins, 1000.0, &cost).unwrap();
        assert!(metrics.expected_shortfall >= metrics.value_at_risk);
        assert!(metrics.value_at_risk > 0.0);
    }

    #[test]
    fn test_empty_distribution() {
        assert_eq!(
            CapitalMetrics::from_margins(&[], 1000.0, &CostModel::default()),
            Err(RiskError::EmptyDistribution)
        );
    }
}
