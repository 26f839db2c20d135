//! Autocall deal terms.
//!
//! The note observes the basket every `spacing_days` trading days up to
//! `horizon_days`. Observation `k` (1-based) falls on day `k · spacing_days`
//! and carries coupon `coupons[k − 1]`.

use crate::error::ModelError;
use chrono::{Datelike, Days, NaiveDate, Weekday};
use pricer_core::market_data::curves::CurveEnum;
use pricer_core::market_data::fx::SpotEstimator;
use pricer_core::TRADING_DAYS_PER_YEAR;
use tracing::info;

/// Deal terms and market inputs for one pricing run.
///
/// Use [`SimulationConfigBuilder`] to construct instances.
///
/// # Examples
///
/// ```rust
/// use pricer_core::market_data::curves::CurveEnum;
/// use pricer_models::instruments::autocall::SimulationConfig;
///
/// let config = SimulationConfig::builder()
///     .coupons(vec![0.05, 0.05, 0.05, 0.05])
///     .spacing_days(126)
///     .horizon_days(504)
///     .principal(1_000.0)
///     .domestic_curve(CurveEnum::flat(0.10))
///     .foreign_curve(CurveEnum::flat(0.05))
///     .fx_spot(5.0)
///     .build()
///     .expect("valid deal");
///
/// assert_eq!(config.observation_days(), vec![126, 252, 378, 504]);
/// assert_eq!(config.observation_period(252), Some(2));
/// assert_eq!(config.observation_period(100), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    coupons: Vec<f64>,
    spacing_days: usize,
    horizon_days: usize,
    principal: f64,
    flat_rate: f64,
    domestic: CurveEnum<f64>,
    foreign: CurveEnum<f64>,
    fx_spot: f64,
    fx_spot_estimated: bool,
    pricing_date: Option<NaiveDate>,
}

impl SimulationConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> SimulationConfigBuilder {
        SimulationConfigBuilder::default()
    }

    /// Per-observation coupon rates.
    #[inline]
    pub fn coupons(&self) -> &[f64] {
        &self.coupons
    }

    /// Trading days between observations.
    #[inline]
    pub fn spacing_days(&self) -> usize {
        self.spacing_days
    }

    /// Final maturity in trading days.
    #[inline]
    pub fn horizon_days(&self) -> usize {
        self.horizon_days
    }

    /// Principal notional (domestic currency).
    #[inline]
    pub fn principal(&self) -> f64 {
        self.principal
    }

    /// Fallback flat discount rate.
    #[inline]
    pub fn flat_rate(&self) -> f64 {
        self.flat_rate
    }

    /// Domestic (BRL) curve.
    #[inline]
    pub fn domestic_curve(&self) -> &CurveEnum<f64> {
        &self.domestic
    }

    /// Foreign (USD) curve.
    #[inline]
    pub fn foreign_curve(&self) -> &CurveEnum<f64> {
        &self.foreign
    }

    /// FX spot, domestic per foreign.
    #[inline]
    pub fn fx_spot(&self) -> f64 {
        self.fx_spot
    }

    /// Whether the spot came from the heuristic estimator.
    #[inline]
    pub fn fx_spot_estimated(&self) -> bool {
        self.fx_spot_estimated
    }

    /// Pricing date, if supplied.
    #[inline]
    pub fn pricing_date(&self) -> Option<NaiveDate> {
        self.pricing_date
    }

    /// Number of observation dates.
    #[inline]
    pub fn num_observations(&self) -> usize {
        self.coupons.len()
    }

    /// Observation days `spacing, 2·spacing, …, horizon`.
    pub fn observation_days(&self) -> Vec<usize> {
        (1..=self.num_observations())
            .map(|k| k * self.spacing_days)
            .collect()
    }

    /// 1-based observation period falling on `day`, if any.
    #[inline]
    pub fn observation_period(&self, day: usize) -> Option<usize> {
        if day > 0 && day <= self.horizon_days && day % self.spacing_days == 0 {
            Some(day / self.spacing_days)
        } else {
            None
        }
    }

    /// Maturity in years.
    #[inline]
    pub fn horizon_years(&self) -> f64 {
        self.horizon_days as f64 / TRADING_DAYS_PER_YEAR
    }

    /// Observation periods per year, `252 / spacing`.
    #[inline]
    pub fn periods_per_year(&self) -> f64 {
        TRADING_DAYS_PER_YEAR / self.spacing_days as f64
    }

    /// Calendar dates of the observations, counting weekdays from the
    /// pricing date. `None` without a pricing date.
    pub fn observation_dates(&self) -> Option<Vec<NaiveDate>> {
        let start = self.pricing_date?;
        self.observation_days()
            .into_iter()
            .map(|d| add_trading_days(start, d))
            .collect()
    }

    /// Copy with a different coupon schedule.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidDealTerms` if the schedule length or values are invalid.
    pub fn with_coupons(&self, coupons: Vec<f64>) -> Result<Self, ModelError> {
        validate_coupons(&coupons, self.num_observations())?;
        Ok(Self {
            coupons,
            ..self.clone()
        })
    }

    /// Copy with the same coupon on every observation.
    pub fn with_flat_coupon(&self, coupon: f64) -> Result<Self, ModelError> {
        self.with_coupons(vec![coupon; self.num_observations()])
    }

    /// Copy with a different FX spot.
    pub fn with_fx_spot(&self, fx_spot: f64) -> Result<Self, ModelError> {
        validate_spot(fx_spot)?;
        Ok(Self {
            fx_spot,
            fx_spot_estimated: false,
            ..self.clone()
        })
    }

    /// Copy with replaced curves (e.g. parallel-shifted for rate scenarios).
    pub fn with_curves(&self, domestic: CurveEnum<f64>, foreign: CurveEnum<f64>) -> Self {
        Self {
            domestic,
            foreign,
            ..self.clone()
        }
    }
}

/// Builder for [`SimulationConfig`].
///
/// Validation happens in [`build`](Self::build). When no FX spot is given the
/// builder estimates one from the curves with its [`SpotEstimator`].
#[derive(Clone, Debug, Default)]
pub struct SimulationConfigBuilder {
    coupons: Option<Vec<f64>>,
    spacing_days: Option<usize>,
    horizon_days: Option<usize>,
    principal: Option<f64>,
    flat_rate: f64,
    domestic: Option<CurveEnum<f64>>,
    foreign: Option<CurveEnum<f64>>,
    fx_spot: Option<f64>,
    spot_estimator: SpotEstimator,
    pricing_date: Option<NaiveDate>,
}

impl SimulationConfigBuilder {
    /// Sets the per-observation coupon rates.
    #[inline]
    pub fn coupons(mut self, coupons: Vec<f64>) -> Self {
        self.coupons = Some(coupons);
        self
    }

    /// Sets the trading days between observations.
    #[inline]
    pub fn spacing_days(mut self, spacing_days: usize) -> Self {
        self.spacing_days = Some(spacing_days);
        self
    }

    /// Sets the horizon in trading days.
    #[inline]
    pub fn horizon_days(mut self, horizon_days: usize) -> Self {
        self.horizon_days = Some(horizon_days);
        self
    }

    /// Sets the principal notional.
    #[inline]
    pub fn principal(mut self, principal: f64) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Sets the fallback flat discount rate (default 0).
    #[inline]
    pub fn flat_rate(mut self, flat_rate: f64) -> Self {
        self.flat_rate = flat_rate;
        self
    }

    /// Sets the domestic curve.
    #[inline]
    pub fn domestic_curve(mut self, curve: CurveEnum<f64>) -> Self {
        self.domestic = Some(curve);
        self
    }

    /// Sets the foreign curve.
    #[inline]
    pub fn foreign_curve(mut self, curve: CurveEnum<f64>) -> Self {
        self.foreign = Some(curve);
        self
    }

    /// Sets the FX spot.
    #[inline]
    pub fn fx_spot(mut self, fx_spot: f64) -> Self {
        self.fx_spot = Some(fx_spot);
        self
    }

    /// Sets an optional FX spot; `None` falls back to the estimator.
    #[inline]
    pub fn maybe_fx_spot(mut self, fx_spot: Option<f64>) -> Self {
        self.fx_spot = fx_spot;
        self
    }

    /// Sets the estimator used when no spot is supplied.
    #[inline]
    pub fn spot_estimator(mut self, estimator: SpotEstimator) -> Self {
        self.spot_estimator = estimator;
        self
    }

    /// Sets the pricing date.
    #[inline]
    pub fn pricing_date(mut self, date: NaiveDate) -> Self {
        self.pricing_date = Some(date);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidDealTerms` naming the first offending field, or
    /// `ModelError::MarketData` if spot estimation fails.
    pub fn build(self) -> Result<SimulationConfig, ModelError> {
        let spacing_days = self.spacing_days.ok_or_else(|| missing("spacing_days"))?;
        let horizon_days = self.horizon_days.ok_or_else(|| missing("horizon_days"))?;
        let coupons = self.coupons.ok_or_else(|| missing("coupons"))?;
        let principal = self.principal.ok_or_else(|| missing("principal"))?;
        let domestic = self.domestic.ok_or_else(|| missing("domestic_curve"))?;
        let foreign = self.foreign.ok_or_else(|| missing("foreign_curve"))?;

        if spacing_days == 0 {
            return Err(invalid("spacing_days", "must be positive".to_string()));
        }
        if horizon_days == 0 || horizon_days % spacing_days != 0 {
            return Err(invalid(
                "horizon_days",
                format!(
                    "must be a positive multiple of spacing {}, got {}",
                    spacing_days, horizon_days
                ),
            ));
        }
        validate_coupons(&coupons, horizon_days / spacing_days)?;
        if !(principal.is_finite() && principal > 0.0) {
            return Err(invalid(
                "principal",
                format!("must be positive, got {}", principal),
            ));
        }
        if !self.flat_rate.is_finite() {
            return Err(invalid("flat_rate", "must be finite".to_string()));
        }

        let (fx_spot, fx_spot_estimated) = match self.fx_spot {
            Some(spot) => (spot, false),
            None => {
                let spot = self.spot_estimator.estimate(&domestic, &foreign)?;
                info!(
                    spot,
                    reference = self.spot_estimator.reference_level,
                    "no FX spot supplied, using heuristic estimate"
                );
                (spot, true)
            }
        };
        validate_spot(fx_spot)?;

        Ok(SimulationConfig {
            coupons,
            spacing_days,
            horizon_days,
            principal,
            flat_rate: self.flat_rate,
            domestic,
            foreign,
            fx_spot,
            fx_spot_estimated,
            pricing_date: self.pricing_date,
        })
    }
}

fn missing(field: &'static str) -> ModelError {
    invalid(field, "must be specified".to_string())
}

fn invalid(field: &'static str, reason: String) -> ModelError {
    ModelError::InvalidDealTerms { field, reason }
}

fn validate_coupons(coupons: &[f64], expected: usize) -> Result<(), ModelError> {
    if coupons.len() != expected {
        return Err(invalid(
            "coupons",
            format!(
                "expected {} observation coupons, got {}",
                expected,
                coupons.len()
            ),
        ));
    }
    if let Some(bad) = coupons.iter().find(|c| !(c.is_finite() && **c >= 0.0)) {
        return Err(invalid(
            "coupons",
            format!("coupon rates must be finite and non-negative, got {}", bad),
        ));
    }
    Ok(())
}

fn validate_spot(spot: f64) -> Result<(), ModelError> {
    if !(spot.is_finite() && spot > 0.0) {
        return Err(invalid("fx_spot", format!("must be positive, got {}", spot)));
    }
    Ok(())
}

/// Advance `date` by `days` weekdays.
fn add_trading_days(date: NaiveDate, days: usize) -> Option<NaiveDate> {
    let mut current = date;
    let mut remaining = days;
    while remaining > 0 {
        current = current.checked_add_days(Days::new(1))?;
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            remaining -= 1;
        }
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricer_core::market_data::curves::YieldCurve;

    fn builder() -> SimulationConfigBuilder {
        SimulationConfig::builder()
            .coupons(vec![0.05, 0.05])
            .spacing_days(126)
            .horizon_days(252)
            .principal(100.0)
            .domestic_curve(CurveEnum::flat(0.10))
            .foreign_curve(CurveEnum::flat(0.05))
            .fx_spot(5.0)
    }

    // ========================================
    // Validation Tests
    // ========================================

    #[test]
    fn test_valid_config() {
        let config = builder().build().unwrap();
        assert_eq!(config.num_observations(), 2);
        assert_eq!(config.horizon_years(), 1.0);
        assert_eq!(config.periods_per_year(), 2.0);
        assert!(!config.fx_spot_estimated());
    }

    #[test]
    fn test_coupon_length_mismatch() {
        let err = builder().coupons(vec![0.05; 3]).build().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidDealTerms {
                field: "coupons",
                ..
            }
        ));
    }

    #[test]
    fn test_horizon_not_multiple_of_spacing() {
        let err = builder().horizon_days(250).build().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidDealTerms {
                field: "horizon_days",
                ..
            }
        ));
    }

    #[test]
    fn test_non_positive_principal() {
        for principal in [0.0, -100.0, f64::NAN] {
            let err = builder().principal(principal).build().unwrap_err();
            assert!(matches!(
                err,
                ModelError::InvalidDealTerms {
                    field: "principal",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_missing_field() {
        let err = SimulationConfig::builder()
            .spacing_days(126)
            .horizon_days(126)
            .coupons(vec![0.05])
            .principal(100.0)
            .foreign_curve(CurveEnum::flat(0.05))
            .fx_spot(5.0)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidDealTerms {
                field: "domestic_curve",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_coupon_rejected() {
        assert!(builder().coupons(vec![0.05, -0.01]).build().is_err());
    }

    // ========================================
    // Spot Estimation
    // ========================================

    #[test]
    fn test_spot_estimated_when_absent() {
        let config = builder().maybe_fx_spot(None).build().unwrap();
        assert!(config.fx_spot_estimated());
        let expected = 5.0 * (0.3_f64 * 0.05).exp();
        assert!((config.fx_spot() - expected).abs() < 1e-12);

        let quoted = config.with_fx_spot(5.4).unwrap();
        assert!(!quoted.fx_spot_estimated());
        assert!(config.with_fx_spot(0.0).is_err());
    }

    // ========================================
    // Schedule and Copies
    // ========================================

    #[test]
    fn test_observation_period_lookup() {
        let config = builder().build().unwrap();
        assert_eq!(config.observation_period(0), None);
        assert_eq!(config.observation_period(126), Some(1));
        assert_eq!(config.observation_period(252), Some(2));
        assert_eq!(config.observation_period(378), None);
    }

    #[test]
    fn test_with_flat_coupon() {
        let config = builder().build().unwrap().with_flat_coupon(0.08).unwrap();
        assert_eq!(config.coupons(), &[0.08, 0.08]);
    }

    #[test]
    fn test_with_curves() {
        let config = builder().build().unwrap();
        let shifted = config.with_curves(
            config.domestic_curve().clone().parallel_shift(0.01),
            config.foreign_curve().clone(),
        );
        let r = shifted.domestic_curve().zero_rate(1.0).unwrap();
        assert!((r - 0.11).abs() < 1e-12);
    }

    #[test]
    fn test_observation_dates_skip_weekends() {
        // 2024-01-05 is a Friday
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            add_trading_days(start, 1),
            NaiveDate::from_ymd_opt(2024, 1, 8)
        );
        assert_eq!(
            add_trading_days(start, 5),
            NaiveDate::from_ymd_opt(2024, 1, 12)
        );

        let config = builder().pricing_date(start).build().unwrap();
        let dates = config.observation_dates().unwrap();
        assert_eq!(dates.len(), 2);
        assert!(dates.iter().all(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(builder().build().unwrap().observation_dates().is_none());
    }
}
