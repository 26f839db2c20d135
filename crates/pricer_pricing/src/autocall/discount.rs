//! Cash-flow discounting for the autocall payoff.
//!
//! The default mode routes a domestic (BRL) cash flow through the foreign
//! (USD) numéraire under which the underlyings are simulated:
//!
//! ```text
//! τ  = day / 252
//! F  = S · exp((r_d(τ) − r_f(τ)) · τ)
//! PV = nominal / F · df_f(τ) · S
//! ```

use pricer_core::market_data::curves::YieldCurve;
use pricer_core::market_data::fx::forward_rate;
use pricer_core::market_data::MarketDataError;
use pricer_core::TRADING_DAYS_PER_YEAR;
use pricer_models::instruments::SimulationConfig;

/// How a nominal payoff is brought back to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiscountMode {
    /// Convert at the FX forward, discount on the foreign curve, convert back at spot
    #[default]
    DualCurrency,
    /// Discount directly on the domestic curve
    DomesticCurve,
    /// Discount at the deal's fallback flat rate
    FlatRate,
}

/// One discounting leg at a cash-flow date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountLeg {
    /// Trading day of the cash flow
    pub day: usize,
    /// Year fraction `day / 252`
    pub tau: f64,
    /// Domestic zero rate at `tau`
    pub domestic_rate: f64,
    /// Foreign zero rate at `tau`
    pub foreign_rate: f64,
    /// FX forward at `tau`
    pub forward: f64,
    /// Foreign discount factor at `tau`
    pub foreign_df: f64,
    /// Multiplier taking a nominal to its present value
    pub pv_factor: f64,
}

/// Precomputed discounting legs for every observation date of a deal.
///
/// Because the horizon is an observation date, every cash flow of the note
/// lands on one of these legs.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::CurveEnum;
/// use pricer_models::instruments::SimulationConfig;
/// use pricer_pricing::autocall::{CashFlowDiscounter, DiscountMode};
///
/// let deal = SimulationConfig::builder()
///     .coupons(vec![0.05])
///     .spacing_days(126)
///     .horizon_days(126)
///     .principal(100.0)
///     .domestic_curve(CurveEnum::flat(0.10))
///     .foreign_curve(CurveEnum::flat(0.05))
///     .fx_spot(5.0)
///     .build()
///     .unwrap();
///
/// let discounter = CashFlowDiscounter::new(&deal, DiscountMode::DualCurrency).unwrap();
/// let forward = 5.0 * (0.05_f64 * 0.5).exp();
/// let expected = 105.0 / forward * (-0.05_f64 * 0.5).exp() * 5.0;
/// assert!((discounter.present_value(105.0, 1) - expected).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CashFlowDiscounter {
    mode: DiscountMode,
    spot: f64,
    legs: Vec<DiscountLeg>,
}

impl CashFlowDiscounter {
    /// Precompute the legs for every observation of `config`.
    ///
    /// # Errors
    ///
    /// Propagates curve lookup failures.
    pub fn new(config: &SimulationConfig, mode: DiscountMode) -> Result<Self, MarketDataError> {
        let legs = config
            .observation_days()
            .into_iter()
            .map(|day| Self::leg(config, mode, day))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            mode,
            spot: config.fx_spot(),
            legs,
        })
    }

    fn leg(
        config: &SimulationConfig,
        mode: DiscountMode,
        day: usize,
    ) -> Result<DiscountLeg, MarketDataError> {
        let spot = config.fx_spot();
        let tau = day as f64 / TRADING_DAYS_PER_YEAR;
        let domestic = config.domestic_curve();
        let foreign = config.foreign_curve();

        let domestic_rate = domestic.zero_rate(tau)?;
        let foreign_rate = foreign.zero_rate(tau)?;
        let foreign_df = foreign.discount_factor(tau)?;
        let forward = forward_rate(spot, domestic_rate, foreign_rate, tau);

        let pv_factor = match mode {
            DiscountMode::DualCurrency => foreign_df * spot / forward,
            DiscountMode::DomesticCurve => domestic.discount_factor(tau)?,
            DiscountMode::FlatRate => (-config.flat_rate() * tau).exp(),
        };

        Ok(DiscountLeg {
            day,
            tau,
            domestic_rate,
            foreign_rate,
            forward,
            foreign_df,
            pv_factor,
        })
    }

    /// Discounting mode.
    pub fn mode(&self) -> DiscountMode {
        self.mode
    }

    /// FX spot the legs were built with.
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Leg for 1-based observation `period`.
    ///
    /// # Panics
    ///
    /// Panics if `period` is 0 or beyond the last observation.
    #[inline]
    pub fn leg_for_period(&self, period: usize) -> &DiscountLeg {
        &self.legs[period - 1]
    }

    /// Leg at the horizon.
    #[inline]
    pub fn horizon_leg(&self) -> &DiscountLeg {
        &self.legs[self.legs.len() - 1]
    }

    /// Present-value factor for a cash flow at `period`.
    #[inline]
    pub fn pv_factor(&self, period: usize) -> f64 {
        self.leg_for_period(period).pv_factor
    }

    /// Present value of `nominal` paid at `period`.
    #[inline]
    pub fn present_value(&self, nominal: f64, period: usize) -> f64 {
        nominal * self.pv_factor(period)
    }

    /// Value of `nominal` in the foreign numéraire, `nominal / F · df_f`.
    ///
    /// Multiplying by the spot gives the dual-currency present value.
    #[inline]
    pub fn foreign_value(&self, nominal: f64, period: usize) -> f64 {
        let leg = self.leg_for_period(period);
        nominal / leg.forward * leg.foreign_df
    }

    /// All legs in observation order.
    pub fn legs(&self) -> &[DiscountLeg] {
        &self.legs
    }
}
