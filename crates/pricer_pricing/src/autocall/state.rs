//! Per-path autocall lifecycle.
//!
//! ```text
//! Alive ──trigger at period k──▶ Exercised { k }
//!   │
//!   └──horizon, no trigger────▶ Matured
//! ```
//!
//! Terminal states absorb every later observation.

/// Lifecycle state of one simulated note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutocallState {
    /// Not yet redeemed
    Alive,
    /// Redeemed early at an observation
    Exercised {
        /// 1-based observation period
        period: usize,
        /// Trading day of redemption
        day: usize,
    },
    /// Reached the horizon without a trigger
    Matured,
}

impl AutocallState {
    /// Whether the state is absorbing.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AutocallState::Alive)
    }

    /// Exercise period, 0 when not exercised.
    #[inline]
    pub fn exercise_period(&self) -> usize {
        match self {
            AutocallState::Exercised { period, .. } => *period,
            _ => 0,
        }
    }

    /// Exercise day, 0 when not exercised.
    #[inline]
    pub fn exercise_day(&self) -> usize {
        match self {
            AutocallState::Exercised { day, .. } => *day,
            _ => 0,
        }
    }
}

/// State machine plus the coupon accrued along the path.
///
/// Coupons accrue at every observation reached while alive. They are paid
/// only on early redemption; a matured note returns principal alone.
///
/// # Example
///
/// ```
/// use pricer_pricing::autocall::{AutocallLifecycle, AutocallState};
///
/// let mut note = AutocallLifecycle::new();
/// note.observe(1, 126, false, 0.05, false);
/// note.observe(2, 252, true, 0.05, false);
///
/// assert_eq!(note.state(), AutocallState::Exercised { period: 2, day: 252 });
/// assert!((note.nominal_payoff(100.0) - 110.0).abs() < 1e-12);
///
/// // Absorbing: later observations change nothing
/// note.observe(3, 378, true, 0.05, true);
/// assert_eq!(note.state().exercise_period(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AutocallLifecycle {
    state: AutocallState,
    cumulative_coupon: f64,
}

impl Default for AutocallLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl AutocallLifecycle {
    /// A fresh, alive note.
    pub fn new() -> Self {
        Self {
            state: AutocallState::Alive,
            cumulative_coupon: 0.0,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> AutocallState {
        self.state
    }

    /// Sum of the coupons accrued so far.
    #[inline]
    pub fn cumulative_coupon(&self) -> f64 {
        self.cumulative_coupon
    }

    /// Whether the note has left the alive state.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Apply one observation.
    ///
    /// # Arguments
    ///
    /// * `period` - 1-based observation index
    /// * `day` - Trading day of the observation
    /// * `triggered` - Whether every underlying is at or above its initial level
    /// * `coupon` - Coupon rate of this period
    /// * `is_final` - Whether this observation is the horizon
    pub fn observe(
        &mut self,
        period: usize,
        day: usize,
        triggered: bool,
        coupon: f64,
        is_final: bool,
    ) -> AutocallState {
        if self.is_terminal() {
            return self.state;
        }
        self.cumulative_coupon += coupon;
        if triggered {
            self.state = AutocallState::Exercised { period, day };
        } else if is_final {
            self.state = AutocallState::Matured;
        }
        self.state
    }

    /// Nominal payoff for `principal` in the current state.
    ///
    /// `principal · (1 + cumulative coupon)` once exercised, `principal`
    /// otherwise.
    #[inline]
    pub fn nominal_payoff(&self, principal: f64) -> f64 {
        match self.state {
            AutocallState::Exercised { .. } => principal * (1.0 + self.cumulative_coupon),
            _ => principal,
        }
    }
}
