//! GARCH(1,1) conditional variance parameters.
//!
//! Daily log-returns follow
//!
//! ```text
//! h_t = ω + α · ε²_{t−1} + β · h_{t−1}
//! ε_t = √h_t · z_t
//! ```
//!
//! with one step equal to one trading day. Coefficients come from an
//! external fit; this module only holds and steps them.

use crate::error::ModelError;
use pricer_core::TRADING_DAYS_PER_YEAR;

/// Distribution family of the standardised innovations `z_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InnovationFamily {
    /// Standard normal innovations
    #[default]
    Normal,
    /// Heavy-tailed Student-t innovations
    StudentT,
}

/// Fitted GARCH(1,1) coefficients for one asset.
///
/// Stationarity (`α + β < 1`) is assumed by the fit but not enforced, so a
/// degenerate model with every coefficient at zero is accepted and freezes
/// the price path.
///
/// # Example
///
/// ```
/// use pricer_models::models::garch::GarchParams;
///
/// let params = GarchParams::new(2e-6, 0.08, 0.90, 0.0004, 1e-4).unwrap();
///
/// // One step of the variance recursion
/// let h = params.next_variance(4e-4, 1e-4);
/// assert!((h - (2e-6 + 0.08 * 4e-4 + 0.90 * 1e-4)).abs() < 1e-18);
///
/// assert!(params.is_stationary());
/// assert!((params.unconditional_variance().unwrap() - 1e-4).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GarchParams {
    /// Variance intercept ω
    pub omega: f64,
    /// ARCH coefficient α
    pub alpha: f64,
    /// GARCH coefficient β
    pub beta: f64,
    /// Long-run mean daily return μ (informational; the drift is risk-neutral)
    #[cfg_attr(feature = "serde", serde(default))]
    pub mu: f64,
    /// Initial conditional variance σ₀²
    pub initial_variance: f64,
    /// Student-t degrees of freedom, if the fit produced one
    #[cfg_attr(feature = "serde", serde(default))]
    pub nu: Option<f64>,
    /// Innovation family tag
    #[cfg_attr(feature = "serde", serde(default))]
    pub family: InnovationFamily,
}

impl GarchParams {
    /// Create Gaussian GARCH parameters.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidGarch` if any coefficient is negative or non-finite.
    pub fn new(
        omega: f64,
        alpha: f64,
        beta: f64,
        mu: f64,
        initial_variance: f64,
    ) -> Result<Self, ModelError> {
        let params = Self {
            omega,
            alpha,
            beta,
            mu,
            initial_variance,
            nu: None,
            family: InnovationFamily::Normal,
        };
        params.validate()?;
        Ok(params)
    }

    /// Tag the model as heavy-tailed with `nu` degrees of freedom.
    ///
    /// A non-finite `nu` leaves the model Gaussian.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidGarch` if `nu` is finite but not above 2, where the
    /// Student-t variance does not exist.
    pub fn with_student_t(mut self, nu: f64) -> Result<Self, ModelError> {
        if !nu.is_finite() {
            self.nu = None;
            self.family = InnovationFamily::Normal;
            return Ok(self);
        }
        self.nu = Some(nu);
        self.family = InnovationFamily::StudentT;
        self.validate()?;
        Ok(self)
    }

    /// Check coefficient invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        let coefficients = [
            ("omega", self.omega),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("initial_variance", self.initial_variance),
        ];
        for (name, value) in coefficients {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ModelError::InvalidGarch {
                    reason: format!("{} must be finite and non-negative, got {}", name, value),
                });
            }
        }
        if !self.mu.is_finite() {
            return Err(ModelError::InvalidGarch {
                reason: format!("mu must be finite, got {}", self.mu),
            });
        }
        if let Some(nu) = self.nu {
            if nu.is_finite() && nu <= 2.0 {
                return Err(ModelError::InvalidGarch {
                    reason: format!("nu must exceed 2, got {}", nu),
                });
            }
        }
        Ok(())
    }

    /// One step of the variance recursion.
    #[inline]
    pub fn next_variance(&self, prev_shock_sq: f64, prev_variance: f64) -> f64 {
        self.omega + self.alpha * prev_shock_sq + self.beta * prev_variance
    }

    /// Persistence `α + β`.
    #[inline]
    pub fn persistence(&self) -> f64 {
        self.alpha + self.beta
    }

    /// Whether `α + β < 1`.
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.persistence() < 1.0
    }

    /// Long-run variance `ω / (1 − α − β)`; `None` for a non-stationary fit.
    pub fn unconditional_variance(&self) -> Option<f64> {
        if self.is_stationary() {
            Some(self.omega / (1.0 - self.persistence()))
        } else {
            None
        }
    }

    /// Annualised long-run volatility, falling back to the initial variance
    /// when the fit is not stationary.
    pub fn annualised_volatility(&self) -> f64 {
        let daily = self
            .unconditional_variance()
            .unwrap_or(self.initial_variance);
        (daily * TRADING_DAYS_PER_YEAR).sqrt()
    }

    /// Heavy-tail degrees of freedom, when tagged Student-t with a usable ν.
    pub fn tail_nu(&self) -> Option<f64> {
        match (self.family, self.nu) {
            (InnovationFamily::StudentT, Some(nu)) if nu.is_finite() && nu > 2.0 => Some(nu),
            _ => None,
        }
    }

    /// Scale volatility by `factor`: ω and σ₀² are multiplied by `factor²`.
    ///
    /// The persistence is unchanged, so the whole variance path scales by
    /// `factor²` for a given shock sequence.
    pub fn scale_volatility(&self, factor: f64) -> Self {
        let k2 = factor * factor;
        Self {
            omega: self.omega * k2,
            initial_variance: self.initial_variance * k2,
            ..*self
        }
    }
}
