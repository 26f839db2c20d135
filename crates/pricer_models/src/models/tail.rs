//! Degrees-of-freedom selection for Student-t innovations.
//!
//! Priority:
//! 1. Mean ν across the heavy-tailed GARCH fits.
//! 2. Moment estimate from pooled standardised residuals,
//!    `ν = 2·E[z²] / (E[z²] − 1)`, clamped to `[3, 30]`.
//! 3. [`DEFAULT_NU`].

use super::garch::GarchParams;
use tracing::{debug, warn};

/// Fallback degrees of freedom.
pub const DEFAULT_NU: f64 = 8.0;

/// Lower clamp for the moment estimate.
pub const MIN_NU: f64 = 3.0;

/// Upper clamp for the moment estimate.
pub const MAX_NU: f64 = 30.0;

/// Finite residuals required before the moment estimate is trusted.
pub const MIN_RESIDUALS: usize = 30;

/// Where the selected ν came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TailSource {
    /// Mean of the heavy-tailed per-asset fits
    FittedModels,
    /// Moment estimate from standardised residuals
    Residuals,
    /// Hardcoded default
    Default,
}

/// Selected degrees of freedom and its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailSelection {
    /// Degrees of freedom
    pub nu: f64,
    /// Provenance
    pub source: TailSource,
}

/// Moment estimator from standardised residuals.
///
/// Non-finite residuals are dropped. Returns `None` with fewer than
/// [`MIN_RESIDUALS`] clean values or a second moment not above 1.
///
/// # Example
///
/// ```
/// use pricer_models::models::tail::estimate_nu_from_residuals;
///
/// // E[z²] = 1.5 -> ν = 3 / 0.5 = 6
/// let z: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 1.5_f64.sqrt() } else { -1.5_f64.sqrt() }).collect();
/// let nu = estimate_nu_from_residuals(&z).unwrap();
/// assert!((nu - 6.0).abs() < 1e-9);
///
/// assert!(estimate_nu_from_residuals(&z[..10]).is_none());
/// ```
pub fn estimate_nu_from_residuals(residuals: &[f64]) -> Option<f64> {
    let clean: Vec<f64> = residuals.iter().copied().filter(|z| z.is_finite()).collect();
    if clean.len() < MIN_RESIDUALS {
        return None;
    }
    let second_moment = clean.iter().map(|z| z * z).sum::<f64>() / clean.len() as f64;
    if second_moment <= 1.0 {
        return None;
    }
    let nu = 2.0 * second_moment / (second_moment - 1.0);
    Some(nu.clamp(MIN_NU, MAX_NU))
}

/// Select ν for the joint innovation draw.
///
/// # Arguments
///
/// * `models` - Per-asset GARCH fits
/// * `residuals` - Pooled standardised residuals from the fit, if available
pub fn select_degrees_of_freedom(models: &[GarchParams], residuals: Option<&[f64]>) -> TailSelection {
    let fitted: Vec<f64> = models.iter().filter_map(GarchParams::tail_nu).collect();
    if !fitted.is_empty() {
        let nu = fitted.iter().sum::<f64>() / fitted.len() as f64;
        debug!(nu, models = fitted.len(), "degrees of freedom from heavy-tailed fits");
        return TailSelection {
            nu,
            source: TailSource::FittedModels,
        };
    }

    if let Some(residuals) = residuals {
        if let Some(nu) = estimate_nu_from_residuals(residuals) {
            debug!(nu, residuals = residuals.len(), "degrees of freedom from residual moments");
            return TailSelection {
                nu,
                source: TailSource::Residuals,
            };
        }
        warn!(
            residuals = residuals.len(),
            default = DEFAULT_NU,
            "insufficient residual data for tail estimate, using default degrees of freedom"
        );
    }

    TailSelection {
        nu: DEFAULT_NU,
        source: TailSource::Default,
    }
}
