//! Joint DCC-GARCH model consumed by the path simulator.

use super::correlation::CorrelationMatrix;
use super::dcc::DccParams;
use super::garch::GarchParams;
use super::tail::{select_degrees_of_freedom, TailSelection, TailSource};
use crate::error::ModelError;

/// Distribution of the independent draws fed through the Cholesky factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Innovations {
    /// Standard normal draws
    Gaussian,
    /// Student-t draws rescaled to unit variance
    StudentT {
        /// Degrees of freedom (> 2)
        nu: f64,
    },
}

impl Innovations {
    /// Degrees of freedom, if heavy-tailed.
    pub fn nu(&self) -> Option<f64> {
        match self {
            Innovations::Gaussian => None,
            Innovations::StudentT { nu } => Some(*nu),
        }
    }
}

/// Per-asset GARCH fits plus the DCC overlay and innovation law.
///
/// # Example
///
/// ```
/// use pricer_models::models::correlation::CorrelationMatrix;
/// use pricer_models::models::dcc::DccParams;
/// use pricer_models::models::dcc_garch::{DccGarchModel, Innovations};
/// use pricer_models::models::garch::GarchParams;
///
/// let garch = vec![GarchParams::new(2e-6, 0.08, 0.9, 0.0, 1e-4).unwrap(); 2];
/// let dcc = DccParams::new(0.03, 0.95, CorrelationMatrix::identity(2)).unwrap();
///
/// let model = DccGarchModel::new(garch, dcc, None).unwrap();
/// assert_eq!(model.dim(), 2);
/// // No heavy-tailed fit and no residuals: default ν
/// assert_eq!(model.innovations(), Innovations::StudentT { nu: 8.0 });
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DccGarchModel {
    garch: Vec<GarchParams>,
    dcc: DccParams,
    innovations: Innovations,
    tail_source: Option<TailSource>,
}

impl DccGarchModel {
    /// Bundle the fits, selecting ν by the tail-selection priority.
    ///
    /// # Errors
    ///
    /// * `ModelError::DimensionMismatch` - GARCH count differs from the DCC dimension
    /// * `ModelError::InvalidGarch` - A GARCH fit fails validation
    pub fn new(
        garch: Vec<GarchParams>,
        dcc: DccParams,
        residuals: Option<&[f64]>,
    ) -> Result<Self, ModelError> {
        Self::check(&garch, &dcc)?;
        let TailSelection { nu, source } = select_degrees_of_freedom(&garch, residuals);
        Ok(Self {
            garch,
            dcc,
            innovations: Innovations::StudentT { nu },
            tail_source: Some(source),
        })
    }

    /// Bundle the fits with standard normal innovations.
    pub fn gaussian(garch: Vec<GarchParams>, dcc: DccParams) -> Result<Self, ModelError> {
        Self::check(&garch, &dcc)?;
        Ok(Self {
            garch,
            dcc,
            innovations: Innovations::Gaussian,
            tail_source: None,
        })
    }

    /// Independent assets with constant identity correlation.
    pub fn uncorrelated(garch: Vec<GarchParams>) -> Result<Self, ModelError> {
        let dim = garch.len();
        Self::gaussian(garch, DccParams::constant(CorrelationMatrix::identity(dim)))
    }

    fn check(garch: &[GarchParams], dcc: &DccParams) -> Result<(), ModelError> {
        if garch.is_empty() {
            return Err(ModelError::DimensionMismatch {
                what: "garch",
                expected: dcc.dim().max(1),
                got: 0,
            });
        }
        if garch.len() != dcc.dim() {
            return Err(ModelError::DimensionMismatch {
                what: "garch",
                expected: dcc.dim(),
                got: garch.len(),
            });
        }
        garch.iter().try_for_each(GarchParams::validate)
    }

    /// Override the innovation law.
    ///
    /// A Student-t law with `nu <= 2` or a non-finite `nu` degrades to Gaussian.
    pub fn with_innovations(mut self, innovations: Innovations) -> Self {
        self.innovations = match innovations {
            Innovations::StudentT { nu } if !(nu.is_finite() && nu > 2.0) => Innovations::Gaussian,
            other => other,
        };
        self
    }

    /// Number of assets.
    pub fn dim(&self) -> usize {
        self.garch.len()
    }

    /// Per-asset GARCH parameters, index-aligned with the underlyings.
    pub fn garch(&self) -> &[GarchParams] {
        &self.garch
    }

    /// DCC parameters.
    pub fn dcc(&self) -> &DccParams {
        &self.dcc
    }

    /// Innovation law.
    pub fn innovations(&self) -> Innovations {
        self.innovations
    }

    /// Provenance of ν, when selected automatically.
    pub fn tail_source(&self) -> Option<TailSource> {
        self.tail_source
    }

    /// Copy with every asset's volatility scaled by `factor`.
    pub fn scale_volatility(&self, factor: f64) -> Self {
        Self {
            garch: self
                .garch
                .iter()
                .map(|g| g.scale_volatility(factor))
                .collect(),
            ..self.clone()
        }
    }
}
