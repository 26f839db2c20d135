//! Dynamic Conditional Correlation (DCC) recursion.
//!
//! The quasi-correlation matrix evolves as
//!
//! ```text
//! Q_t = (1 − a − b) · Q̄ + a · z_{t−1} z_{t−1}ᵀ + b · Q_{t−1}
//! R_t = D_t Q_t D_t,   D_t = diag(1/√diag(Q_t))
//! ```
//!
//! where `z` are the previous step's standardised shocks. `Q` restarts from
//! the long-run target `Q̄` on every Monte Carlo path.

use super::correlation::{CorrelationError, CorrelationMatrix};
use crate::error::ModelError;

/// Fitted DCC persistence pair and long-run correlation target.
///
/// # Example
///
/// ```
/// use pricer_models::models::correlation::CorrelationMatrix;
/// use pricer_models::models::dcc::{DccParams, DccState};
///
/// let target = CorrelationMatrix::new(&[1.0, 0.4, 0.4, 1.0], 2).unwrap();
/// let params = DccParams::new(0.05, 0.90, target).unwrap();
///
/// let mut state = DccState::new(&params);
/// state.update(&params, &[1.0, 1.0]);
///
/// // (1 − a − b)·0.4 + a·1 + b·0.4
/// let q01 = 0.05 * 0.4 + 0.05 * 1.0 + 0.90 * 0.4;
/// assert!((state.quasi_correlation()[1] - q01).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DccParams {
    a: f64,
    b: f64,
    long_run: CorrelationMatrix<f64>,
}

impl DccParams {
    /// Create validated DCC parameters.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidDcc` unless `a ≥ 0`, `b ≥ 0` and `a + b < 1`.
    pub fn new(a: f64, b: f64, long_run: CorrelationMatrix<f64>) -> Result<Self, ModelError> {
        if !(a.is_finite() && a >= 0.0) || !(b.is_finite() && b >= 0.0) {
            return Err(ModelError::InvalidDcc {
                reason: format!("a and b must be non-negative, got a = {}, b = {}", a, b),
            });
        }
        if a + b >= 1.0 {
            return Err(ModelError::InvalidDcc {
                reason: format!("a + b must be below 1, got {}", a + b),
            });
        }
        Ok(Self { a, b, long_run })
    }

    /// Constant correlation: `a = b = 0`, so `Q_t = Q̄` at every step.
    pub fn constant(long_run: CorrelationMatrix<f64>) -> Self {
        Self {
            a: 0.0,
            b: 0.0,
            long_run,
        }
    }

    /// News coefficient `a`.
    pub fn a(&self) -> f64 {
        self.a
    }

    /// Decay coefficient `b`.
    pub fn b(&self) -> f64 {
        self.b
    }

    /// Long-run correlation target `Q̄`.
    pub fn long_run(&self) -> &CorrelationMatrix<f64> {
        &self.long_run
    }

    /// Number of assets.
    pub fn dim(&self) -> usize {
        self.long_run.dim()
    }
}

/// Path-local DCC state.
#[derive(Debug, Clone)]
pub struct DccState {
    q: Vec<f64>,
    dim: usize,
}

impl DccState {
    /// Fresh state at the long-run target.
    pub fn new(params: &DccParams) -> Self {
        Self {
            q: params.long_run.as_slice().to_vec(),
            dim: params.dim(),
        }
    }

    /// Restart from the long-run target.
    pub fn reset(&mut self, params: &DccParams) {
        self.q.copy_from_slice(params.long_run.as_slice());
    }

    /// Advance `Q` one step with the previous standardised shocks.
    ///
    /// # Panics
    ///
    /// Panics if `z_prev.len()` differs from the state dimension.
    pub fn update(&mut self, params: &DccParams, z_prev: &[f64]) {
        assert_eq!(z_prev.len(), self.dim, "shock vector dimension mismatch");
        let n = self.dim;
        let w = 1.0 - params.a - params.b;
        let target = params.long_run.as_slice();
        for i in 0..n {
            for j in 0..n {
                let k = i * n + j;
                self.q[k] = w * target[k] + params.a * z_prev[i] * z_prev[j] + params.b * self.q[k];
            }
        }
    }

    /// Current quasi-correlation matrix `Q_t` (row-major).
    pub fn quasi_correlation(&self) -> &[f64] {
        &self.q
    }

    /// Rescaled correlation `R_t` written into `out`.
    ///
    /// # Errors
    ///
    /// `CorrelationError::NotPositiveDefinite` if a diagonal entry of `Q_t` is
    /// not positive.
    pub fn correlation_into(&self, out: &mut CorrelationMatrix<f64>) -> Result<(), CorrelationError> {
        out.assign_from_quasi_correlation(&self.q)
    }

    /// Rescaled correlation `R_t`.
    pub fn correlation(&self) -> Result<CorrelationMatrix<f64>, CorrelationError> {
        CorrelationMatrix::from_quasi_correlation(&self.q, self.dim)
    }
}
