//! Correlation matrices and their Cholesky factors.
//!
//! Given `n` independent unit-variance draws `Z = [Z1, Z2, ..., Zn]`,
//! correlated shocks are generated with
//!
//! ```text
//! ε = L · Z,   R = L · Lᵀ
//! ```
//!
//! where `L` is the lower triangular Cholesky factor of the correlation
//! matrix `R`.
//!
//! ## Usage
//!
//! ```
//! use pricer_models::models::correlation::CorrelationMatrix;
//!
//! let corr = CorrelationMatrix::new(&[
//!     1.0_f64, 0.5,
//!     0.5, 1.0,
//! ], 2).unwrap();
//!
//! let cholesky = corr.cholesky().unwrap();
//!
//! let z = [0.5_f64, 0.8];
//! let w = cholesky.transform(&z);
//! assert_eq!(w.len(), 2);
//! assert_eq!(w[0], 0.5);
//! ```

use num_traits::Float;
use thiserror::Error;

/// Error types for correlation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    /// Matrix is not positive definite
    #[error("Correlation matrix is not positive definite")]
    NotPositiveDefinite,

    /// Matrix dimensions are invalid
    #[error("Invalid matrix dimensions: expected {expected} elements, got {got}")]
    InvalidDimensions {
        /// Expected element count
        expected: usize,
        /// Actual element count
        got: usize,
    },

    /// Diagonal element is not 1.0
    #[error("Diagonal element at index {index} is {value}, expected 1.0")]
    InvalidDiagonal {
        /// Diagonal index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Matrix is not symmetric
    #[error("Matrix is not symmetric at ({i}, {j})")]
    NotSymmetric {
        /// Row
        i: usize,
        /// Column
        j: usize,
    },

    /// Correlation value out of range [-1, 1]
    #[error("Correlation at ({i}, {j}) is {value}, must be in [-1, 1]")]
    OutOfRange {
        /// Row
        i: usize,
        /// Column
        j: usize,
        /// Offending value
        value: f64,
    },
}

/// Correlation matrix with validation and Cholesky decomposition.
///
/// A correlation matrix must satisfy:
/// - Square and symmetric
/// - Diagonal elements equal to 1.0
/// - Off-diagonal elements in [-1, 1]
/// - Positive semi-definite (for Cholesky: positive definite)
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix<T: Float> {
    /// Matrix elements in row-major order
    data: Vec<T>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl<T: Float> CorrelationMatrix<T> {
    /// Create a new correlation matrix from flat array (row-major).
    ///
    /// # Arguments
    ///
    /// * `data` - Matrix elements in row-major order (n*n elements)
    /// * `dim` - Matrix dimension (n)
    ///
    /// # Validation
    ///
    /// - Must have exactly dim*dim elements
    /// - Diagonal elements must be 1.0
    /// - Must be symmetric
    /// - Off-diagonal elements must be in [-1, 1]
    ///
    /// Positive definiteness is not checked here; [`cholesky`](Self::cholesky)
    /// reports it.
    pub fn new(data: &[T], dim: usize) -> Result<Self, CorrelationError> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(CorrelationError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        let one = T::one();
        let neg_one = -T::one();
        let epsilon = T::from(1e-10).unwrap_or(T::zero());

        for i in 0..dim {
            let diag = data[i * dim + i];
            if !((diag - one).abs() <= epsilon) {
                return Err(CorrelationError::InvalidDiagonal {
                    index: i,
                    value: diag.to_f64().unwrap_or(f64::NAN),
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let val_ij = data[i * dim + j];
                let val_ji = data[j * dim + i];

                if !((val_ij - val_ji).abs() <= epsilon) {
                    return Err(CorrelationError::NotSymmetric { i, j });
                }

                if val_ij < neg_one || val_ij > one {
                    return Err(CorrelationError::OutOfRange {
                        i,
                        j,
                        value: val_ij.to_f64().unwrap_or(0.0),
                    });
                }
            }
        }

        Ok(Self {
            data: data.to_vec(),
            dim,
        })
    }

    /// Create a correlation matrix from nested rows.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self, CorrelationError> {
        let dim = rows.len();
        let data: Vec<T> = rows.iter().flatten().copied().collect();
        Self::new(&data, dim)
    }

    /// Rescale a symmetric quasi-correlation matrix `Q` to `R = D Q D` with
    /// `D = diag(1/√diag(Q))`.
    ///
    /// The result has an exact unit diagonal. Symmetry and range are inherited
    /// from `Q` and not re-validated, so this is the hot-path constructor for
    /// recursively updated matrices.
    ///
    /// # Errors
    ///
    /// * `CorrelationError::InvalidDimensions` - `q.len() != dim * dim`
    /// * `CorrelationError::NotPositiveDefinite` - A non-positive diagonal entry
    pub fn from_quasi_correlation(q: &[T], dim: usize) -> Result<Self, CorrelationError> {
        let mut data = q.to_vec();
        Self::normalise_into(q, dim, &mut data)?;
        Ok(Self { data, dim })
    }

    /// Overwrite `self` with the rescaled `q`, reusing the allocation.
    pub fn assign_from_quasi_correlation(&mut self, q: &[T]) -> Result<(), CorrelationError> {
        Self::normalise_into(q, self.dim, &mut self.data)
    }

    fn normalise_into(q: &[T], dim: usize, out: &mut Vec<T>) -> Result<(), CorrelationError> {
        if q.len() != dim * dim {
            return Err(CorrelationError::InvalidDimensions {
                expected: dim * dim,
                got: q.len(),
            });
        }
        out.resize(dim * dim, T::zero());
        for i in 0..dim {
            let d = q[i * dim + i];
            if !(d > T::zero()) {
                return Err(CorrelationError::NotPositiveDefinite);
            }
        }
        for i in 0..dim {
            let si = q[i * dim + i].sqrt();
            for j in 0..dim {
                out[i * dim + j] = if i == j {
                    T::one()
                } else {
                    q[i * dim + j] / (si * q[j * dim + j].sqrt())
                };
            }
        }
        Ok(())
    }

    /// Create an identity correlation matrix (no correlation).
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    pub fn get(&self, i: usize, j: usize) -> T {
        self.data[i * self.dim + j]
    }

    /// Matrix elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Compute Cholesky decomposition (lower triangular L where C = L * L^T).
    ///
    /// # Returns
    ///
    /// `Ok(CholeskyFactor)` if decomposition succeeds (matrix is positive definite),
    /// `Err(CorrelationError::NotPositiveDefinite)` otherwise.
    pub fn cholesky(&self) -> Result<CholeskyFactor<T>, CorrelationError> {
        let mut factor = CholeskyFactor {
            data: vec![T::zero(); self.dim * self.dim],
            dim: self.dim,
        };
        self.cholesky_into(&mut factor)?;
        Ok(factor)
    }

    /// Cholesky decomposition into an existing factor of the same dimension.
    ///
    /// On failure the contents of `factor` are unspecified.
    pub fn cholesky_into(&self, factor: &mut CholeskyFactor<T>) -> Result<(), CorrelationError> {
        let n = self.dim;
        factor.dim = n;
        factor.data.clear();
        factor.data.resize(n * n, T::zero());
        let lower = &mut factor.data;

        for i in 0..n {
            for j in 0..=i {
                let mut sum = T::zero();

                if j == i {
                    for k in 0..j {
                        let l_jk = lower[j * n + k];
                        sum = sum + l_jk * l_jk;
                    }
                    let diag = self.get(j, j) - sum;
                    // Also rejects NaN
                    if !(diag > T::zero()) {
                        return Err(CorrelationError::NotPositiveDefinite);
                    }
                    lower[j * n + j] = diag.sqrt();
                } else {
                    for k in 0..j {
                        sum = sum + lower[i * n + k] * lower[j * n + k];
                    }
                    let l_jj = lower[j * n + j];
                    lower[i * n + j] = (self.get(i, j) - sum) / l_jj;
                }
            }
        }

        Ok(())
    }
}

/// Lower triangular Cholesky factor of a correlation matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor<T: Float> {
    /// Lower triangular matrix elements (row-major)
    data: Vec<T>,
    /// Matrix dimension
    dim: usize,
}

impl<T: Float> CholeskyFactor<T> {
    /// Identity factor, the decomposition of an uncorrelated matrix.
    pub fn identity(dim: usize) -> Self {
        let mut data = vec![T::zero(); dim * dim];
        for i in 0..dim {
            data[i * dim + i] = T::one();
        }
        Self { data, dim }
    }

    /// Get matrix dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get element at (i, j).
    ///
    /// Returns zero for upper triangular elements (j > i).
    pub fn get(&self, i: usize, j: usize) -> T {
        if j > i {
            T::zero()
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Transform independent draws to correlated draws, `W = L · Z`.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[T]) -> Vec<T> {
        let mut w = vec![T::zero(); self.dim];
        self.transform_into(z, &mut w);
        w
    }

    /// Transform independent draws into a caller-provided buffer.
    ///
    /// # Panics
    ///
    /// Panics if `z` or `out` is shorter than `self.dim()`.
    pub fn transform_into(&self, z: &[T], out: &mut [T]) {
        assert!(
            z.len() >= self.dim && out.len() >= self.dim,
            "Buffer length is less than matrix dimension {}",
            self.dim
        );

        let n = self.dim;
        for i in 0..n {
            let mut sum = T::zero();
            for j in 0..=i {
                sum = sum + self.data[i * n + j] * z[j];
            }
            out[i] = sum;
        }
    }
}
