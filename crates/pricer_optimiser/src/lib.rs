//! # pricer_optimiser
//!
//! Fair-coupon search for the autocall note.
//!
//! This crate sits on top of the Monte Carlo engine (L3), solving the
//! inverse problem "which coupon prices the note at par".
//!
//! ## Modules
//!
//! - [`differential_evolution`]: Bounded DE/rand/1/bin with an evaluation budget
//! - [`fair_coupon`]: Two-tier (exploration/validation) fair-coupon solver
//!
//! ## Example
//!
//! ```rust
//! use pricer_optimiser::fair_coupon::{FairCouponSettings, FairCouponSolver};
//! use pricer_pricing::presim::{PreSimulatedEnsemble, PreSimulatedPath};
//!
//! let path = |period: usize| PreSimulatedPath {
//!     exercise_period: period,
//!     exercise_day: period * 126,
//!     pv_discount_factor: 0.92,
//!     coupon_periods: (1..=if period == 0 { 2 } else { period }).collect(),
//! };
//! let exploration = PreSimulatedEnsemble::new(vec![path(1), path(0)], 2, 1000.0, 1);
//! let validation = PreSimulatedEnsemble::new(vec![path(1), path(0), path(1), path(0)], 2, 1000.0, 2);
//!
//! let solver = FairCouponSolver::new(FairCouponSettings::default()).unwrap();
//! let result = solver.solve_presimulated(&exploration, &validation, 1000.0).unwrap();
//! assert!(result.converged);
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod differential_evolution;
pub mod fair_coupon;

mod error;

pub use error::SolverError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::differential_evolution::*;
    pub use crate::fair_coupon::*;
    pub use crate::SolverError;
}
