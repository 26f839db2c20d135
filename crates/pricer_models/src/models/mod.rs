//! Stochastic model parameters for the DCC-GARCH simulator.
//!
//! - [`garch`]: Per-asset GARCH(1,1) coefficients
//! - [`correlation`]: Correlation matrices and Cholesky factors
//! - [`dcc`]: Dynamic conditional correlation recursion
//! - [`tail`]: Student-t degrees-of-freedom selection
//! - [`dcc_garch`]: The joint model handed to the simulator

pub mod correlation;
pub mod dcc;
pub mod dcc_garch;
pub mod garch;
pub mod tail;

pub use correlation::{CholeskyFactor, CorrelationError, CorrelationMatrix};
pub use dcc::{DccParams, DccState};
pub use dcc_garch::{DccGarchModel, Innovations};
pub use garch::{GarchParams, InnovationFamily};
pub use tail::{select_degrees_of_freedom, TailSelection, TailSource};
