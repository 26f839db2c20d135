//! # Pricer Models (L2: Business Logic)
//!
//! Model parameters and deal terms for the four-asset autocall note.
//!
//! This crate provides:
//! - Underlying asset specifications ([`underlying`])
//! - Per-asset GARCH(1,1) fits, the DCC correlation overlay and Student-t
//!   tail selection ([`models`])
//! - Autocall deal terms with a validating builder ([`instruments`])
//!
//! ## Design Principles
//!
//! - **Plain parameter records**: fitted coefficients arrive from an external
//!   calibration and are held as immutable values; nothing here fits models
//! - **Fail at construction**: every record validates when built, so the
//!   simulator never re-checks its inputs
//! - **Builder pattern** for deal terms with sensible defaults
//!
//! ## Example
//!
//! ```
//! use pricer_models::models::{CorrelationMatrix, DccGarchModel, DccParams, GarchParams};
//!
//! let garch = vec![
//!     GarchParams::new(2e-6, 0.08, 0.90, 0.0, 1e-4).unwrap().with_student_t(6.0).unwrap();
//!     4
//! ];
//! let dcc = DccParams::new(0.02, 0.95, CorrelationMatrix::identity(4)).unwrap();
//! let model = DccGarchModel::new(garch, dcc, None).unwrap();
//!
//! assert_eq!(model.innovations().nu(), Some(6.0));
//! ```

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod instruments;
pub mod models;
pub mod underlying;

pub use error::ModelError;
