//! # pricer_core: Market Data Foundation for the Autocall Pricer
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core is the bottom layer of the workspace, providing:
//! - Yield curves: `FlatCurve`, `InterpolatedCurve`, `NelsonSiegelSvensson`
//!   and the static-dispatch `CurveEnum` (`market_data::curves`)
//! - Covered interest parity and a heuristic BRL/USD spot estimator
//!   (`market_data::fx`)
//! - Sample statistics used by the risk layer (`math::stats`)
//! - Error types: `MarketDataError` (`market_data::error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
//! use pricer_core::market_data::fx::forward_rate;
//!
//! let usd = FlatCurve::new(0.05_f64);
//! let brl = FlatCurve::new(0.10_f64);
//!
//! let tau = 0.5;
//! let fwd = forward_rate(
//!     5.0,
//!     brl.zero_rate(tau).unwrap(),
//!     usd.zero_rate(tau).unwrap(),
//!     tau,
//! );
//! assert!((fwd - 5.0 * (0.05_f64 * 0.5).exp()).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for curve and estimator parameter records

#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;

/// Trading days per year used to convert day counts into year fractions.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
