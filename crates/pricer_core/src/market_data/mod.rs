//! Market data structures for the autocall pricer.
//!
//! This module provides yield curve abstractions for discount factor and
//! zero rate calculations, plus the FX parity relations that link the
//! domestic (BRL) and foreign (USD) curves.
//!
//! # Architecture
//!
//! Curves are generic over `T: Float`; the simulation layer instantiates
//! them with `f64`.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and implementations
//! - [`fx`]: Covered interest parity and spot estimation
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
//!
//! let curve = FlatCurve::new(0.05_f64);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//! ```

pub mod curves;
pub mod error;
pub mod fx;

// Re-export commonly used types
pub use curves::{
    CurveEnum, CurveInterpolation, FlatCurve, InterpolatedCurve, NelsonSiegelSvensson, YieldCurve,
};
pub use error::MarketDataError;
pub use fx::{forward_rate, SpotEstimator};
