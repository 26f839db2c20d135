//! Curve abstractions for interest rate discounting.
//!
//! This module provides:
//! - [`YieldCurve`]: Generic trait for zero rate and discount factor calculations
//! - [`FlatCurve`]: Constant rate yield curve (the fallback flat rate)
//! - [`InterpolatedCurve`]: Maturity/rate table with edge extrapolation (USD curve)
//! - [`NelsonSiegelSvensson`]: Six-parameter parametric curve (BRL curve)
//! - [`CurveEnum`]: Static dispatch enum wrapping the concrete curves

mod curve_enum;
mod flat;
mod interpolated;
mod nss;
mod traits;

pub use curve_enum::CurveEnum;
pub use flat::FlatCurve;
pub use interpolated::{CurveInterpolation, InterpolatedCurve};
pub use nss::NelsonSiegelSvensson;
pub use traits::YieldCurve;
