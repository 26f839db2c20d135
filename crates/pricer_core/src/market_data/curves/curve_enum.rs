//! Static dispatch over the concrete yield curves.

use super::{FlatCurve, InterpolatedCurve, NelsonSiegelSvensson, YieldCurve};
use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Static dispatch enum wrapping concrete yield curve implementations.
///
/// Deal terms hold the domestic and foreign curves as `CurveEnum`, so the
/// simulator stays monomorphic while accepting any curve family.
///
/// # Variants
///
/// - `Flat`: Constant rate yield curve
/// - `Interpolated`: Maturity/rate table
/// - `Nss`: Nelson-Siegel-Svensson parametric curve
/// - `Shifted`: Another curve with a parallel shift added to every zero rate
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
///
/// let curve = CurveEnum::flat(0.05_f64);
/// let bumped = curve.clone().parallel_shift(0.0001);
///
/// assert!((bumped.zero_rate(1.0).unwrap() - 0.0501).abs() < 1e-12);
/// assert_eq!(bumped.discount_factor(0.0).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveEnum<T: Float> {
    /// Flat (constant rate) yield curve
    Flat(FlatCurve<T>),
    /// Interpolated yield curve with pillar points
    Interpolated(InterpolatedCurve<T>),
    /// Nelson-Siegel-Svensson curve
    Nss(NelsonSiegelSvensson<T>),
    /// Parallel-shifted curve
    Shifted {
        /// Curve being shifted
        base: Box<CurveEnum<T>>,
        /// Additive shift applied to every zero rate
        shift: T,
    },
}

impl<T: Float> CurveEnum<T> {
    /// Create a flat curve variant.
    #[inline]
    pub fn flat(rate: T) -> Self {
        CurveEnum::Flat(FlatCurve::new(rate))
    }

    /// Wrap this curve with an additive parallel shift.
    ///
    /// Shifting an already-shifted curve folds the two shifts together.
    pub fn parallel_shift(self, shift: T) -> Self {
        match self {
            CurveEnum::Shifted { base, shift: s } => CurveEnum::Shifted {
                base,
                shift: s + shift,
            },
            other => CurveEnum::Shifted {
                base: Box::new(other),
                shift,
            },
        }
    }

    /// Return the variant name, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            CurveEnum::Flat(_) => "flat",
            CurveEnum::Interpolated(_) => "interpolated",
            CurveEnum::Nss(_) => "nss",
            CurveEnum::Shifted { .. } => "shifted",
        }
    }
}

impl<T: Float> From<FlatCurve<T>> for CurveEnum<T> {
    fn from(curve: FlatCurve<T>) -> Self {
        CurveEnum::Flat(curve)
    }
}

impl<T: Float> From<InterpolatedCurve<T>> for CurveEnum<T> {
    fn from(curve: InterpolatedCurve<T>) -> Self {
        CurveEnum::Interpolated(curve)
    }
}

impl<T: Float> From<NelsonSiegelSvensson<T>> for CurveEnum<T> {
    fn from(curve: NelsonSiegelSvensson<T>) -> Self {
        CurveEnum::Nss(curve)
    }
}

impl<T: Float> YieldCurve<T> for CurveEnum<T> {
    #[inline]
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        match self {
            CurveEnum::Flat(curve) => curve.zero_rate(t),
            CurveEnum::Interpolated(curve) => curve.zero_rate(t),
            CurveEnum::Nss(curve) => curve.zero_rate(t),
            CurveEnum::Shifted { base, shift } => Ok(base.zero_rate(t)? + *shift),
        }
    }
}
