//! Sample statistics over Monte Carlo outputs.
//!
//! All functions return `None` on empty input rather than `NaN`, so callers
//! decide how an empty sample is reported.

/// Arithmetic mean.
///
/// # Example
///
/// ```
/// use pricer_core::math::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation with Bessel's correction.
///
/// A single observation has zero dispersion.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    let n = values.len();
    if n < 2 {
        return Some(0.0);
    }
    let ss: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((ss / (n - 1) as f64).sqrt())
}

/// Standard error of the mean, `s / sqrt(n)`.
pub fn standard_error(values: &[f64]) -> Option<f64> {
    let s = sample_std(values)?;
    Some(s / (values.len() as f64).sqrt())
}

/// Empirical quantile with linear interpolation between order statistics
/// (Hyndman-Fan type 7).
///
/// ```text
/// h = (n − 1) · p
/// Q(p) = x[⌊h⌋] + (h − ⌊h⌋) · (x[⌊h⌋ + 1] − x[⌊h⌋])
/// ```
///
/// `p` is clamped to `[0, 1]`.
///
/// # Example
///
/// ```
/// use pricer_core::math::stats::quantile;
///
/// let q = quantile(&[4.0, 1.0, 3.0, 2.0], 0.5).unwrap();
/// assert!((q - 2.5).abs() < 1e-12);
/// ```
pub fn quantile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(sorted_quantile(&sorted, p))
}

fn sorted_quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let h = (n - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(n - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Mean of the observations at or below the `p`-quantile.
///
/// With `p = 1 − c` applied to a margin sample this is the expected margin in
/// the worst `1 − c` fraction of outcomes.
pub fn tail_mean(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let cutoff = sorted_quantile(&sorted, p);
    let tail: Vec<f64> = sorted.iter().copied().take_while(|&v| v <= cutoff).collect();
    // The minimum always satisfies v <= Q(p), so the tail is never empty
    mean(&tail)
}
