//! Underlying asset specification.

use crate::error::ModelError;

/// One underlying stock of the note.
///
/// The position of a spec in the deal's underlying list is its index
/// everywhere else: price vectors, GARCH parameters and correlation rows.
///
/// # Example
///
/// ```
/// use pricer_models::underlying::UnderlyingSpec;
///
/// let aapl = UnderlyingSpec::new("AAPL", 190.0, true, 0.005).unwrap();
/// assert_eq!(aapl.effective_dividend_yield(), 0.005);
///
/// let amzn = UnderlyingSpec::new("AMZN", 180.0, false, 0.0).unwrap();
/// assert_eq!(amzn.effective_dividend_yield(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnderlyingSpec {
    /// Ticker or other identifier
    pub symbol: String,
    /// Price at the pricing date, also the autocall barrier
    pub initial_price: f64,
    /// Whether the stock pays dividends
    #[cfg_attr(feature = "serde", serde(default))]
    pub has_dividend: bool,
    /// Continuous dividend yield (annual)
    #[cfg_attr(feature = "serde", serde(default))]
    pub dividend_yield: f64,
}

impl UnderlyingSpec {
    /// Create a validated underlying.
    ///
    /// # Errors
    ///
    /// `ModelError::InvalidUnderlying` for an empty symbol, a non-positive
    /// initial price or a negative dividend yield.
    pub fn new(
        symbol: impl Into<String>,
        initial_price: f64,
        has_dividend: bool,
        dividend_yield: f64,
    ) -> Result<Self, ModelError> {
        let spec = Self {
            symbol: symbol.into(),
            initial_price,
            has_dividend,
            dividend_yield,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the invariants of a spec built field by field (e.g. deserialised).
    pub fn validate(&self) -> Result<(), ModelError> {
        let fail = |reason: String| ModelError::InvalidUnderlying {
            symbol: self.symbol.clone(),
            reason,
        };
        if self.symbol.trim().is_empty() {
            return Err(fail("symbol is empty".to_string()));
        }
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(fail(format!(
                "initial price must be positive, got {}",
                self.initial_price
            )));
        }
        if !(self.dividend_yield.is_finite() && self.dividend_yield >= 0.0) {
            return Err(fail(format!(
                "dividend yield must be non-negative, got {}",
                self.dividend_yield
            )));
        }
        Ok(())
    }

    /// Dividend yield entering the drift: zero when the stock pays none.
    #[inline]
    pub fn effective_dividend_yield(&self) -> f64 {
        if self.has_dividend {
            self.dividend_yield
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(UnderlyingSpec::new("", 100.0, false, 0.0).is_err());
        assert!(UnderlyingSpec::new("MSFT", 0.0, false, 0.0).is_err());
        assert!(UnderlyingSpec::new("MSFT", f64::NAN, false, 0.0).is_err());
        assert!(UnderlyingSpec::new("MSFT", 400.0, true, -0.01).is_err());
    }

    #[test]
    fn test_error_names_symbol() {
        let err = UnderlyingSpec::new("GOOGL", -5.0, false, 0.0).unwrap_err();
        assert!(format!("{}", err).contains("GOOGL"));
    }

    #[test]
    fn test_dividend_flag_gates_yield() {
        let spec = UnderlyingSpec::new("MSFT", 400.0, false, 0.02).unwrap();
        assert_eq!(spec.effective_dividend_yield(), 0.0);
    }
}
