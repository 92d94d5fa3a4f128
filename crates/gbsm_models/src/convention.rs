//! Market-convention resolution.
//!
//! The pricing kernel consumes a resolved cost-of-carry `b`; this module is
//! the adapter that produces it from a named model and the `(r, q)` pair.
//! Keeping the mapping out of the kernel keeps the formula a pure function
//! with no knowledge of model selection.

use gbsm_core::types::PricingError;
use std::fmt;
use thiserror::Error;

/// Named carry conventions for the generalized model.
///
/// | Convention            | Cost-of-carry | Underlying                        |
/// |-----------------------|---------------|-----------------------------------|
/// | `BlackScholes`        | `b = r`       | non-dividend stock                |
/// | `Black76`             | `b = 0`       | futures                           |
/// | `BlackScholesMerton`  | `b = r − q`   | stock with continuous yield `q`   |
///
/// # Examples
/// ```
/// use gbsm_models::convention::Convention;
///
/// assert_eq!(Convention::BlackScholes.cost_of_carry(0.05, 0.0), 0.05);
/// assert_eq!(Convention::Black76.cost_of_carry(0.05, 0.0), 0.0);
/// assert_eq!(Convention::BlackScholesMerton.cost_of_carry(0.05, 0.02), 0.03);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convention {
    /// Stock options, no dividend: `b = r`.
    BlackScholes,
    /// Options on futures: `b = 0`.
    Black76,
    /// Stock options with continuous dividend yield: `b = r − q`.
    BlackScholesMerton,
}

/// Errors from array-form convention resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConventionError {
    /// Rate and dividend-yield arrays differ in length.
    #[error("shape mismatch: rates has length {rates}, dividend yields has length {yields}")]
    ShapeMismatch {
        /// Length of the rates array.
        rates: usize,
        /// Length of the dividend-yield array.
        yields: usize,
    },
}

impl From<ConventionError> for PricingError {
    fn from(err: ConventionError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

impl Convention {
    /// Resolves the scalar cost-of-carry for this convention.
    #[inline]
    pub fn cost_of_carry(self, rate: f64, dividend_yield: f64) -> f64 {
        match self {
            Convention::BlackScholes => rate,
            Convention::Black76 => 0.0,
            Convention::BlackScholesMerton => rate - dividend_yield,
        }
    }

    /// Resolves a carry array from index-aligned rate and yield arrays.
    ///
    /// # Errors
    /// [`ConventionError::ShapeMismatch`] when the arrays differ in length.
    ///
    /// # Examples
    /// ```
    /// use gbsm_models::convention::Convention;
    ///
    /// let b = Convention::BlackScholesMerton
    ///     .resolve_carry(&[0.05, 0.04], &[0.01, 0.02])
    ///     .unwrap();
    /// assert_eq!(b, vec![0.04, 0.02]);
    /// ```
    pub fn resolve_carry(
        self,
        rates: &[f64],
        dividend_yields: &[f64],
    ) -> Result<Vec<f64>, ConventionError> {
        if rates.len() != dividend_yields.len() {
            return Err(ConventionError::ShapeMismatch {
                rates: rates.len(),
                yields: dividend_yields.len(),
            });
        }

        Ok(rates
            .iter()
            .zip(dividend_yields)
            .map(|(&r, &q)| self.cost_of_carry(r, q))
            .collect())
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Convention::BlackScholes => write!(f, "Black-Scholes"),
            Convention::Black76 => write!(f, "Black76"),
            Convention::BlackScholesMerton => write!(f, "Black-Scholes-Merton"),
        }
    }
}
