//! Error types for analytical pricing operations.

use gbsm_core::types::PricingError;
use thiserror::Error;

/// Analytical pricing errors.
///
/// Raised by the validated scalar entry point before any arithmetic runs.
/// Each variant carries the offending value so the caller can diagnose the
/// input without re-deriving it.
///
/// # Examples
/// ```
/// use gbsm_models::analytical::AnalyticalError;
///
/// let err = AnalyticalError::InvalidVolatility { volatility: -0.2 };
/// assert!(format!("{}", err).contains("volatility"));
/// ```
#[derive(Debug, Clone, Error, PartialEq)]
pub enum AnalyticalError {
    /// Non-positive spot price.
    #[error("invalid spot price: S = {spot}")]
    InvalidSpot {
        /// The rejected spot value.
        spot: f64,
    },

    /// Non-positive strike price.
    #[error("invalid strike price: K = {strike}")]
    InvalidStrike {
        /// The rejected strike value.
        strike: f64,
    },

    /// Negative volatility. Zero is admitted as a documented degeneracy.
    #[error("invalid volatility: sigma = {volatility}")]
    InvalidVolatility {
        /// The rejected volatility value.
        volatility: f64,
    },

    /// Negative time to maturity. Zero is admitted as a documented
    /// degeneracy.
    #[error("invalid expiry: T = {expiry}")]
    InvalidExpiry {
        /// The rejected expiry value.
        expiry: f64,
    },
}

impl From<AnalyticalError> for PricingError {
    fn from(err: AnalyticalError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}
