//! Shared error types for pricing operations.
//!
//! Each workspace layer defines its own structured error and converts it
//! into [`PricingError`] at the crate boundary, so callers can handle one
//! categorised type without losing the diagnostic message.

use thiserror::Error;

/// Categorised pricing errors.
///
/// # Variants
/// - `InvalidInput`: invalid parameters or batch shape
/// - `NumericalInstability`: computation produced an unusable result
/// - `BackendFailure`: an execution backend failed outside the numeric
///   domain (e.g. a GPU driver error)
///
/// # Examples
/// ```
/// use gbsm_core::types::PricingError;
///
/// let err = PricingError::InvalidInput("negative spot".to_string());
/// assert_eq!(format!("{}", err), "invalid input: negative spot");
/// ```
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Invalid input data or parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Numerical instability during computation.
    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    /// An execution backend failed for non-numeric reasons.
    #[error("backend failure: {0}")]
    BackendFailure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = PricingError::InvalidInput("spot must be positive".to_string());
        assert_eq!(err.to_string(), "invalid input: spot must be positive");

        let err = PricingError::BackendFailure("device unavailable".to_string());
        assert_eq!(err.to_string(), "backend failure: device unavailable");
    }

    #[test]
    fn test_error_trait_implementation() {
        let err = PricingError::NumericalInstability("overflow".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
