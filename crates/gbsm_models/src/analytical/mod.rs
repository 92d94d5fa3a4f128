//! Analytical pricing formulas.

pub mod error;
pub mod gbsm;

pub use error::AnalyticalError;
pub use gbsm::{call_value, d1, d2, price, price_with, put_value};
