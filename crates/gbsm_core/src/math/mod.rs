//! Mathematical functions for option pricing.

pub mod distributions;

pub use distributions::{fast_norm_cdf, norm_cdf, norm_pdf, CdfKind};
