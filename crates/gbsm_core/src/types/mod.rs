//! Shared types for the GBSM pricer.

pub mod error;
pub mod flavor;

pub use error::PricingError;
pub use flavor::{Flavor, InvalidFlavor};
