//! # GBSM Core (L1: Foundation)
//!
//! Numeric foundation for the generalized Black-Scholes-Merton pricer.
//!
//! This crate provides:
//! - Standard normal distribution functions: an exact reference CDF and a
//!   pinned polynomial approximation shared by the compiled backends
//! - The option flavor type with its raw-input boundary (integer tags,
//!   strings)
//! - Shared structured error types
//!
//! ## Design Principles
//!
//! - **One CDF contract**: the approximation is versioned by its coefficient
//!   set and tested against the exact reference independently of any pricing
//!   code
//! - **Typed boundaries**: invalid flavors are rejected where raw inputs
//!   enter, never coerced inside the library

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod math;
pub mod types;
