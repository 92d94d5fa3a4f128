//! # GBSM Models (L2: Analytics)
//!
//! Closed-form analytics for vanilla European options.
//!
//! This crate provides:
//! - The generalized Black-Scholes-Merton formula (d1/d2, call/put values,
//!   a validated scalar entry point)
//! - Market-convention resolution: turning a named model and `(r, q)` into
//!   the cost-of-carry `b` the kernel consumes
//!
//! ## Design Principles
//!
//! - **One formula copy**: [`analytical::price_with`] is the canonical
//!   kernel; every execution backend routes through it (the GPU kernel
//!   mirrors it statement for statement)
//! - **Convention outside the kernel**: the formula only ever sees a
//!   resolved `b`; model selection lives in [`convention`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod convention;
