//! # GBSM Kernel (L3: Batch Engine)
//!
//! Batch pricing of vanilla European options over interchangeable execution
//! backends.
//!
//! This crate provides:
//! - [`batch::OptionBatch`]: the validated, broadcast-resolved input batch
//! - [`engine::BatchPricer`]: strategy dispatch over sequential, vectorized,
//!   rayon worker-pool and (feature `cuda`) GPU execution
//! - [`sample`]: deterministic random batches for tests and benchmarks
//!
//! Every backend routes through the single closed-form kernel in
//! `gbsm_models`, so cross-backend agreement holds by construction; the only
//! permitted divergence is the pinned normal-CDF approximation budget.

#![warn(missing_docs)]

pub mod batch;
pub mod engine;
pub mod sample;

pub use batch::{BatchError, BatchParam, FlavorParam, OptionBatch};
pub use engine::{BatchPricer, ConfigError, EngineConfig, ExecutionBackend};
