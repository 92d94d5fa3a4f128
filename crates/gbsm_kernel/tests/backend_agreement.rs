//! Cross-backend agreement tests.
//!
//! Every execution backend prices the same seeded random batch and is
//! compared against the sequential/exact reference. Backends sharing the
//! exact CDF must agree bitwise, since they run identical arithmetic in
//! identical order. The Abramowitz-Stegun lanes are allowed the pinned
//! approximation budget: the CDF error (≤ 7.5e-8) enters each price scaled
//! by spot and strike, so the per-element budget is 1e-6·(S + K) absolute,
//! with 1e-4 relative as the alternative for large prices.

use gbsm_core::math::CdfKind;
use gbsm_kernel::engine::{BatchPricer, EngineConfig, ExecutionBackend};
use gbsm_kernel::sample::{market_like_batch, random_batch, SampleRanges};
use gbsm_kernel::OptionBatch;

const N: usize = 10_000;
const SEED: u64 = 42;

fn prices(backend: ExecutionBackend, cdf: CdfKind, batch: &OptionBatch) -> Vec<f64> {
    let config = EngineConfig::builder()
        .backend(backend)
        .cdf(cdf)
        // Low threshold so a 10k batch genuinely exercises the worker pool
        .min_options_per_thread(16)
        .build()
        .expect("valid configuration");
    BatchPricer::new(config)
        .expect("pricer construction")
        .price(batch)
        .expect("batch pricing")
}

fn reference(batch: &OptionBatch) -> Vec<f64> {
    prices(ExecutionBackend::Sequential, CdfKind::Exact, batch)
}

fn assert_within_budget(batch: &OptionBatch, actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (i, (&a, &e)) in actual.iter().zip(expected).enumerate() {
        if a.is_nan() && e.is_nan() {
            continue;
        }
        let scale = batch.spots()[i] + batch.strikes()[i];
        let diff = (a - e).abs();
        assert!(
            diff <= 1e-6 * scale || diff <= 1e-4 * e.abs(),
            "index {}: {} vs reference {} (diff {}, scale {})",
            i,
            a,
            e,
            diff,
            scale
        );
    }
}

#[test]
fn vectorized_exact_matches_reference_bitwise() {
    let batch = random_batch(N, SEED, &SampleRanges::default()).unwrap();
    let expected = reference(&batch);
    let actual = prices(ExecutionBackend::Vectorized, CdfKind::Exact, &batch);
    assert_eq!(actual, expected);
}

#[test]
fn parallel_exact_matches_reference_bitwise() {
    let batch = random_batch(N, SEED, &SampleRanges::default()).unwrap();
    let expected = reference(&batch);
    let actual = prices(ExecutionBackend::Parallel, CdfKind::Exact, &batch);
    assert_eq!(actual, expected);
}

#[test]
fn approx_cdf_within_budget_sequential() {
    let batch = random_batch(N, SEED, &SampleRanges::default()).unwrap();
    let expected = reference(&batch);
    let actual = prices(ExecutionBackend::Sequential, CdfKind::AbramowitzStegun, &batch);
    assert_within_budget(&batch, &actual, &expected);
}

#[test]
fn approx_cdf_within_budget_parallel() {
    let batch = random_batch(N, SEED, &SampleRanges::default()).unwrap();
    let expected = reference(&batch);
    let actual = prices(ExecutionBackend::Parallel, CdfKind::AbramowitzStegun, &batch);
    assert_within_budget(&batch, &actual, &expected);
}

#[test]
fn agreement_holds_on_clustered_batch() {
    // Near-the-money batch with expiries down to zero: degenerate rows must
    // agree across backends too (NaN-for-NaN, intrinsic-for-intrinsic)
    let batch = market_like_batch(N, SEED).unwrap();
    let expected = reference(&batch);

    let vectorized = prices(ExecutionBackend::Vectorized, CdfKind::Exact, &batch);
    assert_eq!(vectorized.len(), expected.len());
    for (v, e) in vectorized.iter().zip(&expected) {
        assert!(v == e || (v.is_nan() && e.is_nan()));
    }

    let approx = prices(ExecutionBackend::Parallel, CdfKind::AbramowitzStegun, &batch);
    assert_within_budget(&batch, &approx, &expected);
}

#[cfg(feature = "cuda")]
#[test]
fn gpu_matches_reference_within_budget() {
    let batch = random_batch(N, SEED, &SampleRanges::default()).unwrap();
    let expected = reference(&batch);
    let actual = prices(ExecutionBackend::Gpu, CdfKind::AbramowitzStegun, &batch);
    assert_within_budget(&batch, &actual, &expected);
}
