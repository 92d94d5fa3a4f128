//! CPU execution strategies.
//!
//! Three ways to walk a batch, all through the same closed-form kernel:
//! an in-order loop, a zipped columnar sweep, and a chunked rayon sweep.
//! The parallel path writes through disjoint `par_chunks_mut` windows, so
//! the exclusive-write-per-index discipline holds without locks.

use gbsm_core::math::CdfKind;
use gbsm_core::types::Flavor;
use gbsm_models::analytical::price_with;
use rayon::prelude::*;

use crate::batch::OptionBatch;

/// Prices one element at a time, in order.
pub(crate) fn price_sequential(batch: &OptionBatch, cdf: CdfKind, out: &mut [f64]) {
    for i in 0..batch.len() {
        out[i] = price_with(
            batch.flavors()[i],
            batch.spots()[i],
            batch.strikes()[i],
            batch.expiries()[i],
            batch.rates()[i],
            batch.volatilities()[i],
            batch.carries()[i],
            cdf,
        );
    }
}

/// Prices a window of index-aligned columns.
///
/// The zipped iteration removes per-element bounds checks, leaving a
/// branch-light loop body the optimiser can unroll and vectorise.
#[allow(clippy::too_many_arguments)]
#[inline]
fn price_columns(
    flavors: &[Flavor],
    spots: &[f64],
    strikes: &[f64],
    expiries: &[f64],
    rates: &[f64],
    volatilities: &[f64],
    carries: &[f64],
    cdf: CdfKind,
    out: &mut [f64],
) {
    let iter = out
        .iter_mut()
        .zip(flavors)
        .zip(spots)
        .zip(strikes)
        .zip(expiries)
        .zip(rates)
        .zip(volatilities)
        .zip(carries);

    for (((((((price, &flavor), &s), &k), &t), &r), &sigma), &b) in iter {
        *price = price_with(flavor, s, k, t, r, sigma, b, cdf);
    }
}

/// Prices the whole batch as one columnar sweep.
pub(crate) fn price_vectorized(batch: &OptionBatch, cdf: CdfKind, out: &mut [f64]) {
    price_columns(
        batch.flavors(),
        batch.spots(),
        batch.strikes(),
        batch.expiries(),
        batch.rates(),
        batch.volatilities(),
        batch.carries(),
        cdf,
        out,
    );
}

/// Prices the batch across the rayon worker pool.
///
/// The output is split into contiguous chunks of `chunk_size`; each worker
/// prices the matching input window into its own chunk. No two workers
/// share an output index.
pub(crate) fn price_parallel(batch: &OptionBatch, cdf: CdfKind, chunk_size: usize, out: &mut [f64]) {
    out.par_chunks_mut(chunk_size)
        .enumerate()
        .for_each(|(chunk_idx, out_chunk)| {
            let offset = chunk_idx * chunk_size;
            let end = offset + out_chunk.len();
            price_columns(
                &batch.flavors()[offset..end],
                &batch.spots()[offset..end],
                &batch.strikes()[offset..end],
                &batch.expiries()[offset..end],
                &batch.rates()[offset..end],
                &batch.volatilities()[offset..end],
                &batch.carries()[offset..end],
                cdf,
                out_chunk,
            );
        });
}
