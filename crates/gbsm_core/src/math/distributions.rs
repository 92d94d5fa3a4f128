//! Standard normal distribution functions.
//!
//! This module provides the two CDF evaluators the pricing backends build on:
//! - [`norm_cdf`]: exact reference, Φ(x) = ½·erfc(−x/√2) via the library erfc
//! - [`fast_norm_cdf`]: Abramowitz & Stegun 7.1.26 polynomial approximation,
//!   absolute error ≤ 1.5e-7 for all finite x
//!
//! The approximation's coefficient set is a versioned contract: the CUDA
//! kernel source embeds the same constants, so the GPU lane computes the
//! identical function. Changing a coefficient breaks cross-backend agreement.
//!
//! Non-finite inputs follow IEEE-754: NaN propagates, ±∞ saturate to 0/1.

use num_traits::Float;
use statrs::function::erf::erfc;

/// Square root of 2.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// 1 / sqrt(2 * pi)
const FRAC_1_SQRT_2PI: f64 = 0.398_942_280_401_432_7;

/// Abramowitz & Stegun 7.1.26 erf coefficients.
///
/// erf(x) ≈ 1 − (a₁t + a₂t² + a₃t³ + a₄t⁴ + a₅t⁵)·e^(−x²), t = 1/(1 + p·x),
/// maximum absolute error 1.5e-7. These constants are mirrored verbatim in
/// the CUDA kernel source; keep both copies identical.
const ERF_A1: f64 = 0.254829592;
const ERF_A2: f64 = -0.284496736;
const ERF_A3: f64 = 1.421413741;
const ERF_A4: f64 = -1.453152027;
const ERF_A5: f64 = 1.061405429;
const ERF_P: f64 = 0.3275911;

/// Error function approximation using Horner's method.
///
/// Uses Abramowitz and Stegun formula 7.1.26, accurate to 1.5e-7 absolute
/// for all finite x. Odd symmetry is handled by sign: erf(−x) = −erf(x).
#[inline]
fn erf_approx<T: Float>(x: T) -> T {
    let one = T::one();

    let a1 = T::from(ERF_A1).unwrap();
    let a2 = T::from(ERF_A2).unwrap();
    let a3 = T::from(ERF_A3).unwrap();
    let a4 = T::from(ERF_A4).unwrap();
    let a5 = T::from(ERF_A5).unwrap();
    let p = T::from(ERF_P).unwrap();

    let abs_x = x.abs();

    // t = 1 / (1 + p * |x|)
    let t = one / (one + p * abs_x);

    // Horner's method for a1*t + a2*t^2 + ... + a5*t^5
    let poly = ((((a5 * t + a4) * t + a3) * t + a2) * t + a1) * t;

    let y = one - poly * (-abs_x * abs_x).exp();

    if x < T::zero() {
        -y
    } else {
        y
    }
}

/// Exact standard normal cumulative distribution function.
///
/// Computes P(X ≤ x) for X ~ N(0, 1) as Φ(x) = ½·erfc(−x/√2) using the
/// library complementary error function at full double precision. This is
/// the reference every backend is judged against.
///
/// NaN input yields NaN; ±∞ saturate to 0/1.
///
/// # Examples
/// ```
/// use gbsm_core::math::norm_cdf;
///
/// assert!((norm_cdf(0.0) - 0.5).abs() < 1e-15);
/// assert!(norm_cdf(-3.0) < 0.01);
/// assert!(norm_cdf(3.0) > 0.99);
/// ```
#[inline]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// Approximate standard normal cumulative distribution function.
///
/// Computes Φ(x) = ½·(1 + erf(x/√2)) with the Abramowitz & Stegun 7.1.26
/// erf approximation. Absolute error is below 1.5e-7 for all finite x,
/// well inside the 1e-6 budget that keeps the compiled and GPU backends
/// consistent with the exact reference.
///
/// NaN input yields NaN; ±∞ saturate to 0/1.
///
/// # Examples
/// ```
/// use gbsm_core::math::{fast_norm_cdf, norm_cdf};
///
/// let x = 1.25_f64;
/// assert!((fast_norm_cdf(x) - norm_cdf(x)).abs() < 1.5e-7);
/// ```
#[inline]
pub fn fast_norm_cdf<T: Float>(x: T) -> T {
    let sqrt_2 = T::from(SQRT_2).unwrap();
    let half = T::from(0.5).unwrap();

    half * (T::one() + erf_approx(x / sqrt_2))
}

/// Standard normal probability density function.
///
/// φ(x) = (1/√(2π))·e^(−x²/2), always non-negative.
#[inline]
pub fn norm_pdf<T: Float>(x: T) -> T {
    let frac_1_sqrt_2pi = T::from(FRAC_1_SQRT_2PI).unwrap();
    let half = T::from(0.5).unwrap();

    frac_1_sqrt_2pi * (-half * x * x).exp()
}

/// Normal-CDF evaluation strategy.
///
/// Selected by the engine configuration. CPU backends may use either; the
/// GPU backend is pinned to the [`CdfKind::AbramowitzStegun`] coefficients
/// because the device kernel embeds them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CdfKind {
    /// Exact library erfc at double precision.
    #[default]
    Exact,
    /// Abramowitz & Stegun 7.1.26 polynomial, |ε| ≤ 1.5e-7.
    AbramowitzStegun,
}

impl CdfKind {
    /// Evaluates Φ(x) under this strategy.
    #[inline]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            CdfKind::Exact => norm_cdf(x),
            CdfKind::AbramowitzStegun => fast_norm_cdf(x),
        }
    }
}
