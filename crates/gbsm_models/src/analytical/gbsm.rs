//! Generalized Black-Scholes-Merton closed form.
//!
//! ## Mathematical Formulas
//!
//! **Call**: C = S·e^((b−r)T)·N(d₁) − K·e^(−rT)·N(d₂)
//! **Put**:  P = K·e^(−rT)·N(−d₂) − S·e^((b−r)T)·N(−d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (b + σ²/2)T) / (σ√T)
//! - d₂ = d₁ − σ√T
//!
//! The cost-of-carry `b` unifies the related models: `b = r` prices stock
//! options (Black-Scholes), `b = 0` futures options (Black76), `b = r − q`
//! stock options with a continuous dividend yield (Black-Scholes-Merton).
//! The formula itself never sees the convention, only the resolved `b`.
//!
//! ## Degeneracy
//!
//! `T = 0` or `σ = 0` make d₁/d₂ non-finite and the formula follows
//! IEEE-754 from there: for S ≠ K the CDF saturates and the price collapses
//! to discounted intrinsic value, at the removable singularity S = K the
//! result is NaN. No clamping is applied anywhere, so small negative prices
//! from cancellation near expiry are returned as computed.

use gbsm_core::math::CdfKind;
use gbsm_core::types::Flavor;

use super::error::AnalyticalError;

/// Computes the d₁ term of the GBSM formula.
///
/// d₁ = (ln(S/K) + (b + σ²/2)T) / (σ√T)
///
/// Non-finite for `T = 0` or `sigma = 0`; see the module documentation.
#[inline]
pub fn d1(spot: f64, strike: f64, expiry: f64, volatility: f64, carry: f64) -> f64 {
    let sqrt_t = expiry.sqrt();
    ((spot / strike).ln() + (carry + 0.5 * volatility * volatility) * expiry)
        / (volatility * sqrt_t)
}

/// Computes the d₂ term of the GBSM formula.
///
/// d₂ = d₁ − σ√T
#[inline]
pub fn d2(spot: f64, strike: f64, expiry: f64, volatility: f64, carry: f64) -> f64 {
    d1(spot, strike, expiry, volatility, carry) - volatility * expiry.sqrt()
}

/// Prices one option under the GBSM closed form.
///
/// This is the canonical kernel: the single copy of the formula that every
/// execution backend routes through. It computes √T, d₁, d₂ and the two
/// discount factors once, evaluates the CDF at the signed arguments, and
/// selects the payoff branch by flavor. No validation here; callers that accept
/// raw input go through [`price`] or the batch constructors instead.
///
/// # Examples
/// ```
/// use gbsm_core::math::CdfKind;
/// use gbsm_core::types::Flavor;
/// use gbsm_models::analytical::price_with;
///
/// // Textbook at-the-money reference: ≈ 10.4506
/// let c = price_with(Flavor::Call, 100.0, 100.0, 1.0, 0.05, 0.2, 0.05, CdfKind::Exact);
/// assert!((c - 10.4506).abs() < 1e-3);
/// ```
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn price_with(
    flavor: Flavor,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    carry: f64,
    cdf: CdfKind,
) -> f64 {
    let sqrt_t = expiry.sqrt();
    let d1 = ((spot / strike).ln() + (carry + 0.5 * volatility * volatility) * expiry)
        / (volatility * sqrt_t);
    let d2 = d1 - volatility * sqrt_t;

    let carry_df = ((carry - rate) * expiry).exp();
    let discount = (-rate * expiry).exp();

    match flavor {
        Flavor::Call => spot * carry_df * cdf.eval(d1) - strike * discount * cdf.eval(d2),
        Flavor::Put => strike * discount * cdf.eval(-d2) - spot * carry_df * cdf.eval(-d1),
    }
}

/// Call price, C = S·e^((b−r)T)·N(d₁) − K·e^(−rT)·N(d₂).
#[inline]
pub fn call_value(
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    carry: f64,
    cdf: CdfKind,
) -> f64 {
    price_with(Flavor::Call, spot, strike, expiry, rate, volatility, carry, cdf)
}

/// Put price, P = K·e^(−rT)·N(−d₂) − S·e^((b−r)T)·N(−d₁).
#[inline]
pub fn put_value(
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    carry: f64,
    cdf: CdfKind,
) -> f64 {
    price_with(Flavor::Put, spot, strike, expiry, rate, volatility, carry, cdf)
}

/// Validated scalar entry point using the exact CDF.
///
/// Rejects out-of-domain parameters eagerly, before any arithmetic:
/// `S ≤ 0`, `K ≤ 0`, `sigma < 0`, `T < 0`. Zero volatility and zero expiry
/// pass through as documented degeneracy (discounted intrinsic value for
/// S ≠ K, NaN at S = K).
///
/// # Errors
/// - [`AnalyticalError::InvalidSpot`] if `spot <= 0`
/// - [`AnalyticalError::InvalidStrike`] if `strike <= 0`
/// - [`AnalyticalError::InvalidVolatility`] if `volatility < 0`
/// - [`AnalyticalError::InvalidExpiry`] if `expiry < 0`
///
/// # Examples
/// ```
/// use gbsm_core::types::Flavor;
/// use gbsm_models::analytical::price;
///
/// let c = price(Flavor::Call, 100.0, 100.0, 1.0, 0.05, 0.2, 0.05).unwrap();
/// assert!((c - 10.4506).abs() < 1e-3);
///
/// assert!(price(Flavor::Call, -100.0, 100.0, 1.0, 0.05, 0.2, 0.05).is_err());
/// ```
pub fn price(
    flavor: Flavor,
    spot: f64,
    strike: f64,
    expiry: f64,
    rate: f64,
    volatility: f64,
    carry: f64,
) -> Result<f64, AnalyticalError> {
    if spot <= 0.0 {
        return Err(AnalyticalError::InvalidSpot { spot });
    }
    if strike <= 0.0 {
        return Err(AnalyticalError::InvalidStrike { strike });
    }
    if volatility < 0.0 {
        return Err(AnalyticalError::InvalidVolatility { volatility });
    }
    if expiry < 0.0 {
        return Err(AnalyticalError::InvalidExpiry { expiry });
    }

    Ok(price_with(
        flavor,
        spot,
        strike,
        expiry,
        rate,
        volatility,
        carry,
        CdfKind::Exact,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // d1/d2 tests
    // ==========================================================

    #[test]
    fn test_d1_atm_zero_carry() {
        // ATM with b = 0: d1 = σ√T / 2
        let v = d1(100.0, 100.0, 1.0, 0.2, 0.0);
        assert_relative_eq!(v, 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_d2_relationship() {
        let a = d1(105.0, 100.0, 0.5, 0.25, 0.03);
        let b = d2(105.0, 100.0, 0.5, 0.25, 0.03);
        assert_relative_eq!(b, a - 0.25 * 0.5_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_d1_degenerate_expiry() {
        // T = 0, S ≠ K: the sign of ln(S/K) decides the infinity
        assert_eq!(d1(110.0, 100.0, 0.0, 0.2, 0.05), f64::INFINITY);
        assert_eq!(d1(90.0, 100.0, 0.0, 0.2, 0.05), f64::NEG_INFINITY);
        // S = K: removable singularity, NaN
        assert!(d1(100.0, 100.0, 0.0, 0.2, 0.05).is_nan());
    }

    // ==========================================================
    // Reference values (GBSM textbook case)
    // ==========================================================

    #[test]
    fn test_call_reference_value() {
        // S = K = 100, T = 1, r = b = 0.05, σ = 0.2 → C ≈ 10.4506
        let c = price(Flavor::Call, 100.0, 100.0, 1.0, 0.05, 0.2, 0.05).unwrap();
        assert_relative_eq!(c, 10.4506, epsilon = 1e-3);
    }

    #[test]
    fn test_put_reference_value() {
        // Companion put: P ≈ 5.5735
        let p = price(Flavor::Put, 100.0, 100.0, 1.0, 0.05, 0.2, 0.05).unwrap();
        assert_relative_eq!(p, 5.5735, epsilon = 1e-3);
    }

    #[test]
    fn test_reference_value_approx_cdf() {
        // Same scenario through the A&S approximation. The CDF error enters
        // the price scaled by spot and strike, so the budget is 1e-6·(S + K).
        let exact = call_value(100.0, 100.0, 1.0, 0.05, 0.2, 0.05, CdfKind::Exact);
        let approx = call_value(100.0, 100.0, 1.0, 0.05, 0.2, 0.05, CdfKind::AbramowitzStegun);
        assert!((exact - approx).abs() < 1e-6 * (100.0 + 100.0));
    }

    // ==========================================================
    // Put-call parity
    // ==========================================================

    #[test]
    fn test_put_call_parity_three_conventions() {
        // C − P = S·e^((b−r)T) − K·e^(−rT) for each carry convention
        let (s, k, t, r, sigma, q) = (100.0, 95.0, 1.5, 0.04, 0.3, 0.02);
        for b in [r, 0.0, r - q] {
            let c = call_value(s, k, t, r, sigma, b, CdfKind::Exact);
            let p = put_value(s, k, t, r, sigma, b, CdfKind::Exact);
            let forward = s * ((b - r) * t).exp() - k * (-r * t).exp();
            assert_relative_eq!(c - p, forward, epsilon = 1e-9, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_put_call_parity_negative_rate() {
        let c = call_value(100.0, 100.0, 1.0, -0.02, 0.2, -0.02, CdfKind::Exact);
        let p = put_value(100.0, 100.0, 1.0, -0.02, 0.2, -0.02, CdfKind::Exact);
        let forward = 100.0 - 100.0 * (0.02_f64).exp();
        assert_relative_eq!(c - p, forward, epsilon = 1e-9);
    }

    // ==========================================================
    // Degenerate inputs
    // ==========================================================

    #[test]
    fn test_zero_expiry_is_intrinsic() {
        // T = 0, S ≠ K: IEEE propagation collapses to intrinsic value
        let c = price(Flavor::Call, 90.0, 100.0, 0.0, 0.05, 0.2, 0.05).unwrap();
        assert_relative_eq!(c, 0.0, epsilon = 1e-12);

        let c = price(Flavor::Call, 110.0, 100.0, 0.0, 0.05, 0.2, 0.05).unwrap();
        assert_relative_eq!(c, 10.0, epsilon = 1e-12);

        let p = price(Flavor::Put, 90.0, 100.0, 0.0, 0.05, 0.2, 0.05).unwrap();
        assert_relative_eq!(p, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_volatility_is_discounted_intrinsic() {
        // σ = 0, S·e^(bT) > K: the call is worth its discounted forward
        // intrinsic value
        let c = price(Flavor::Call, 120.0, 100.0, 1.0, 0.05, 0.0, 0.05).unwrap();
        let expected = 120.0 - 100.0 * (-0.05_f64).exp();
        assert_relative_eq!(c, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_atm_zero_expiry_is_nan() {
        // S = K with T = 0 hits the 0/0 singularity; documented as NaN
        let c = price(Flavor::Call, 100.0, 100.0, 0.0, 0.05, 0.2, 0.05).unwrap();
        assert!(c.is_nan());
    }

    // ==========================================================
    // Validation
    // ==========================================================

    #[test]
    fn test_rejects_non_positive_spot() {
        match price(Flavor::Call, 0.0, 100.0, 1.0, 0.05, 0.2, 0.05) {
            Err(AnalyticalError::InvalidSpot { spot }) => assert_eq!(spot, 0.0),
            other => panic!("expected InvalidSpot, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_non_positive_strike() {
        assert!(matches!(
            price(Flavor::Put, 100.0, -1.0, 1.0, 0.05, 0.2, 0.05),
            Err(AnalyticalError::InvalidStrike { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_volatility() {
        assert!(matches!(
            price(Flavor::Call, 100.0, 100.0, 1.0, 0.05, -0.2, 0.05),
            Err(AnalyticalError::InvalidVolatility { .. })
        ));
    }

    #[test]
    fn test_rejects_negative_expiry() {
        assert!(matches!(
            price(Flavor::Call, 100.0, 100.0, -1.0, 0.05, 0.2, 0.05),
            Err(AnalyticalError::InvalidExpiry { .. })
        ));
    }

    #[test]
    fn test_negative_rate_allowed() {
        assert!(price(Flavor::Call, 100.0, 100.0, 1.0, -0.01, 0.2, -0.01).is_ok());
    }

    // ==========================================================
    // Qualitative shape
    // ==========================================================

    #[test]
    fn test_deep_itm_call_close_to_forward_intrinsic() {
        let c = price(Flavor::Call, 200.0, 100.0, 1.0, 0.05, 0.2, 0.05).unwrap();
        let intrinsic = 200.0 - 100.0 * (-0.05_f64).exp();
        assert!(c >= intrinsic - 0.01);
    }

    #[test]
    fn test_deep_otm_call_near_zero() {
        let c = price(Flavor::Call, 50.0, 100.0, 1.0, 0.05, 0.2, 0.05).unwrap();
        assert!(c < 0.01);
    }

    #[test]
    fn test_scale_invariance() {
        // Homogeneity of degree 1 in (S, K)
        let base = price(Flavor::Call, 100.0, 95.0, 1.0, 0.05, 0.2, 0.05).unwrap();
        let scaled = price(Flavor::Call, 250.0, 237.5, 1.0, 0.05, 0.2, 0.05).unwrap();
        assert_relative_eq!(scaled, 2.5 * base, max_relative = 1e-12);
    }

    // ==========================================================
    // Property-based tests
    // ==========================================================

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn d2_below_d1(
                s in 50.0..150.0_f64,
                k in 50.0..150.0_f64,
                t in 0.01..2.0_f64,
                sigma in 0.1..0.5_f64,
                b in -0.05..0.1_f64,
            ) {
                prop_assert!(d2(s, k, t, sigma, b) < d1(s, k, t, sigma, b));
            }

            #[test]
            fn call_within_no_arbitrage_bounds(
                s in 50.0..150.0_f64,
                k in 50.0..150.0_f64,
                t in 0.01..2.0_f64,
                r in 0.0..0.1_f64,
                sigma in 0.1..0.5_f64,
            ) {
                // e^((b−r)T)·S bounds the call above; discounted forward
                // intrinsic bounds it below
                let b = r;
                let c = call_value(s, k, t, r, sigma, b, CdfKind::Exact);
                let forward_leg = s * ((b - r) * t).exp();
                let lower = (forward_leg - k * (-r * t).exp()).max(0.0);
                prop_assert!(c <= forward_leg + 1e-9);
                prop_assert!(c >= lower - 1e-9);
            }
        }
    }
}
