//! Option batch construction, broadcasting and validation.
//!
//! A batch is a structure-of-arrays view of N independent options. Inputs
//! arrive as scalars or arrays in any mix; scalars are broadcast to the
//! batch length, arrays must all agree on it. Validation is eager: a shape
//! mismatch, an unrecognised flavor tag, or an out-of-domain parameter
//! rejects the whole batch before any element is priced, so no backend ever
//! produces partial output.
//!
//! Zero volatility and zero expiry are deliberately NOT rejected: they are
//! the documented degeneracy of the closed form (IEEE-754 propagation, see
//! `gbsm_models::analytical`), and one degenerate row must not abort the
//! other N − 1. Non-finite inputs likewise flow through as values.

use gbsm_core::types::{Flavor, PricingError};
use thiserror::Error;

/// Batch construction errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BatchError {
    /// An array input disagrees with the inferred batch length.
    #[error("shape mismatch for {field}: expected length {expected}, found {found}")]
    ShapeMismatch {
        /// Name of the offending input.
        field: &'static str,
        /// Inferred batch length.
        expected: usize,
        /// Length of the offending array.
        found: usize,
    },

    /// An element's flavor tag is neither 1 (Call) nor 0 (Put).
    #[error("invalid flavor tag {tag} at index {index}")]
    InvalidFlavor {
        /// Index of the offending element.
        index: usize,
        /// The rejected tag.
        tag: u8,
    },

    /// An element's numeric parameter is outside the pricing domain.
    #[error("invalid {field} at index {index}: {value}")]
    InvalidDomain {
        /// Index of the offending element.
        index: usize,
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl From<BatchError> for PricingError {
    fn from(err: BatchError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

/// A numeric input: one value broadcast over the batch, or one per element.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchParam {
    /// Single value, repeated for every element.
    Scalar(f64),
    /// One value per element; length must match the batch.
    Values(Vec<f64>),
}

impl BatchParam {
    fn declared_len(&self) -> Option<usize> {
        match self {
            BatchParam::Scalar(_) => None,
            BatchParam::Values(v) => Some(v.len()),
        }
    }

    fn materialise(self, n: usize, field: &'static str) -> Result<Vec<f64>, BatchError> {
        match self {
            BatchParam::Scalar(v) => Ok(vec![v; n]),
            BatchParam::Values(v) if v.len() == n => Ok(v),
            BatchParam::Values(v) => Err(BatchError::ShapeMismatch {
                field,
                expected: n,
                found: v.len(),
            }),
        }
    }
}

impl From<f64> for BatchParam {
    fn from(v: f64) -> Self {
        BatchParam::Scalar(v)
    }
}

impl From<Vec<f64>> for BatchParam {
    fn from(v: Vec<f64>) -> Self {
        BatchParam::Values(v)
    }
}

impl From<&[f64]> for BatchParam {
    fn from(v: &[f64]) -> Self {
        BatchParam::Values(v.to_vec())
    }
}

/// A flavor input: one flavor broadcast over the batch, or one per element.
#[derive(Debug, Clone, PartialEq)]
pub enum FlavorParam {
    /// Single flavor, repeated for every element.
    Scalar(Flavor),
    /// One flavor per element; length must match the batch.
    Values(Vec<Flavor>),
}

impl FlavorParam {
    fn declared_len(&self) -> Option<usize> {
        match self {
            FlavorParam::Scalar(_) => None,
            FlavorParam::Values(v) => Some(v.len()),
        }
    }

    fn materialise(self, n: usize) -> Result<Vec<Flavor>, BatchError> {
        match self {
            FlavorParam::Scalar(f) => Ok(vec![f; n]),
            FlavorParam::Values(v) if v.len() == n => Ok(v),
            FlavorParam::Values(v) => Err(BatchError::ShapeMismatch {
                field: "flavor",
                expected: n,
                found: v.len(),
            }),
        }
    }
}

impl From<Flavor> for FlavorParam {
    fn from(f: Flavor) -> Self {
        FlavorParam::Scalar(f)
    }
}

impl From<Vec<Flavor>> for FlavorParam {
    fn from(v: Vec<Flavor>) -> Self {
        FlavorParam::Values(v)
    }
}

/// A validated batch of N option parameter sets, stored column-wise.
///
/// Constructed once, consumed by a pricer, discarded; there is no identity
/// beyond the positional index and no mutation after construction.
///
/// # Examples
/// ```
/// use gbsm_core::types::Flavor;
/// use gbsm_kernel::batch::OptionBatch;
///
/// // Array spots, everything else broadcast
/// let batch = OptionBatch::new(
///     Flavor::Call.into(),
///     vec![95.0, 100.0, 105.0].into(),
///     100.0.into(),
///     1.0.into(),
///     0.05.into(),
///     0.2.into(),
///     0.05.into(),
/// )
/// .unwrap();
/// assert_eq!(batch.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct OptionBatch {
    flavors: Vec<Flavor>,
    spots: Vec<f64>,
    strikes: Vec<f64>,
    expiries: Vec<f64>,
    rates: Vec<f64>,
    volatilities: Vec<f64>,
    carries: Vec<f64>,
}

impl OptionBatch {
    /// Builds a batch from scalar-or-array inputs.
    ///
    /// The batch length is inferred from the first array input; scalars are
    /// broadcast to it. All-scalar input yields a batch of length 1.
    ///
    /// # Errors
    /// - [`BatchError::ShapeMismatch`] when array inputs disagree on length
    /// - [`BatchError::InvalidDomain`] for `S ≤ 0`, `K ≤ 0`, `sigma < 0` or
    ///   `T < 0` at any index (the index and field are reported)
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flavor: FlavorParam,
        spot: BatchParam,
        strike: BatchParam,
        expiry: BatchParam,
        rate: BatchParam,
        volatility: BatchParam,
        carry: BatchParam,
    ) -> Result<Self, BatchError> {
        let n = flavor
            .declared_len()
            .or_else(|| spot.declared_len())
            .or_else(|| strike.declared_len())
            .or_else(|| expiry.declared_len())
            .or_else(|| rate.declared_len())
            .or_else(|| volatility.declared_len())
            .or_else(|| carry.declared_len())
            .unwrap_or(1);

        let batch = Self {
            flavors: flavor.materialise(n)?,
            spots: spot.materialise(n, "spot")?,
            strikes: strike.materialise(n, "strike")?,
            expiries: expiry.materialise(n, "expiry")?,
            rates: rate.materialise(n, "rate")?,
            volatilities: volatility.materialise(n, "volatility")?,
            carries: carry.materialise(n, "carry")?,
        };

        batch.validate_domain()?;
        Ok(batch)
    }

    /// Builds a batch from raw integer flavor tags (1 = Call, 0 = Put).
    ///
    /// This is the boundary for columnar callers holding untyped tags.
    /// Unrecognised tags reject the whole batch; nothing is priced and no
    /// sentinel output is produced.
    ///
    /// # Errors
    /// [`BatchError::InvalidFlavor`] with the first offending index, plus
    /// everything [`OptionBatch::new`] rejects.
    ///
    /// # Examples
    /// ```
    /// use gbsm_kernel::batch::{BatchError, OptionBatch};
    ///
    /// let err = OptionBatch::from_tagged(
    ///     &[1, 2],
    ///     100.0.into(),
    ///     100.0.into(),
    ///     1.0.into(),
    ///     0.05.into(),
    ///     0.2.into(),
    ///     0.05.into(),
    /// )
    /// .unwrap_err();
    /// assert_eq!(err, BatchError::InvalidFlavor { index: 1, tag: 2 });
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn from_tagged(
        tags: &[u8],
        spot: BatchParam,
        strike: BatchParam,
        expiry: BatchParam,
        rate: BatchParam,
        volatility: BatchParam,
        carry: BatchParam,
    ) -> Result<Self, BatchError> {
        let flavors = tags
            .iter()
            .enumerate()
            .map(|(index, &tag)| {
                Flavor::from_tag(tag).map_err(|_| BatchError::InvalidFlavor { index, tag })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(
            FlavorParam::Values(flavors),
            spot,
            strike,
            expiry,
            rate,
            volatility,
            carry,
        )
    }

    fn validate_domain(&self) -> Result<(), BatchError> {
        for i in 0..self.len() {
            if self.spots[i] <= 0.0 {
                return Err(BatchError::InvalidDomain {
                    index: i,
                    field: "spot",
                    value: self.spots[i],
                });
            }
            if self.strikes[i] <= 0.0 {
                return Err(BatchError::InvalidDomain {
                    index: i,
                    field: "strike",
                    value: self.strikes[i],
                });
            }
            if self.volatilities[i] < 0.0 {
                return Err(BatchError::InvalidDomain {
                    index: i,
                    field: "volatility",
                    value: self.volatilities[i],
                });
            }
            if self.expiries[i] < 0.0 {
                return Err(BatchError::InvalidDomain {
                    index: i,
                    field: "expiry",
                    value: self.expiries[i],
                });
            }
        }
        Ok(())
    }

    /// Number of options in the batch.
    #[inline]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    /// True when the batch holds no options.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    /// Per-element flavors.
    #[inline]
    pub fn flavors(&self) -> &[Flavor] {
        &self.flavors
    }

    /// Per-element spot prices.
    #[inline]
    pub fn spots(&self) -> &[f64] {
        &self.spots
    }

    /// Per-element strike prices.
    #[inline]
    pub fn strikes(&self) -> &[f64] {
        &self.strikes
    }

    /// Per-element times to maturity in years.
    #[inline]
    pub fn expiries(&self) -> &[f64] {
        &self.expiries
    }

    /// Per-element risk-free rates.
    #[inline]
    pub fn rates(&self) -> &[f64] {
        &self.rates
    }

    /// Per-element volatilities.
    #[inline]
    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    /// Per-element cost-of-carry values.
    #[inline]
    pub fn carries(&self) -> &[f64] {
        &self.carries
    }
}
