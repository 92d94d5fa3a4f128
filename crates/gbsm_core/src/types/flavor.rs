//! Option flavor (payoff direction).
//!
//! Inside the workspace a flavor is always one of two typed values, so the
//! call/put dispatch in the pricing kernel is total. Raw inputs (integer
//! tags from columnar feeds, strings from text sources) are converted at
//! the boundary and rejected eagerly when unrecognised.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Payoff direction of a vanilla option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Flavor {
    /// Call option: pays max(S − K, 0) at expiry.
    Call,
    /// Put option: pays max(K − S, 0) at expiry.
    Put,
}

/// Unrecognised flavor at the raw-input boundary.
///
/// Never defaulted to one branch: a batch carrying an invalid flavor is
/// rejected before any element is priced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidFlavor {
    /// Integer tag other than 1 (Call) or 0 (Put).
    #[error("invalid flavor tag {tag}: expected 1 (Call) or 0 (Put)")]
    Tag {
        /// The rejected tag value.
        tag: u8,
    },
    /// String other than "Call" or "Put".
    #[error("invalid flavor name {name:?}: expected \"Call\" or \"Put\"")]
    Name {
        /// The rejected name.
        name: String,
    },
}

impl Flavor {
    /// Converts a raw integer tag: 1 is Call, 0 is Put.
    ///
    /// # Errors
    /// [`InvalidFlavor::Tag`] for any other value.
    ///
    /// # Examples
    /// ```
    /// use gbsm_core::types::Flavor;
    ///
    /// assert_eq!(Flavor::from_tag(1).unwrap(), Flavor::Call);
    /// assert_eq!(Flavor::from_tag(0).unwrap(), Flavor::Put);
    /// assert!(Flavor::from_tag(2).is_err());
    /// ```
    #[inline]
    pub fn from_tag(tag: u8) -> Result<Self, InvalidFlavor> {
        match tag {
            1 => Ok(Flavor::Call),
            0 => Ok(Flavor::Put),
            tag => Err(InvalidFlavor::Tag { tag }),
        }
    }

    /// Returns the integer tag for this flavor: 1 for Call, 0 for Put.
    #[inline]
    pub fn tag(self) -> u8 {
        match self {
            Flavor::Call => 1,
            Flavor::Put => 0,
        }
    }

    /// Returns true for [`Flavor::Call`].
    #[inline]
    pub fn is_call(self) -> bool {
        matches!(self, Flavor::Call)
    }

    /// Returns true for [`Flavor::Put`].
    #[inline]
    pub fn is_put(self) -> bool {
        matches!(self, Flavor::Put)
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Call => write!(f, "Call"),
            Flavor::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for Flavor {
    type Err = InvalidFlavor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Call" => Ok(Flavor::Call),
            "Put" => Ok(Flavor::Put),
            other => Err(InvalidFlavor::Name {
                name: other.to_string(),
            }),
        }
    }
}
