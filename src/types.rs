//! Public value types: scaling mode, kind selectors and result records.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use num_complex::Complex;

use crate::error::Error;
use crate::machine::BesselFloat;

/// Precision of a successful evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Accuracy {
    /// Full machine precision, up to the usual round-off growth.
    Normal,
    /// More than half of the significant digits may be lost.
    ///
    /// Raised when `|z|` or the largest order exceeds `sqrt(0.5/eps)`
    /// (about 3.3e4 for `f64`), and for Airy when `|z|` exceeds the
    /// cube root of that bound squared.
    Reduced,
}

impl Accuracy {
    #[inline]
    pub(crate) fn reduced_if(flag: bool) -> Self {
        if flag { Accuracy::Reduced } else { Accuracy::Normal }
    }
}

/// Exponential scaling applied to the returned values.
///
/// `Exponential` returns `factor * f(z)` where the factor is
/// - J, Y: `exp(-|Im z|)`
/// - I: `exp(-|Re z|)`
/// - K: `exp(z)`
/// - H1: `exp(-iz)`, H2: `exp(iz)`
/// - Ai, Ai': `exp(ζ)`, `ζ = (2/3) z^{3/2}`
/// - Bi, Bi': `exp(-|Re ζ|)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scaling {
    #[default]
    Unscaled,
    Exponential,
}

impl Scaling {
    /// Decode the integer `kode` convention: 1 unscaled, 2 scaled.
    pub fn from_kode(kode: i32) -> Result<Self, Error> {
        match kode {
            1 => Ok(Scaling::Unscaled),
            2 => Ok(Scaling::Exponential),
            _ => Err(Error::InvalidInput),
        }
    }

    #[inline]
    pub(crate) fn is_scaled(self) -> bool {
        self == Scaling::Exponential
    }
}

/// Hankel function kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HankelKind {
    /// H^(1) = J + iY
    First,
    /// H^(2) = J - iY
    Second,
}

impl HankelKind {
    pub fn from_m(m: i32) -> Result<Self, Error> {
        match m {
            1 => Ok(HankelKind::First),
            2 => Ok(HankelKind::Second),
            _ => Err(Error::InvalidInput),
        }
    }
}

/// Airy function or its first derivative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AiryDerivative {
    #[default]
    Value,
    Derivative,
}

impl AiryDerivative {
    /// Decode the integer `id` convention: 0 value, 1 derivative.
    pub fn from_id(id: i32) -> Result<Self, Error> {
        match id {
            0 => Ok(AiryDerivative::Value),
            1 => Ok(AiryDerivative::Derivative),
            _ => Err(Error::InvalidInput),
        }
    }
}

/// Which family the uniform expansion in order is evaluated for.
///
/// Selects the prefactor (`1/sqrt(2π)` or `sqrt(π/2)`) and whether the
/// correction series is summed with alternating signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IkFlag {
    I,
    K,
}

/// Single Airy value with its precision status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiryResult<T: BesselFloat> {
    pub value: Complex<T>,
    /// `1` when an unscaled Ai or Ai' on its decaying branch underflowed to
    /// zero. Always `0` for Bi and for scaled calls.
    pub underflow_count: usize,
    pub status: Accuracy,
}

/// Run of values for orders `fnu, fnu+1, ..., fnu+n-1`.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq)]
pub struct BesselResult<T: BesselFloat> {
    pub values: Vec<Complex<T>>,
    /// Members set to zero by underflow: the lowest orders for K and the
    /// Hankel functions, the highest orders for I and J.
    pub underflow_count: usize,
    pub status: Accuracy,
}
