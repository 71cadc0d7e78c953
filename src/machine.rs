//! Machine constants, the `BesselFloat` trait and per-precision limits.
//!
//! The thresholds below are derived from the IEEE format of each float type
//! the same way the Amos routines derive them from `I1MACH`/`D1MACH`.

use num_traits::Float;

use crate::error::Error;
use crate::types::Accuracy;

/// Floating-point types the evaluation engine runs on.
///
/// Implemented for `f64` and `f32`.
pub trait BesselFloat: Float + core::fmt::Debug + 'static {
    /// Unit round-off.
    const MACH_EPSILON: Self;
    /// Smallest positive normal number.
    const MACH_TINY: Self;
    /// Largest finite number.
    const MACH_HUGE: Self;
    /// Binary digits in the significand.
    const MACH_DIGITS: i32;

    /// `max(eps, 1e-18)`
    const TOL: Self;
    /// Exponent magnitude beyond which `exp` under- or overflows, with margin.
    const ELIM: Self;
    /// `ELIM` less the digits a result can lose near the limit.
    const ALIM: Self;
    /// Lower `|z|` bound of the large-argument expansion.
    const RL: Self;
    /// Lower order bound of the large-order expansion.
    const FNUL: Self;

    /// Lossy conversion from an `f64` literal.
    fn from_f64(x: f64) -> Self;

    /// `self * a + b`, fused when `std` is available.
    fn fma(self, a: Self, b: Self) -> Self;
}

impl BesselFloat for f64 {
    const MACH_EPSILON: f64 = f64::EPSILON;
    const MACH_TINY: f64 = f64::MIN_POSITIVE;
    const MACH_HUGE: f64 = f64::MAX;
    const MACH_DIGITS: i32 = 53;

    const TOL: f64 = 2.220446049250313e-16;
    const ELIM: f64 = 700.9217936944459;
    const ALIM: f64 = 664.8716455337102;
    const RL: f64 = 21.784271729432426;
    const FNUL: f64 = 85.92135864716212;

    #[inline]
    fn from_f64(x: f64) -> f64 {
        x
    }

    #[cfg(feature = "std")]
    #[inline]
    fn fma(self, a: f64, b: f64) -> f64 {
        Float::mul_add(self, a, b)
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn fma(self, a: f64, b: f64) -> f64 {
        self * a + b
    }
}

#[allow(clippy::excessive_precision)]
impl BesselFloat for f32 {
    const MACH_EPSILON: f32 = f32::EPSILON;
    const MACH_TINY: f32 = f32::MIN_POSITIVE;
    const MACH_HUGE: f32 = f32::MAX;
    const MACH_DIGITS: i32 = 24;

    const TOL: f32 = 1.1920929e-7;
    const ELIM: f32 = 79.75001000176859;
    const ALIM: f32 = 63.80475216144317;
    const RL: f32 = 11.308427880325882;
    const FNUL: f32 = 33.542139401629406;

    #[inline]
    fn from_f64(x: f64) -> f32 {
        x as f32
    }

    #[cfg(feature = "std")]
    #[inline]
    fn fma(self, a: f32, b: f32) -> f32 {
        Float::mul_add(self, a, b)
    }

    #[cfg(not(feature = "std"))]
    #[inline]
    fn fma(self, a: f32, b: f32) -> f32 {
        self * a + b
    }
}

/// Threshold set threaded through every kernel of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Limits<T> {
    pub tol: T,
    pub elim: T,
    pub alim: T,
    pub rl: T,
    pub fnul: T,
}

impl<T: BesselFloat> Limits<T> {
    #[inline]
    pub fn new() -> Self {
        Self {
            tol: T::TOL,
            elim: T::ELIM,
            alim: T::ALIM,
            rl: T::RL,
            fnul: T::FNUL,
        }
    }

    /// Largest argument or order with any significance left:
    /// `min(0.5/tol, i32::MAX/2)`.
    #[inline]
    pub fn significance_bound(&self) -> T {
        (T::from_f64(0.5) / self.tol).min(T::from_f64(2147483647.0 * 0.5))
    }

    /// Range test shared by the Bessel drivers on `|z|` and the top order.
    pub fn check_range(&self, az: T, top: T) -> Result<Accuracy, Error> {
        let aa = self.significance_bound();
        if az > aa || top > aa {
            return Err(Error::TotalPrecisionLoss);
        }
        let half = aa.sqrt();
        Ok(Accuracy::reduced_if(az > half || top > half))
    }

    /// `1e3 * tiny / tol`, the smallest magnitude kept before a rescale.
    #[inline]
    pub fn ascle(&self) -> T {
        T::from_f64(1.0e3) * T::MACH_TINY / self.tol
    }
}

/// Integer part of a non-negative order, rejecting values that do not fit.
#[inline]
pub(crate) fn order_int<T: BesselFloat>(fnu: T) -> Result<i32, Error> {
    fnu.to_i32().ok_or(Error::InvalidInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn f64_limits_follow_format() {
        let lim = Limits::<f64>::new();
        // elim = 2.303 * (1021 * log10(2) - 3)
        let r1m5 = 0.30102999566398120;
        assert!((lim.elim - 2.303 * (1021.0 * r1m5 - 3.0)).abs() < 1e-12);
        let dig = r1m5 * 52.0;
        assert!((lim.rl - (1.2 * dig + 3.0)).abs() < 1e-12);
        assert!((lim.fnul - (10.0 + 6.0 * (dig - 3.0))).abs() < 1e-12);
        assert!(lim.alim < lim.elim);
    }

    #[test]
    fn significance_bound_is_capped_by_int_range() {
        assert_eq!(Limits::<f64>::new().significance_bound(), 2147483647.0 * 0.5);
        let b32 = Limits::<f32>::new().significance_bound();
        assert!((b32 - 0.5 / f32::EPSILON).abs() < 1.0);
    }

    #[test]
    fn range_flags_large_arguments() {
        let lim = Limits::<f64>::new();
        assert_eq!(lim.check_range(10.0, 5.0), Ok(Accuracy::Normal));
        assert_eq!(lim.check_range(1e5, 0.0), Ok(Accuracy::Reduced));
        assert_eq!(lim.check_range(1.0, 2e9), Err(Error::TotalPrecisionLoss));
    }

    #[test]
    fn order_int_rejects_huge() {
        assert_eq!(order_int(3.7_f64), Ok(3));
        assert_eq!(order_int(1e20_f64), Err(Error::InvalidInput));
    }
}
